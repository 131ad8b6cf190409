use std::fmt;

use itertools::Itertools;
use simrel_lts::StateIndex;

use crate::BlockIndex;

#[derive(Clone, Debug)]
struct StateEntry {
    block: BlockIndex,
    next: StateIndex,
    prev: StateIndex,
}

/// Keeps track of the block of every state, and links the states of every
/// block into a circular doubly linked list.
///
/// A list is identified by one of its states, the head, and `None` is the
/// empty list. Moving a state between lists takes constant time.
#[derive(Clone)]
pub struct StateRegistry {
    entries: Vec<StateEntry>,
}

impl StateRegistry {
    /// Creates a registry where every state is in its own list, and belongs to block zero.
    pub fn new(num_of_states: usize) -> Self {
        Self {
            entries: (0..num_of_states)
                .map(|state| StateEntry {
                    block: BlockIndex::new(0),
                    next: StateIndex::new(state),
                    prev: StateIndex::new(state),
                })
                .collect(),
        }
    }

    /// Returns the block of the given state.
    pub fn block(&self, state_index: StateIndex) -> BlockIndex {
        self.entries[state_index].block
    }

    pub fn set_block(&mut self, state_index: StateIndex, block_index: BlockIndex) {
        self.entries[state_index].block = block_index;
    }

    /// Returns the successor of the state in its list.
    pub fn next(&self, state_index: StateIndex) -> StateIndex {
        self.entries[state_index].next
    }

    /// Links the given states into a single list and returns its head.
    pub fn make_list(&mut self, states: &[StateIndex]) -> Option<StateIndex> {
        for (i, state_index) in states.iter().enumerate() {
            self.entries[*state_index].next = states[(i + 1) % states.len()];
            self.entries[*state_index].prev = states[(i + states.len() - 1) % states.len()];
        }

        states.first().copied()
    }

    /// Moves the state from the list `source` to the end of the list `target`.
    pub fn move_state(
        &mut self,
        state_index: StateIndex,
        source: &mut Option<StateIndex>,
        target: &mut Option<StateIndex>,
    ) {
        let StateEntry { next, prev, .. } = self.entries[state_index].clone();
        debug_assert!(source.is_some(), "Cannot move state {state_index} out of an empty list");

        // Unlink the state from the source list.
        if next == state_index {
            *source = None;
        } else {
            *source = Some(next);
            self.entries[prev].next = next;
            self.entries[next].prev = prev;
        }

        match *target {
            None => {
                self.entries[state_index].next = state_index;
                self.entries[state_index].prev = state_index;
                *target = Some(state_index);
            }
            Some(head) => {
                let last = self.entries[head].prev;
                self.entries[state_index].next = head;
                self.entries[state_index].prev = last;
                self.entries[last].next = state_index;
                self.entries[head].prev = state_index;
            }
        }
    }

    /// Returns an iterator over the states of the list starting at `head`.
    pub fn iter_list(&self, head: Option<StateIndex>) -> StateListIter<'_> {
        StateListIter {
            registry: self,
            head,
            current: head,
        }
    }

    /// Returns the number of states in the list starting at `head`.
    pub fn list_len(&self, head: Option<StateIndex>) -> usize {
        self.iter_list(head).count()
    }
}

/// Iterator over the states of a single list.
pub struct StateListIter<'a> {
    registry: &'a StateRegistry,
    head: Option<StateIndex>,
    current: Option<StateIndex>,
}

impl Iterator for StateListIter<'_> {
    type Item = StateIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let next = self.registry.next(current);
        self.current = if Some(next) == self.head { None } else { Some(next) };
        Some(current)
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.entries
                .iter()
                .enumerate()
                .format_with(", ", |(state, entry), f| f(&format_args!("{state}: {}", entry.block)))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;
    use simrel_utilities::random_test;

    fn states(indices: &[usize]) -> Vec<StateIndex> {
        indices.iter().map(|i| StateIndex::new(*i)).collect()
    }

    #[test]
    fn test_state_registry_move() {
        let mut registry = StateRegistry::new(5);
        let mut source = registry.make_list(&states(&[0, 1, 2, 3]));
        let mut target = None;

        registry.move_state(StateIndex::new(2), &mut source, &mut target);
        registry.move_state(StateIndex::new(0), &mut source, &mut target);

        assert_eq!(registry.iter_list(source).collect::<Vec<_>>(), states(&[1, 3]));
        assert_eq!(registry.iter_list(target).collect::<Vec<_>>(), states(&[2, 0]));

        registry.move_state(StateIndex::new(1), &mut source, &mut target);
        registry.move_state(StateIndex::new(3), &mut source, &mut target);
        assert_eq!(source, None);
        assert_eq!(registry.list_len(source), 0);
        assert_eq!(registry.list_len(target), 4);
    }

    #[test]
    fn test_random_state_registry() {
        random_test(100, |rng| {
            let num_of_states = rng.random_range(1..20);
            let mut registry = StateRegistry::new(num_of_states);

            let all: Vec<StateIndex> = (0..num_of_states).map(StateIndex::new).collect();
            let mut lists = [registry.make_list(&all), None];
            let mut expected: [Vec<StateIndex>; 2] = [all, Vec::new()];

            for _ in 0..50 {
                let from = rng.random_range(0..2);
                if expected[from].is_empty() {
                    continue;
                }

                let state_index = expected[from].remove(rng.random_range(0..expected[from].len()));
                let [first, second] = &mut lists;
                if from == 0 {
                    registry.move_state(state_index, first, second);
                } else {
                    registry.move_state(state_index, second, first);
                }
                expected[1 - from].push(state_index);

                for (list, expected) in lists.iter().zip(expected.iter()) {
                    let mut actual: Vec<_> = registry.iter_list(*list).collect();
                    let mut expected = expected.clone();
                    actual.sort();
                    expected.sort();
                    assert_eq!(actual, expected);
                }
            }
        });
    }
}
