use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use simrel_lts::LabelIndex;
use simrel_lts::StateIndex;

/// Counts for a single block `B`, a label `a` and a state `q` the number of
/// `a`-successors of `q` that lie in blocks simulating `B`.
///
/// The counters are sparse, only states with a positive count are stored.
#[derive(Clone, Debug, Default)]
pub struct SuccessorCounter {
    rows: FxHashMap<LabelIndex, FxHashMap<StateIndex, usize>>,
}

impl SuccessorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter of the given state.
    pub fn incr(&mut self, label: LabelIndex, state_index: StateIndex) {
        *self.rows.entry(label).or_default().entry(state_index).or_default() += 1;
    }

    /// Decrements the counter of the given state, which must be positive, and
    /// returns the new value.
    pub fn decr(&mut self, label: LabelIndex, state_index: StateIndex) -> usize {
        let Some(row) = self.rows.get_mut(&label) else {
            debug_assert!(false, "Decremented counter of label {label} which has no row");
            return 0;
        };

        match row.entry(state_index) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() -= 1;
                if *entry.get() == 0 {
                    entry.remove();
                    0
                } else {
                    *entry.get()
                }
            }
            Entry::Vacant(_) => {
                debug_assert!(false, "Decremented counter ({label}, {state_index}) which is zero");
                0
            }
        }
    }

    /// Returns the counter of the given state.
    pub fn get(&self, label: LabelIndex, state_index: StateIndex) -> usize {
        self.rows
            .get(&label)
            .and_then(|row| row.get(&state_index))
            .copied()
            .unwrap_or(0)
    }

    /// Replaces the counters of the given label by a copy of the ones in `other`.
    pub fn copy_row(&mut self, label: LabelIndex, other: &SuccessorCounter) {
        match other.rows.get(&label) {
            Some(row) => {
                self.rows.insert(label, row.clone());
            }
            None => {
                self.rows.remove(&label);
            }
        }
    }
}
