use bitvec::bitvec;
use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::LTS;
use crate::LabelIndex;
use crate::StateIndex;

/// For every label, the states that have at least one outgoing transition
/// with that label.
pub struct Delta {
    /// The sources of every label in increasing order.
    sources: Vec<Vec<StateIndex>>,

    /// The membership test of `sources`, indexed by label.
    enabled: Vec<BitVec<usize, Lsb0>>,
}

impl Delta {
    /// Computes the enabled labels of every state of the given LTS.
    pub fn new(lts: &impl LTS) -> Delta {
        let mut sources = vec![Vec::new(); lts.num_of_labels()];
        let mut enabled = vec![bitvec![usize, Lsb0; 0; lts.num_of_states()]; lts.num_of_labels()];

        for state_index in lts.iter_states() {
            for transition in lts.outgoing_transitions(state_index) {
                let label = transition.label.value();
                if !enabled[label][state_index.value()] {
                    enabled[label].set(state_index.value(), true);
                    sources[label].push(state_index);
                }
            }
        }

        Delta { sources, enabled }
    }

    /// Returns the states with an outgoing transition labelled with `label`, in increasing order.
    pub fn sources(&self, label: LabelIndex) -> &[StateIndex] {
        &self.sources[label.value()]
    }

    /// Returns true iff the given state has an outgoing transition labelled with `label`.
    pub fn is_enabled(&self, state_index: StateIndex, label: LabelIndex) -> bool {
        self.enabled[label.value()][state_index.value()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use simrel_utilities::random_test;

    use crate::random_lts;

    #[test]
    fn test_random_delta() {
        random_test(100, |rng| {
            let lts = random_lts(rng, 10, 3, 3);
            let delta = Delta::new(&lts);

            for label in lts.iter_labels() {
                for state_index in lts.iter_states() {
                    let enabled = !lts.post(state_index, label).is_empty();
                    assert_eq!(delta.is_enabled(state_index, label), enabled);
                    assert_eq!(delta.sources(label).contains(&state_index), enabled);
                }

                assert!(delta.sources(label).is_sorted());
            }
        });
    }
}
