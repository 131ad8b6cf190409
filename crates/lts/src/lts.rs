use crate::LabelIndex;
use crate::StateIndex;
use crate::Transition;

/// A read-only view on a labelled transition system with dense, zero based
/// state and label indices.
///
/// The successors and predecessors of a state are indexed per label, which is
/// the access pattern required by partition refinement algorithms.
pub trait LTS {
    /// Returns the number of states.
    fn num_of_states(&self) -> usize;

    /// Returns the number of labels.
    fn num_of_labels(&self) -> usize;

    /// Returns the number of transitions.
    fn num_of_transitions(&self) -> usize;

    /// Returns the outgoing transitions of the given state, ordered by label.
    fn outgoing_transitions(&self, state_index: StateIndex) -> impl Iterator<Item = Transition> + '_;

    /// Returns the states `t` such that `state_index --label--> t`.
    fn post(&self, state_index: StateIndex, label: LabelIndex) -> &[StateIndex];

    /// Returns the states `s` such that `s --label--> state_index`.
    fn pre(&self, state_index: StateIndex, label: LabelIndex) -> &[StateIndex];

    /// Returns the distinct labels of the incoming transitions of the given state.
    fn incoming_labels(&self, state_index: StateIndex) -> impl Iterator<Item = LabelIndex> + '_;

    /// Iterate over all state indices of the labelled transition system.
    fn iter_states(&self) -> impl Iterator<Item = StateIndex> {
        (0..self.num_of_states()).map(StateIndex::new)
    }

    /// Iterate over all label indices of the labelled transition system.
    fn iter_labels(&self) -> impl Iterator<Item = LabelIndex> {
        (0..self.num_of_labels()).map(LabelIndex::new)
    }
}
