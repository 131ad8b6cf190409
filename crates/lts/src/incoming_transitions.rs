use crate::LabelIndex;
use crate::StateIndex;
use crate::Transition;
use crate::labelled_transition_system::label_range;

/// Stores the incoming transitions for a given labelled transition system.
///
/// The incoming transitions of every state are sorted by label, such that the
/// predecessors of a state under a given label form a contiguous slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingTransitions {
    transition_labels: Vec<LabelIndex>,
    transition_from: Vec<StateIndex>,

    /// The offsets [state2incoming[s], state2incoming[s + 1]) contain the incoming transitions of state s.
    state2incoming: Vec<usize>,
}

impl IncomingTransitions {
    /// Constructs the incoming transitions from the given (from, label, to) transitions.
    pub fn new(num_of_states: usize, transitions: &[(StateIndex, LabelIndex, StateIndex)]) -> IncomingTransitions {
        let mut state2incoming = vec![0; num_of_states + 1];

        // Count the number of incoming transitions for each state
        for (_, _, to) in transitions {
            state2incoming[to.value() + 1] += 1;
        }

        // Compute the start offsets (prefix sum)
        for state_index in 0..num_of_states {
            state2incoming[state_index + 1] += state2incoming[state_index];
        }

        // Place the transitions, sorted on (to, label, from).
        let mut incoming: Vec<(StateIndex, LabelIndex, StateIndex)> =
            transitions.iter().map(|(from, label, to)| (*to, *label, *from)).collect();
        incoming.sort_unstable();

        IncomingTransitions {
            transition_labels: incoming.iter().map(|(_, label, _)| *label).collect(),
            transition_from: incoming.iter().map(|(_, _, from)| *from).collect(),
            state2incoming,
        }
    }

    /// Returns an iterator over the incoming transitions for the given state,
    /// where the `to` of the returned transition is the source state.
    pub fn incoming_transitions(&self, state_index: StateIndex) -> impl Iterator<Item = Transition> + '_ {
        let start = self.state2incoming[state_index.value()];
        let end = self.state2incoming[state_index.value() + 1];
        (start..end).map(move |i| Transition::new(self.transition_labels[i], self.transition_from[i]))
    }

    /// Returns the states `s` such that `s --label--> state_index`.
    pub fn pre(&self, state_index: StateIndex, label: LabelIndex) -> &[StateIndex] {
        let start = self.state2incoming[state_index.value()];
        let end = self.state2incoming[state_index.value() + 1];
        &self.transition_from[label_range(&self.transition_labels, start..end, label)]
    }

    /// Returns the distinct labels of the incoming transitions of the given state, in increasing order.
    pub fn incoming_labels(&self, state_index: StateIndex) -> impl Iterator<Item = LabelIndex> + '_ {
        let start = self.state2incoming[state_index.value()];
        let end = self.state2incoming[state_index.value() + 1];
        (start..end)
            .filter(move |i| *i == start || self.transition_labels[*i - 1] != self.transition_labels[*i])
            .map(move |i| self.transition_labels[i])
    }
}
