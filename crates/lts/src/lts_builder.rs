use crate::LabelIndex;
use crate::LabelledTransitionSystem;
use crate::LtsError;
use crate::StateIndex;

/// Collects transitions and constructs a [LabelledTransitionSystem] whose
/// state and label space is large enough to contain all added transitions.
#[derive(Default)]
pub struct LtsBuilder {
    transitions: Vec<(StateIndex, LabelIndex, StateIndex)>,
    num_of_states: usize,
    num_of_labels: usize,
}

impl LtsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the builder with pre-allocated capacity for the transitions.
    pub fn with_capacity(num_of_states: usize, num_of_labels: usize, num_of_transitions: usize) -> Self {
        Self {
            transitions: Vec::with_capacity(num_of_transitions),
            num_of_states,
            num_of_labels,
        }
    }

    /// Adds a transition to the builder.
    pub fn add_transition(&mut self, from: StateIndex, label: LabelIndex, to: StateIndex) {
        self.num_of_states = self.num_of_states.max(from.value() + 1).max(to.value() + 1);
        self.num_of_labels = self.num_of_labels.max(label.value() + 1);
        self.transitions.push((from, label, to));
    }

    /// Ensures that the resulting LTS has at least the given number of states.
    pub fn require_num_of_states(&mut self, num_of_states: usize) {
        self.num_of_states = self.num_of_states.max(num_of_states);
    }

    /// Ensures that the resulting LTS has at least the given number of labels.
    pub fn require_num_of_labels(&mut self, num_of_labels: usize) {
        self.num_of_labels = self.num_of_labels.max(num_of_labels);
    }

    /// Returns the number of states that the resulting LTS will have.
    pub fn num_of_states(&self) -> usize {
        self.num_of_states
    }

    /// Returns the number of transitions added so far, including duplicates.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Constructs the labelled transition system, duplicated transitions are removed.
    pub fn finish(self) -> Result<LabelledTransitionSystem, LtsError> {
        LabelledTransitionSystem::new(self.num_of_states, self.num_of_labels, self.transitions)
    }
}
