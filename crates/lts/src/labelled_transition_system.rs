use std::fmt;
use std::ops::Range;

use log::debug;
use simrel_utilities::TagIndex;
use thiserror::Error;

use crate::IncomingTransitions;
use crate::LTS;

/// A unique type for the labels.
pub struct LabelTag;

/// A unique type for the states.
pub struct StateTag;

/// The index type for a label.
pub type LabelIndex = TagIndex<usize, LabelTag>;

/// The index for a state.
pub type StateIndex = TagIndex<usize, StateTag>;

/// The errors that can occur when constructing a labelled transition system.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LtsError {
    #[error("State {state} is out of range for a transition system with {num_of_states} states")]
    StateOutOfRange { state: usize, num_of_states: usize },

    #[error("Label {label} is out of range for a transition system with {num_of_labels} labels")]
    LabelOutOfRange { label: usize, num_of_labels: usize },
}

/// Represents a labelled transition system consisting of states with directed
/// labelled edges.
///
/// States and labels are identified by their index, and the transitions are
/// stored per state ordered by label such that the successors of a state
/// under a given label form a contiguous slice.
#[derive(PartialEq, Eq, Clone)]
pub struct LabelledTransitionSystem {
    /// Encodes the states and their outgoing transitions, the offsets
    /// [states[s], states[s + 1]) contain the transitions of state s.
    states: Vec<usize>,
    transition_labels: Vec<LabelIndex>,
    transition_to: Vec<StateIndex>,

    /// Stores the incoming transitions in the same way.
    incoming: IncomingTransitions,

    num_of_labels: usize,
}

impl LabelledTransitionSystem {
    /// Creates a new labelled transition system with the given number of
    /// states, labels and transitions given as (from, label, to) triples.
    ///
    /// Duplicated transitions are removed.
    pub fn new<I>(num_of_states: usize, num_of_labels: usize, transitions: I) -> Result<Self, LtsError>
    where
        I: IntoIterator<Item = (StateIndex, LabelIndex, StateIndex)>,
    {
        let mut transitions: Vec<(StateIndex, LabelIndex, StateIndex)> = transitions.into_iter().collect();

        for (from, label, to) in &transitions {
            for state in [from, to] {
                if state.value() >= num_of_states {
                    return Err(LtsError::StateOutOfRange {
                        state: state.value(),
                        num_of_states,
                    });
                }
            }

            if label.value() >= num_of_labels {
                return Err(LtsError::LabelOutOfRange {
                    label: label.value(),
                    num_of_labels,
                });
            }
        }

        // Sort on (from, label, to) and remove duplicates.
        transitions.sort_unstable();
        transitions.dedup();

        // Count the number of transitions for every state, and compute the start offsets (prefix sum).
        let mut states = vec![0; num_of_states + 1];
        for (from, _, _) in &transitions {
            states[from.value() + 1] += 1;
        }

        for state_index in 0..num_of_states {
            states[state_index + 1] += states[state_index];
        }

        let incoming = IncomingTransitions::new(num_of_states, &transitions);

        let lts = LabelledTransitionSystem {
            states,
            transition_labels: transitions.iter().map(|(_, label, _)| *label).collect(),
            transition_to: transitions.iter().map(|(_, _, to)| *to).collect(),
            incoming,
            num_of_labels,
        };

        debug!(
            "Constructed LTS with {} states, {} labels and {} transitions",
            lts.num_of_states(),
            lts.num_of_labels(),
            lts.num_of_transitions()
        );
        Ok(lts)
    }

    /// Returns the incoming transitions of this labelled transition system.
    pub fn incoming(&self) -> &IncomingTransitions {
        &self.incoming
    }

    /// Returns the range of transitions of the given state.
    fn outgoing_range(&self, state_index: StateIndex) -> Range<usize> {
        self.states[state_index.value()]..self.states[state_index.value() + 1]
    }
}

impl LTS for LabelledTransitionSystem {
    fn num_of_states(&self) -> usize {
        // Remove the sentinel state.
        self.states.len() - 1
    }

    fn num_of_labels(&self) -> usize {
        self.num_of_labels
    }

    fn num_of_transitions(&self) -> usize {
        self.transition_labels.len()
    }

    fn outgoing_transitions(&self, state_index: StateIndex) -> impl Iterator<Item = Transition> + '_ {
        self.outgoing_range(state_index).map(move |i| Transition {
            label: self.transition_labels[i],
            to: self.transition_to[i],
        })
    }

    fn post(&self, state_index: StateIndex, label: LabelIndex) -> &[StateIndex] {
        let range = label_range(&self.transition_labels, self.outgoing_range(state_index), label);
        &self.transition_to[range]
    }

    fn pre(&self, state_index: StateIndex, label: LabelIndex) -> &[StateIndex] {
        self.incoming.pre(state_index, label)
    }

    fn incoming_labels(&self, state_index: StateIndex) -> impl Iterator<Item = LabelIndex> + '_ {
        self.incoming.incoming_labels(state_index)
    }
}

/// Returns the subrange of `range` in which `labels` is equal to the given
/// label, assuming that `labels` is sorted within `range`.
pub(crate) fn label_range(labels: &[LabelIndex], range: Range<usize>, label: LabelIndex) -> Range<usize> {
    let slice = &labels[range.clone()];
    let start = range.start + slice.partition_point(|other| *other < label);
    let end = range.start + slice.partition_point(|other| *other <= label);
    start..end
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Transition {
    pub label: LabelIndex,
    pub to: StateIndex,
}

impl Transition {
    /// Constructs a new transition.
    pub fn new(label: LabelIndex, to: StateIndex) -> Self {
        Self { label, to }
    }
}

impl fmt::Display for LabelledTransitionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Print some information about the LTS.
        writeln!(f, "Number of states: {}", self.num_of_states())?;
        writeln!(f, "Number of action labels: {}", self.num_of_labels())?;
        write!(f, "Number of transitions: {}", self.num_of_transitions())
    }
}

impl fmt::Debug for LabelledTransitionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        for state_index in self.iter_states() {
            for transition in self.outgoing_transitions(state_index) {
                writeln!(f, "{state_index} --[{}]-> {}", transition.label, transition.to)?;
            }
        }

        Ok(())
    }
}
