use simrel_collections::BinaryRelation;
use simrel_lts::StateIndex;
use thiserror::Error;

/// The ways in which the input of the simulation algorithm can be malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("State {state} in class {class} is out of range for {num_of_states} states")]
    StateOutOfRange {
        state: usize,
        class: usize,
        num_of_states: usize,
    },

    #[error("State {state} occurs in both class {first} and class {second}")]
    DuplicateState { state: usize, first: usize, second: usize },

    #[error("State {state} does not occur in any class")]
    MissingState { state: usize },

    #[error("Class {class} is empty")]
    EmptyClass { class: usize },

    #[error("The relation has size {relation} but there are {partition} classes")]
    RelationSizeMismatch { relation: usize, partition: usize },

    #[error("The relation does not relate class {class} to itself")]
    NotReflexive { class: usize },
}

/// Checks that `partition` is a partition of the states into non-empty
/// classes, and that `relation` is a reflexive relation over these classes.
pub fn validate_input(
    num_of_states: usize,
    partition: &[Vec<StateIndex>],
    relation: &BinaryRelation,
) -> Result<(), InputError> {
    let mut class_of: Vec<Option<usize>> = vec![None; num_of_states];

    for (class, states) in partition.iter().enumerate() {
        if states.is_empty() {
            return Err(InputError::EmptyClass { class });
        }

        for state_index in states {
            let state = state_index.value();
            if state >= num_of_states {
                return Err(InputError::StateOutOfRange {
                    state,
                    class,
                    num_of_states,
                });
            }

            if let Some(first) = class_of[state] {
                return Err(InputError::DuplicateState {
                    state,
                    first,
                    second: class,
                });
            }

            class_of[state] = Some(class);
        }
    }

    if let Some(state) = class_of.iter().position(Option::is_none) {
        return Err(InputError::MissingState { state });
    }

    if relation.size() != partition.len() {
        return Err(InputError::RelationSizeMismatch {
            relation: relation.size(),
            partition: partition.len(),
        });
    }

    if let Some(class) = (0..partition.len()).find(|class| !relation.get(*class, *class)) {
        return Err(InputError::NotReflexive { class });
    }

    Ok(())
}
