use rand::Rng;

use crate::LabelIndex;
use crate::LabelledTransitionSystem;
use crate::LtsBuilder;
use crate::StateIndex;

/// Generates a random LTS with the desired number of states and labels, where
/// every state has at most `outdegree` outgoing transitions.
pub fn random_lts(
    rng: &mut impl Rng,
    num_of_states: usize,
    num_of_labels: usize,
    outdegree: usize,
) -> LabelledTransitionSystem {
    assert!(num_of_labels > 0, "At least one label is required");

    let mut builder = LtsBuilder::with_capacity(num_of_states, num_of_labels, num_of_states * outdegree);

    for state_index in 0..num_of_states {
        // Introduce outgoing transitions for this state based on the desired out degree.
        for _ in 0..rng.random_range(0..=outdegree) {
            // Pick a random label and state.
            let label = rng.random_range(0..num_of_labels);
            let to = rng.random_range(0..num_of_states);

            builder.add_transition(StateIndex::new(state_index), LabelIndex::new(label), StateIndex::new(to));
        }
    }

    match builder.finish() {
        Ok(lts) => lts,
        Err(error) => unreachable!("The builder covers all added transitions: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use simrel_utilities::random_test;

    use crate::LTS;

    #[test]
    fn random_lts_test() {
        random_test(100, |rng| {
            let lts = random_lts(rng, 10, 3, 3);
            assert_eq!(lts.num_of_states(), 10);
            assert_eq!(lts.num_of_labels(), 3);
            assert!(lts.num_of_transitions() <= 30);
        });
    }
}
