use rand::Rng;
use rand::rngs::StdRng;
use test_case::test_case;
use test_log::test;

use simrel_collections::BinaryRelation;
use simrel_lts::LTS;
use simrel_lts::LabelIndex;
use simrel_lts::LabelledTransitionSystem;
use simrel_lts::LtsBuilder;
use simrel_lts::StateIndex;
use simrel_lts::random_lts;
use simrel_simulation::Partition;
use simrel_simulation::Simulation;
use simrel_simulation::SimulationOptions;
use simrel_simulation::WorkOrder;
use simrel_simulation::compute_simulation;
use simrel_simulation::compute_simulation_with;
use simrel_simulation::simulation_preorder;
use simrel_utilities::random_test;

fn lts(num_of_states: usize, transitions: &[(usize, usize, usize)]) -> LabelledTransitionSystem {
    let mut builder = LtsBuilder::new();
    builder.require_num_of_states(num_of_states);
    for (from, label, to) in transitions {
        builder.add_transition(StateIndex::new(*from), LabelIndex::new(*label), StateIndex::new(*to));
    }

    builder.finish().unwrap()
}

fn singletons(num_of_states: usize) -> Vec<Vec<StateIndex>> {
    (0..num_of_states).map(|s| vec![StateIndex::new(s)]).collect()
}

/// Computes the largest simulation contained in the given initial relation on
/// states by removing pairs until a fixed point is reached.
fn naive_simulation(lts: &impl LTS, initial: &BinaryRelation) -> BinaryRelation {
    let mut relation = initial.clone();

    let mut changed = true;
    while changed {
        changed = false;

        for s in lts.iter_states() {
            for t in lts.iter_states() {
                if !relation.get(s.value(), t.value()) {
                    continue;
                }

                let simulated = lts.outgoing_transitions(s).all(|transition| {
                    lts.post(t, transition.label)
                        .iter()
                        .any(|target| relation.get(transition.to.value(), target.value()))
                });

                if !simulated {
                    relation.set(s.value(), t.value(), false);
                    changed = true;
                }
            }
        }
    }

    relation
}

/// Lifts a relation on classes to a relation on states.
fn lift(num_of_states: usize, partition: &[Vec<StateIndex>], relation: &BinaryRelation) -> BinaryRelation {
    let mut class_of = vec![0; num_of_states];
    for (class, states) in partition.iter().enumerate() {
        for state_index in states {
            class_of[state_index.value()] = class;
        }
    }

    let mut result = BinaryRelation::new(num_of_states, false);
    for s in 0..num_of_states {
        for t in 0..num_of_states {
            result.set(s, t, relation.get(class_of[s], class_of[t]));
        }
    }

    result
}

/// Returns a random partition of the states together with a random preorder
/// on its classes, where every class is assigned a set of features and the
/// classes with more features are bigger.
fn random_preorder(rng: &mut StdRng, num_of_states: usize) -> (Vec<Vec<StateIndex>>, BinaryRelation) {
    let num_of_classes = rng.random_range(1..=num_of_states);
    let mut partition: Vec<Vec<StateIndex>> = vec![Vec::new(); num_of_classes];

    // Every class receives at least one state.
    for s in 0..num_of_states {
        let class = if s < num_of_classes {
            s
        } else {
            rng.random_range(0..num_of_classes)
        };
        partition[class].push(StateIndex::new(s));
    }

    let features: Vec<u8> = (0..num_of_classes).map(|_| rng.random_range(0..8)).collect();
    let mut relation = BinaryRelation::new(num_of_classes, false);
    for i in 0..num_of_classes {
        for j in 0..num_of_classes {
            relation.set(i, j, features[i] & !features[j] == 0);
        }
    }

    (partition, relation)
}

#[test_case(WorkOrder::Lifo ; "lifo")]
#[test_case(WorkOrder::Fifo ; "fifo")]
#[test_log::test]
fn test_self_loops_are_equivalent(order: WorkOrder) {
    let lts = lts(2, &[(0, 0, 1), (1, 0, 1)]);

    let relation = compute_simulation_with(
        &lts,
        &singletons(2),
        &BinaryRelation::new(2, true),
        2,
        SimulationOptions::with_order(order),
    );
    assert_eq!(relation, BinaryRelation::new(2, true));
}

#[test_case(WorkOrder::Lifo ; "lifo")]
#[test_case(WorkOrder::Fifo ; "fifo")]
#[test_log::test]
fn test_no_transitions_keeps_relation(order: WorkOrder) {
    let lts = lts(3, &[]);
    let partition = vec![vec![StateIndex::new(0), StateIndex::new(2)], vec![StateIndex::new(1)]];
    let relation = BinaryRelation::from_rows(&[vec![true, false], vec![true, true]]);

    let result = compute_simulation_with(&lts, &partition, &relation, 3, SimulationOptions::with_order(order));
    assert_eq!(result, lift(3, &partition, &relation));
}

#[test_case(WorkOrder::Lifo ; "lifo")]
#[test_case(WorkOrder::Fifo ; "fifo")]
#[test_log::test]
fn test_shared_successor(order: WorkOrder) {
    let lts = lts(3, &[(0, 0, 2), (1, 0, 2)]);

    let result = compute_simulation_with(
        &lts,
        &singletons(3),
        &BinaryRelation::new(3, true),
        3,
        SimulationOptions::with_order(order),
    );
    assert_eq!(
        result,
        BinaryRelation::from_rows(&[
            vec![true, true, false],
            vec![true, true, false],
            vec![true, true, true],
        ])
    );
}

#[test]
fn test_zero_states() {
    let lts = lts(0, &[]);

    assert!(compute_simulation(&lts, &[], &BinaryRelation::empty(), 0).is_empty());
    assert!(simulation_preorder(&lts).is_empty());
}

#[test]
fn test_output_size_smaller_than_states() {
    let lts = lts(3, &[(0, 0, 0), (1, 1, 1)]);

    let partition: Vec<Vec<StateIndex>> = vec![lts.iter_states().collect()];

    let result = compute_simulation(&lts, &partition, &BinaryRelation::new(1, true), 2);
    assert_eq!(result, BinaryRelation::identity(2));
}

#[test]
fn test_branching_choice() {
    // The state 0 can choose between b and c after an a, while state 4 has to choose early.
    let lts = lts(8, &[(0, 0, 1), (1, 1, 2), (1, 2, 3), (4, 0, 5), (4, 0, 6), (5, 1, 7), (6, 2, 7)]);

    let relation = simulation_preorder(&lts);
    assert!(relation.get(4, 0), "State 0 simulates state 4");
    assert!(!relation.get(0, 4), "State 4 does not simulate state 0");
    assert!(relation.get(5, 1) && relation.get(6, 1));
    assert!(!relation.get(1, 5));
}

#[test_case(WorkOrder::Lifo ; "lifo")]
#[test_case(WorkOrder::Fifo ; "fifo")]
#[test_log::test]
fn test_random_simulation_preorder(order: WorkOrder) {
    random_test(100, |rng| {
        let lts = random_lts(rng, 12, 3, 3);
        let num_of_states = lts.num_of_states();
        let partition: Vec<Vec<StateIndex>> = vec![lts.iter_states().collect()];
        let initial = BinaryRelation::new(1, true);

        let result = compute_simulation_with(
            &lts,
            &partition,
            &initial,
            num_of_states,
            SimulationOptions::with_order(order),
        );
        assert_eq!(
            result,
            naive_simulation(&lts, &lift(num_of_states, &partition, &initial)),
            "{lts:?}"
        );
    });
}

#[test_case(WorkOrder::Lifo ; "lifo")]
#[test_case(WorkOrder::Fifo ; "fifo")]
#[test_log::test]
fn test_random_simulation_initial_preorder(order: WorkOrder) {
    random_test(100, |rng| {
        let lts = random_lts(rng, 10, 2, 3);
        let num_of_states = lts.num_of_states();
        let (partition, initial) = random_preorder(rng, num_of_states);

        let result = compute_simulation_with(
            &lts,
            &partition,
            &initial,
            num_of_states,
            SimulationOptions::with_order(order),
        );
        let expected = naive_simulation(&lts, &lift(num_of_states, &partition, &initial));
        assert_eq!(result, expected, "{lts:?}\n{initial}");
    });
}

#[test]
fn test_random_identity() {
    random_test(100, |rng| {
        let lts = random_lts(rng, 10, 3, 3);
        let num_of_states = lts.num_of_states();

        let result = compute_simulation(
            &lts,
            &singletons(num_of_states),
            &BinaryRelation::identity(num_of_states),
            num_of_states,
        );
        assert_eq!(result, BinaryRelation::identity(num_of_states));
    });
}

#[test]
fn test_random_simulation_properties() {
    random_test(100, |rng| {
        let lts = random_lts(rng, 15, 2, 3);
        let num_of_states = lts.num_of_states();
        let (partition, initial) = random_preorder(rng, num_of_states);
        let lifted = lift(num_of_states, &partition, &initial);

        let result = compute_simulation(&lts, &partition, &initial, num_of_states);

        for s in 0..num_of_states {
            assert!(result.get(s, s), "The result must be reflexive");

            for t in 0..num_of_states {
                assert!(!result.get(s, t) || lifted.get(s, t), "The result must be contained in the initial relation");

                for u in 0..num_of_states {
                    assert!(
                        !(result.get(s, t) && result.get(t, u)) || result.get(s, u),
                        "The result must be transitive for a transitive initial relation"
                    );
                }
            }
        }

        // Running the algorithm on its own result does not change it.
        let again = compute_simulation(&lts, &singletons(num_of_states), &result, num_of_states);
        assert_eq!(again, result);
    });
}

#[test]
fn test_random_monotone_shrink() {
    random_test(100, |rng| {
        let lts = random_lts(rng, 12, 3, 2);
        let num_of_states = lts.num_of_states();
        let (partition, initial) = random_preorder(rng, num_of_states);

        let mut simulation = Simulation::new(&lts, SimulationOptions::default());
        simulation.init(&partition, &initial);

        let mut related = simulation.num_of_related_pairs();
        let mut num_of_blocks = simulation.num_of_blocks();
        while simulation.step() {
            let next = simulation.num_of_related_pairs();
            assert!(next <= related, "The number of related pairs increased from {related} to {next}");
            assert!(simulation.num_of_blocks() >= num_of_blocks, "Blocks are never merged");

            related = next;
            num_of_blocks = simulation.num_of_blocks();
        }

        assert_eq!(simulation.build_result(num_of_states).count_ones(), related);
    });
}
