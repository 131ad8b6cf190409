use std::time::Instant;

use log::debug;
use simrel_collections::BinaryRelation;
use simrel_lts::LTS;
use simrel_lts::StateIndex;

use crate::Simulation;
use crate::SimulationOptions;
use crate::validate_input;

/// Computes the coarsest simulation preorder that is contained in the
/// preorder given by the initial `partition` and the `relation` on its
/// classes, where `relation.get(i, j)` means that the states of class `j` may
/// simulate the states of class `i`.
///
/// Returns the relation on the first `output_size` states where (s, t) is
/// set iff `t` simulates `s`.
///
/// # Panics
///
/// In debug builds the partition and relation are checked by [validate_input].
pub fn compute_simulation<L: LTS>(
    lts: &L,
    partition: &[Vec<StateIndex>],
    relation: &BinaryRelation,
    output_size: usize,
) -> BinaryRelation {
    compute_simulation_with(lts, partition, relation, output_size, SimulationOptions::default())
}

/// Same as [compute_simulation], but with the given options.
pub fn compute_simulation_with<L: LTS>(
    lts: &L,
    partition: &[Vec<StateIndex>],
    relation: &BinaryRelation,
    output_size: usize,
    options: SimulationOptions,
) -> BinaryRelation {
    if lts.num_of_states() == 0 {
        return BinaryRelation::empty();
    }

    if cfg!(debug_assertions) {
        if let Err(error) = validate_input(lts.num_of_states(), partition, relation) {
            panic!("Invalid input for the simulation algorithm: {error}");
        }
    }

    let start = Instant::now();
    let mut simulation = Simulation::new(lts, options);
    simulation.init(partition, relation);
    simulation.run();

    let result = simulation.build_result(output_size);
    debug!("Time compute_simulation: {:.3}s", start.elapsed().as_secs_f64());
    result
}

/// Computes the simulation preorder on all states of the given transition system.
pub fn simulation_preorder<L: LTS>(lts: &L) -> BinaryRelation {
    let partition: Vec<Vec<StateIndex>> = vec![lts.iter_states().collect()];
    compute_simulation(lts, &partition, &BinaryRelation::new(1, true), lts.num_of_states())
}
