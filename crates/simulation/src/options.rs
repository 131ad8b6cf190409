/// The order in which the pending (block, label) pairs are processed.
///
/// The computed relation does not depend on the order, but the intermediate
/// partitions and the running time do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum WorkOrder {
    /// Process the most recently added pair first.
    #[default]
    Lifo,
    /// Process the pairs in the order in which they were added.
    Fifo,
}

/// Options for the simulation algorithm.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationOptions {
    /// The order in which pending remove sets are processed.
    pub order: WorkOrder,
}

impl SimulationOptions {
    /// Returns the options with the given work order.
    pub fn with_order(order: WorkOrder) -> Self {
        Self { order }
    }
}
