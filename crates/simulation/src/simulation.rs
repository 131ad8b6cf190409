use std::collections::VecDeque;
use std::collections::hash_map::Entry;
use std::fmt;
use std::time::Instant;

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;
use itertools::Itertools;
use log::debug;
use log::trace;
use simrel_collections::BinaryRelation;
use simrel_collections::SharedListPool;
use simrel_lts::Delta;
use simrel_lts::LTS;
use simrel_lts::LabelIndex;
use simrel_lts::StateIndex;

use crate::Block;
use crate::BlockIndex;
use crate::DisplayBlock;
use crate::Partition;
use crate::SimulationOptions;
use crate::StateRegistry;
use crate::WorkOrder;

/// Computes the coarsest simulation preorder contained in an initial preorder
/// by refining a partition of the states together with a relation on its
/// blocks.
///
/// Every block `B` keeps for every incoming label `a` the set remove(B, a) of
/// states that have an `a`-transition, but none into a block that simulates
/// `B`. These states can no longer simulate the `a`-predecessors of `B`. The
/// pending (block, label) pairs are processed until no remove set is left,
/// after which the block relation is the simulation preorder.
pub struct Simulation<'a, L: LTS> {
    lts: &'a L,
    options: SimulationOptions,

    states: StateRegistry,
    blocks: Vec<Block>,

    /// The (block, label) pairs with a pending remove set.
    queue: VecDeque<(BlockIndex, LabelIndex)>,
    pool: SharedListPool<StateIndex>,

    /// Marks blocks while collecting distinct blocks, it is cleared after every use.
    block_mask: BitVec<usize, Lsb0>,

    /// Reused buffers.
    removed: Vec<StateIndex>,
    labels: Vec<LabelIndex>,

    num_of_steps: usize,
}

impl<'a, L: LTS> Simulation<'a, L> {
    /// Creates the algorithm for the given transition system, it has no blocks until [Self::init] is called.
    pub fn new(lts: &'a L, options: SimulationOptions) -> Self {
        Self {
            lts,
            options,
            states: StateRegistry::new(lts.num_of_states()),
            blocks: Vec::new(),
            queue: VecDeque::new(),
            pool: SharedListPool::new(),
            block_mask: BitVec::new(),
            removed: Vec::new(),
            labels: Vec::new(),
            num_of_steps: 0,
        }
    }

    /// Sets up the blocks from the initial partition and the relation on its
    /// classes, where `relation.get(i, j)` means that class `j` may simulate
    /// class `i`. Afterwards all initial remove sets are queued.
    pub fn init(&mut self, partition: &[Vec<StateIndex>], relation: &BinaryRelation) {
        debug_assert!(self.blocks.is_empty(), "The simulation can only be initialised once");
        debug_assert_eq!(
            relation.size(),
            partition.len(),
            "The relation must be defined on the classes of the partition"
        );

        let start = Instant::now();
        let delta = Delta::new(self.lts);

        for class in partition {
            debug_assert!(!class.is_empty(), "Classes of the initial partition cannot be empty");
            let head = self.states.make_list(class);
            let block = Block::new(self.lts, BlockIndex::new(self.blocks.len()), head, &mut self.states);
            self.blocks.push(block);
        }

        for (block_index, related) in relation.build_index().into_iter().enumerate() {
            self.blocks[block_index]
                .bigger
                .extend(related.into_iter().map(BlockIndex::new));
        }

        // Separate the states that enable a label from the ones that do not.
        for label in self.lts.iter_labels() {
            self.fast_split(delta.sources(label));
        }

        debug!(
            "Refined {} initial classes into {} blocks",
            partition.len(),
            self.blocks.len()
        );

        // All states in a block now enable the same labels, so a block that
        // lacks a label enabled in another block cannot simulate it.
        let mut enabled: Vec<Vec<LabelIndex>> = vec![Vec::new(); self.blocks.len()];
        let mut disabled: Vec<Vec<BlockIndex>> = vec![Vec::new(); self.lts.num_of_labels()];
        for (block_index, block) in self.blocks.iter().enumerate() {
            if let Some(state_index) = block.head() {
                for label in self.lts.iter_labels() {
                    if delta.is_enabled(state_index, label) {
                        enabled[block_index].push(label);
                    } else {
                        disabled[label].push(BlockIndex::new(block_index));
                    }
                }
            }
        }

        for (block_index, labels) in enabled.iter().enumerate() {
            for label in labels {
                for other in &disabled[*label] {
                    debug_assert_ne!(block_index, other.value(), "A block must be uniform in its enabled labels");
                    self.blocks[block_index].bigger.remove(other);
                }
            }
        }

        for block_index in (0..self.blocks.len()).map(BlockIndex::new) {
            let bigger: Vec<BlockIndex> = self.blocks[block_index].bigger().collect();
            for other in bigger {
                self.blocks[other].smaller.insert(block_index);
            }
        }

        // Initialise the counters, and queue the initial remove sets.
        let mut labels = std::mem::take(&mut self.labels);
        for block_index in (0..self.blocks.len()).rev().map(BlockIndex::new) {
            labels.clear();
            labels.extend(self.blocks[block_index].inset());

            for label in &labels {
                self.removed.clear();

                for state_index in delta.sources(*label) {
                    for target in self.lts.post(*state_index, *label) {
                        let target_block = self.states.block(*target);
                        let block = &mut self.blocks[block_index];
                        if block.is_related(target_block) {
                            block.counter.incr(*label, *state_index);
                        }
                    }

                    if self.blocks[block_index].counter.get(*label, *state_index) == 0 {
                        self.removed.push(*state_index);
                    }
                }

                if !self.removed.is_empty() {
                    let list = self.pool.list_from_iter(self.removed.iter().copied());
                    self.blocks[block_index].remove.insert(*label, list);
                    self.queue.push_back((block_index, *label));
                }
            }
        }
        self.labels = labels;

        debug!(
            "Initialised {} blocks with {} pending remove sets",
            self.blocks.len(),
            self.queue.len()
        );
        debug!("Time simulation init: {:.3}s", start.elapsed().as_secs_f64());
    }

    /// Processes a single pending remove set, returns false iff there was none.
    pub fn step(&mut self) -> bool {
        let next = match self.options.order {
            WorkOrder::Lifo => self.queue.pop_back(),
            WorkOrder::Fifo => self.queue.pop_front(),
        };

        let Some((block_index, label)) = next else {
            return false;
        };

        self.process_remove(block_index, label);
        self.num_of_steps += 1;
        true
    }

    /// Processes remove sets until there are none left.
    pub fn run(&mut self) {
        let start = Instant::now();
        while self.step() {}

        debug!(
            "Processed {} remove sets, resulting in {} blocks",
            self.num_of_steps,
            self.blocks.len()
        );
        debug!("Time simulation run: {:.3}s", start.elapsed().as_secs_f64());
    }

    /// Returns the relation on the first `output_size` states, where (i, j) is
    /// in the relation iff state `j` simulates state `i`.
    pub fn build_result(&self, output_size: usize) -> BinaryRelation {
        debug_assert!(
            output_size <= self.lts.num_of_states(),
            "The output size {output_size} exceeds the number of states {}",
            self.lts.num_of_states()
        );

        let mut result = BinaryRelation::new(output_size, false);
        for i in (0..output_size).map(StateIndex::new) {
            let block = &self.blocks[self.block_number(i)];

            for j in (0..output_size).map(StateIndex::new) {
                if block.is_related(self.block_number(j)) {
                    result.set(i.value(), j.value(), true);
                }
            }
        }

        result
    }

    /// Returns the number of state pairs (s, t) such that the block of `t`
    /// (possibly) simulates the block of `s`.
    pub fn num_of_related_pairs(&self) -> usize {
        let sizes: Vec<usize> = self
            .blocks
            .iter()
            .map(|block| self.states.list_len(block.head()))
            .collect();

        self.blocks
            .iter()
            .enumerate()
            .map(|(block_index, block)| block.bigger().map(|other| sizes[block_index] * sizes[other]).sum::<usize>())
            .sum()
    }

    /// Returns the number of remove sets that are still pending.
    pub fn num_of_pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns the block with the given index.
    pub fn block(&self, block_index: BlockIndex) -> &Block {
        &self.blocks[block_index]
    }

    /// Returns true iff the internal structures are consistent: the relation
    /// is reflexive, `smaller` is the converse of `bigger` and every state is in
    /// the list of its block. This takes quadratic time in the number of blocks.
    pub fn is_consistent(&self) -> bool {
        for (block_index, block) in self.blocks.iter().enumerate().map(|(i, b)| (BlockIndex::new(i), b)) {
            if !block.is_related(block_index) || !block.smaller.contains(&block_index) {
                return false;
            }

            if block.bigger().any(|other| !self.blocks[other].smaller.contains(&block_index))
                || block
                    .smaller
                    .iter()
                    .any(|other| !self.blocks[*other].is_related(block_index))
            {
                return false;
            }

            if block.head().is_none()
                || block.moved.is_some()
                || self
                    .states
                    .iter_list(block.head())
                    .any(|state_index| self.states.block(state_index) != block_index)
            {
                return false;
            }
        }

        self.blocks.iter().map(|block| self.states.list_len(block.head())).sum::<usize>() == self.lts.num_of_states()
    }

    /// Handles the remove set of the given block and label. The states in the
    /// remove set are split off from their blocks, after which the blocks
    /// containing them can no longer simulate any block with a `label`
    /// successor in the given block.
    fn process_remove(&mut self, block_index: BlockIndex, label: LabelIndex) {
        let Some(remove) = self.blocks[block_index].remove.remove(&label) else {
            debug_assert!(false, "There is no remove set for ({block_index}, {label})");
            return;
        };

        // The predecessor blocks are determined before the split.
        let pre_list = self.build_pre(block_index, label);

        let mut removed = std::mem::take(&mut self.removed);
        removed.clear();
        removed.extend(self.pool.iter(&remove).copied());
        self.pool.release(remove);
        trace!("Processing remove({block_index}, {label}) with {} states", removed.len());

        let remove_list = self.split(&removed);
        self.removed = removed;

        let mut labels = std::mem::take(&mut self.labels);
        for &smaller in &pre_list {
            for &bigger in &remove_list {
                debug_assert_ne!(smaller, bigger, "A predecessor block cannot be removed");
                if !self.erase_if_related(smaller, bigger) {
                    continue;
                }

                // Only the labels with counters in `smaller` are affected.
                labels.clear();
                let smaller_inset = &self.blocks[smaller].inset;
                labels.extend(self.blocks[bigger].inset().filter(|incoming| smaller_inset.contains(incoming)));

                for incoming in &labels {
                    for state_index in self.states.iter_list(self.blocks[bigger].head()) {
                        for source in self.lts.pre(state_index, *incoming) {
                            let block = &mut self.blocks[smaller];
                            if block.counter.decr(*incoming, *source) > 0 {
                                continue;
                            }

                            match block.remove.entry(*incoming) {
                                Entry::Occupied(mut entry) => self.pool.push(entry.get_mut(), *source),
                                Entry::Vacant(entry) => {
                                    entry.insert(self.pool.list_from_iter([*source]));
                                    self.queue.push_back((smaller, *incoming));
                                }
                            }
                        }
                    }
                }
            }
        }
        self.labels = labels;
    }

    /// Returns the distinct blocks that contain a `label` predecessor of a state in the given block.
    fn build_pre(&mut self, block_index: BlockIndex, label: LabelIndex) -> Vec<BlockIndex> {
        self.grow_block_mask();

        let mut result = Vec::new();
        for state_index in self.states.iter_list(self.blocks[block_index].head()) {
            for source in self.lts.pre(state_index, label) {
                let source_block = self.states.block(*source);
                if !self.block_mask[source_block.value()] {
                    self.block_mask.set(source_block.value(), true);
                    result.push(source_block);
                }
            }
        }

        for block_index in &result {
            self.block_mask.set(block_index.value(), false);
        }

        result
    }

    /// Moves the given states to the `moved` list of their block, and returns
    /// the distinct blocks that were affected.
    fn internal_split(&mut self, removed: &[StateIndex]) -> Vec<BlockIndex> {
        self.grow_block_mask();

        let mut touched = Vec::new();
        for state_index in removed {
            let block_index = self.states.block(*state_index);
            let block = &mut self.blocks[block_index];
            self.states.move_state(*state_index, &mut block.states, &mut block.moved);

            if !self.block_mask[block_index.value()] {
                self.block_mask.set(block_index.value(), true);
                touched.push(block_index);
            }
        }

        for block_index in &touched {
            self.block_mask.set(block_index.value(), false);
        }

        touched
    }

    /// Splits the blocks by the given states without maintaining any counters
    /// or remove sets. A new block is related to the same blocks as its parent,
    /// and both are related to each other.
    fn fast_split(&mut self, removed: &[StateIndex]) {
        for parent in self.internal_split(removed) {
            if self.check_empty(parent) {
                continue;
            }

            let new_index = BlockIndex::new(self.blocks.len());
            let mut block = Block::split_from(self.lts, new_index, &mut self.blocks[parent], &mut self.states);

            for other in &mut self.blocks {
                if other.is_related(parent) {
                    other.bigger.insert(new_index);
                }
            }

            block.bigger = self.blocks[parent].bigger.clone();
            block.bigger.insert(new_index);
            self.blocks.push(block);
        }
    }

    /// Splits the blocks by the given states, and returns the blocks that
    /// consist of exactly the given states.
    ///
    /// A new block inherits the relation, the counters and the remove sets of
    /// its parent for the labels of its incoming transitions. The remove sets
    /// are shared and the new block is queued for them.
    fn split(&mut self, removed: &[StateIndex]) -> Vec<BlockIndex> {
        let touched = self.internal_split(removed);
        let mut remove_list = Vec::with_capacity(touched.len());

        for parent in touched {
            if self.check_empty(parent) {
                remove_list.push(parent);
                continue;
            }

            let new_index = BlockIndex::new(self.blocks.len());
            let mut block = Block::split_from(self.lts, new_index, &mut self.blocks[parent], &mut self.states);

            block.bigger = self.blocks[parent].bigger.clone();
            block.smaller = self.blocks[parent].smaller.clone();
            for other in &block.bigger {
                self.blocks[*other].smaller.insert(new_index);
            }
            for other in &block.smaller {
                self.blocks[*other].bigger.insert(new_index);
            }
            block.bigger.insert(new_index);
            block.smaller.insert(new_index);

            let parent_block = &self.blocks[parent];
            for label in block.inset.iter() {
                block.counter.copy_row(*label, &parent_block.counter);

                if let Some(list) = parent_block.remove.get(label) {
                    block.remove.insert(*label, self.pool.share(list));
                    self.queue.push_back((new_index, *label));
                }
            }

            trace!("Split block {parent} into {parent} and {new_index}");
            self.blocks.push(block);
            remove_list.push(new_index);
        }

        remove_list
    }

    /// When all states were moved out of the block, they are moved back and
    /// true is returned.
    fn check_empty(&mut self, block_index: BlockIndex) -> bool {
        let block = &mut self.blocks[block_index];
        if block.states.is_none() {
            block.states = block.moved.take();
            true
        } else {
            false
        }
    }

    /// Removes the pair (smaller, bigger) from the block relation, returns
    /// true iff the pair was present.
    fn erase_if_related(&mut self, smaller: BlockIndex, bigger: BlockIndex) -> bool {
        if !self.blocks[smaller].bigger.remove(&bigger) {
            return false;
        }

        let removed = self.blocks[bigger].smaller.remove(&smaller);
        debug_assert!(removed, "The converse relation must contain ({bigger}, {smaller})");
        true
    }

    fn grow_block_mask(&mut self) {
        if self.block_mask.len() < self.blocks.len() {
            self.block_mask.resize(self.blocks.len(), false);
        }
    }
}

impl<L: LTS> Partition for Simulation<'_, L> {
    fn block_number(&self, state_index: StateIndex) -> BlockIndex {
        self.states.block(state_index)
    }

    fn num_of_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn len(&self) -> usize {
        self.lts.num_of_states()
    }
}

impl<L: LTS> fmt::Display for Simulation<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (block_index, block) in self.blocks.iter().enumerate() {
            writeln!(
                f,
                "{block_index}: {} <= [{}]",
                DisplayBlock {
                    block,
                    registry: &self.states
                },
                block.bigger().sorted().format(", ")
            )?;
        }

        Ok(())
    }
}
