use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use simrel_collections::CountedSet;
use simrel_collections::SharedList;
use simrel_lts::LTS;
use simrel_lts::LabelIndex;
use simrel_lts::StateIndex;

use crate::BlockIndex;
use crate::StateRegistry;
use crate::SuccessorCounter;

/// A block of states that are simulation equivalent as far as the algorithm
/// has determined so far.
///
/// The `bigger` blocks are the blocks that (possibly) simulate this block, and
/// `smaller` is the converse. Both contain the block itself.
#[derive(Debug)]
pub struct Block {
    /// The head of the list of states in this block, only empty during a split.
    pub(crate) states: Option<StateIndex>,

    /// The states that are being moved out of this block by a split.
    pub(crate) moved: Option<StateIndex>,

    /// The labels of the incoming transitions of the states in this block,
    /// counted per state.
    pub(crate) inset: CountedSet<LabelIndex>,

    pub(crate) counter: SuccessorCounter,

    /// The states that can no longer simulate the states of this block, per label.
    pub(crate) remove: FxHashMap<LabelIndex, SharedList>,

    pub(crate) bigger: FxHashSet<BlockIndex>,
    pub(crate) smaller: FxHashSet<BlockIndex>,
}

impl Block {
    /// Creates a block consisting of the list of states starting at `head`, and
    /// assigns these states to the block.
    pub fn new(lts: &impl LTS, block_index: BlockIndex, head: Option<StateIndex>, registry: &mut StateRegistry) -> Self {
        let mut block = Self::empty(head);

        // The registry is updated while traversing, so the list iterator cannot be used.
        let mut current = head;
        while let Some(state_index) = current {
            registry.set_block(state_index, block_index);
            for label in lts.incoming_labels(state_index) {
                block.inset.insert(label);
            }

            let next = registry.next(state_index);
            current = if Some(next) == head { None } else { Some(next) };
        }

        block
    }

    /// Creates a block from the states that were moved out of `parent`. The
    /// incoming labels of these states are transferred from the parent.
    pub fn split_from(
        lts: &impl LTS,
        block_index: BlockIndex,
        parent: &mut Block,
        registry: &mut StateRegistry,
    ) -> Self {
        let head = parent.moved.take();
        debug_assert!(head.is_some(), "Cannot split a block without moved states");

        let block = Self::new(lts, block_index, head, registry);
        for state_index in registry.iter_list(head) {
            for label in lts.incoming_labels(state_index) {
                parent.inset.remove_strict(&label);
            }
        }

        block
    }

    /// Returns true iff `other` (possibly) simulates this block.
    pub fn is_related(&self, other: BlockIndex) -> bool {
        self.bigger.contains(&other)
    }

    /// Returns the head of the list of states in this block.
    pub fn head(&self) -> Option<StateIndex> {
        self.states
    }

    /// Returns the distinct labels of the incoming transitions.
    pub fn inset(&self) -> impl Iterator<Item = LabelIndex> + '_ {
        self.inset.iter().copied()
    }

    /// Returns the blocks that (possibly) simulate this block.
    pub fn bigger(&self) -> impl Iterator<Item = BlockIndex> + '_ {
        self.bigger.iter().copied()
    }

    fn empty(head: Option<StateIndex>) -> Self {
        Self {
            states: head,
            moved: None,
            inset: CountedSet::new(),
            counter: SuccessorCounter::new(),
            remove: FxHashMap::default(),
            bigger: FxHashSet::default(),
            smaller: FxHashSet::default(),
        }
    }
}

/// Formats the states of a block, which are stored in the registry.
pub(crate) struct DisplayBlock<'a> {
    pub(crate) block: &'a Block,
    pub(crate) registry: &'a StateRegistry,
}

impl fmt::Display for DisplayBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.registry.iter_list(self.block.states).format(", ")
        )
    }
}
