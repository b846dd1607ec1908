//! Error types.
//!
//! Only allocation and configuration can fail. Operations on unknown object
//! ids are not errors; they report [`Outcome::Ignored`](crate::Outcome) or an
//! empty result instead.

use thiserror::Error;

use crate::object::ObjectId;

/// Failure to allocate an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// No contiguous run of free blocks was large enough, even after one
    /// young-generation collection.
    #[error(
        "out of memory: no run of {requested} free blocks \
         ({free_blocks} free, largest run {largest_free_run})"
    )]
    OutOfMemory {
        /// Number of blocks requested.
        requested: usize,
        /// Free blocks left after the retry collection.
        free_blocks: usize,
        /// Longest free run left after the retry collection.
        largest_free_run: usize,
    },
}

/// Rejected [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The block pool must hold at least one block.
    #[error("block pool capacity must be greater than zero")]
    ZeroCapacity,
    /// Middle objects would promote sooner than young ones.
    #[error("middle promotion age ({middle}) must not be smaller than young promotion age ({young})")]
    InvalidPromotionAge {
        /// Configured young promotion age.
        young: u64,
        /// Configured middle promotion age.
        middle: u64,
    },
}

/// An inconsistency between the block pool, the object table and the root set.
///
/// Reported by [`Engine::verify`](crate::Engine::verify). A correct engine
/// never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapCorruption {
    /// A slot is owned by an id that is not in the object table.
    #[error("block {block} is owned by unknown object {owner}")]
    OrphanBlock {
        /// Slot index.
        block: usize,
        /// Recorded owner.
        owner: ObjectId,
    },
    /// An object lists a block whose slot does not name it as owner.
    #[error("object {id} lists block {block} but the pool disagrees")]
    OwnershipMismatch {
        /// Object that claims the block.
        id: ObjectId,
        /// Slot index.
        block: usize,
    },
    /// An object lists a block outside the pool.
    #[error("object {id} lists block {block} beyond the pool of {total_blocks}")]
    BlockOutOfRange {
        /// Object that claims the block.
        id: ObjectId,
        /// Slot index.
        block: usize,
        /// Pool capacity.
        total_blocks: usize,
    },
    /// Owned blocks and free blocks do not add up to the pool size.
    #[error("{owned} owned + {free} free blocks != {total_blocks} total")]
    BlockAccounting {
        /// Sum of all object sizes.
        owned: usize,
        /// Empty slots.
        free: usize,
        /// Pool capacity.
        total_blocks: usize,
    },
    /// A root id has no object.
    #[error("root {0} does not name a live object")]
    DanglingRoot(ObjectId),
}
