//! GC tracing support.
//!
//! When the `tracing` feature is enabled, this module provides structured
//! tracing spans and events for engine operations. Without it every helper is
//! a no-op so call sites need no `cfg` of their own.

#[cfg(feature = "tracing")]
pub mod internal {
    use std::sync::atomic::{AtomicU64, Ordering};
    use tracing::{span, Level};

    use crate::metrics::CollectionScope;
    use crate::object::{Generation, ObjectId};

    /// Phases of a collection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum GcPhase {
        /// Decide which objects survive.
        Mark,
        /// Free the rest and promote survivors.
        Sweep,
    }

    /// Stable identifier for a GC run.
    ///
    /// Correlates all events within a single collection. Monotonically
    /// increasing across every engine in the process.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GcId(pub u64);

    static NEXT_GC_ID: AtomicU64 = AtomicU64::new(1);

    /// Generate the next unique GC ID.
    pub fn next_gc_id() -> GcId {
        GcId(NEXT_GC_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a span for the entire GC collection.
    pub fn trace_gc_collection(scope: CollectionScope, gc_id: GcId) -> span::EnteredSpan {
        span!(
            Level::DEBUG,
            "gc_collect",
            scope = scope.as_str(),
            gc_id = gc_id.0
        )
        .entered()
    }

    /// Create a span for a GC phase.
    pub fn trace_phase(phase: GcPhase) -> span::EnteredSpan {
        span!(Level::DEBUG, "gc_phase", phase = ?phase).entered()
    }

    /// Log the start of a GC phase.
    pub fn log_phase_start(phase: GcPhase, objects: usize) {
        tracing::debug!(phase = ?phase, objects, "phase_start");
    }

    /// Log the end of the mark phase.
    pub fn log_mark_end(objects_marked: usize) {
        tracing::debug!(phase = ?GcPhase::Mark, objects_marked, "phase_end");
    }

    /// Log the end of the sweep phase.
    pub fn log_sweep_end(objects_collected: usize, blocks_reclaimed: usize) {
        tracing::debug!(
            phase = ?GcPhase::Sweep,
            objects_collected,
            blocks_reclaimed,
            "phase_end"
        );
    }

    /// Log a promotion.
    pub fn log_promotion(id: ObjectId, from: Generation, to: Generation, age: u64) {
        tracing::trace!(
            id = id.get(),
            from = from.as_str(),
            to = to.as_str(),
            age,
            "promotion"
        );
    }

    /// Log a successful allocation.
    pub fn log_allocation(id: ObjectId, size: usize, first_block: usize) {
        tracing::debug!(id = id.get(), size, first_block, "allocation");
    }

    /// Log that an allocation found no room and is collecting before retrying.
    pub fn log_allocation_retry(size: usize, free_blocks: usize) {
        tracing::debug!(size, free_blocks, "allocation_retry");
    }

    /// Log an allocation that failed after the retry.
    pub fn log_out_of_memory(size: usize, free_blocks: usize, largest_free_run: usize) {
        tracing::warn!(size, free_blocks, largest_free_run, "out_of_memory");
    }

    /// Log a finished compaction.
    pub fn log_compaction(objects_moved: usize, blocks_moved: usize) {
        tracing::debug!(objects_moved, blocks_moved, "compaction");
    }
}

#[cfg(not(feature = "tracing"))]
#[allow(clippy::missing_const_for_fn)]
pub mod internal {
    use crate::metrics::CollectionScope;
    use crate::object::{Generation, ObjectId};

    /// Stub type when tracing is disabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum GcPhase {
        /// Decide which objects survive.
        Mark,
        /// Free the rest and promote survivors.
        Sweep,
    }

    /// Stub type when tracing is disabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GcId(pub u64);

    /// Stub guard when tracing is disabled.
    #[derive(Debug)]
    pub struct NoSpan;

    /// Stub function when tracing is disabled.
    pub fn next_gc_id() -> GcId {
        GcId(0)
    }

    /// Stub function when tracing is disabled.
    pub fn trace_gc_collection(_scope: CollectionScope, _gc_id: GcId) -> NoSpan {
        NoSpan
    }

    /// Stub function when tracing is disabled.
    pub fn trace_phase(_phase: GcPhase) -> NoSpan {
        NoSpan
    }

    /// Stub function when tracing is disabled.
    pub fn log_phase_start(_phase: GcPhase, _objects: usize) {}

    /// Stub function when tracing is disabled.
    pub fn log_mark_end(_objects_marked: usize) {}

    /// Stub function when tracing is disabled.
    pub fn log_sweep_end(_objects_collected: usize, _blocks_reclaimed: usize) {}

    /// Stub function when tracing is disabled.
    pub fn log_promotion(_id: ObjectId, _from: Generation, _to: Generation, _age: u64) {}

    /// Stub function when tracing is disabled.
    pub fn log_allocation(_id: ObjectId, _size: usize, _first_block: usize) {}

    /// Stub function when tracing is disabled.
    pub fn log_allocation_retry(_size: usize, _free_blocks: usize) {}

    /// Stub function when tracing is disabled.
    pub fn log_out_of_memory(_size: usize, _free_blocks: usize, _largest_free_run: usize) {}

    /// Stub function when tracing is disabled.
    pub fn log_compaction(_objects_moved: usize, _blocks_moved: usize) {}
}

pub use internal::*;
