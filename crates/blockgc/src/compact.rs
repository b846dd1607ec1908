//! Sliding compaction.
//!
//! Every live object is moved, in allocation order, to the lowest free
//! offset, so the pool becomes one packed prefix of owned blocks followed by
//! one free run. Only block assignments change; ids, payloads, generations and
//! references are untouched.

use crate::engine::Engine;
use crate::tracing::log_compaction;

/// Summary of one compaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionReport {
    /// Objects whose blocks changed.
    pub objects_moved: usize,
    /// Blocks whose owner changed position.
    pub blocks_moved: usize,
}

/// Pack all live objects at the front of the pool.
///
/// Compacting an already compact pool changes nothing and reports zero
/// moves.
pub fn compact<P>(heap: &mut Engine<P>) -> CompactionReport {
    let mut report = CompactionReport::default();
    let mut offset = 0;

    heap.pool.clear();
    for object in heap.objects.iter_mut() {
        let size = object.size();
        let run = offset..offset + size;

        let moved = object
            .blocks
            .iter()
            .zip(run.clone())
            .filter(|(old, new)| **old != *new)
            .count();
        if moved > 0 {
            report.objects_moved += 1;
            report.blocks_moved += moved;
        }

        object.blocks.clear();
        object.blocks.extend(run.clone());
        heap.pool.claim(run, object.id);
        offset += size;
    }

    log_compaction(report.objects_moved, report.blocks_moved);
    report
}
