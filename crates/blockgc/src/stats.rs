//! Heap statistics.
//!
//! Everything here is recomputed from the current pool and table on every
//! call; nothing is cached.

use crate::metrics::GcStats;
use crate::object::{Generation, ObjectTable};
use crate::pool::BlockPool;

/// Live object count per generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationCounts {
    /// Young objects.
    pub young: usize,
    /// Middle objects.
    pub middle: usize,
    /// Old objects.
    pub old: usize,
}

impl GenerationCounts {
    /// Count the objects of each generation in `table`.
    #[must_use]
    pub fn of<P>(table: &ObjectTable<P>) -> Self {
        let mut counts = Self::default();
        for object in table.iter() {
            match object.generation() {
                Generation::Young => counts.young += 1,
                Generation::Middle => counts.middle += 1,
                Generation::Old => counts.old += 1,
            }
        }
        counts
    }

    /// Count for one generation.
    #[must_use]
    pub const fn get(&self, generation: Generation) -> usize {
        match generation {
            Generation::Young => self.young,
            Generation::Middle => self.middle,
            Generation::Old => self.old,
        }
    }

    /// Sum over all generations.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.young + self.middle + self.old
    }
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapStats {
    /// Pool capacity.
    pub total_blocks: usize,
    /// Owned blocks.
    pub allocated_blocks: usize,
    /// Empty blocks.
    pub free_blocks: usize,
    /// Longest run of empty blocks.
    pub largest_free_run: usize,
    /// `1 - largest_free_run / free_blocks`, or 0 when nothing is free.
    pub fragmentation: f64,
    /// Live objects per generation.
    pub generations: GenerationCounts,
    /// Cumulative collection counters.
    pub gc: GcStats,
}

impl HeapStats {
    /// Gather statistics from the current state.
    #[must_use]
    pub fn collect<P>(pool: &BlockPool, table: &ObjectTable<P>, gc: GcStats) -> Self {
        let free_blocks = pool.free_blocks();
        let largest_free_run = pool.largest_free_run();
        Self {
            total_blocks: pool.len(),
            allocated_blocks: pool.len() - free_blocks,
            free_blocks,
            largest_free_run,
            fragmentation: fragmentation(largest_free_run, free_blocks),
            generations: GenerationCounts::of(table),
            gc,
        }
    }
}

/// Fragmentation of the free space, in `[0, 1]`.
///
/// Zero when all free blocks form one run or when nothing is free; close to
/// one when free space is scattered into many small runs.
#[must_use]
pub fn fragmentation(largest_free_run: usize, free_blocks: usize) -> f64 {
    if free_blocks == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = largest_free_run as f64 / free_blocks as f64;
    1.0 - ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragmentation_bounds() {
        assert!(fragmentation(0, 0).abs() < f64::EPSILON);
        assert!(fragmentation(8, 8).abs() < f64::EPSILON);
        assert!((fragmentation(3, 8) - (1.0 - 3.0 / 8.0)).abs() < f64::EPSILON);
        assert!((fragmentation(1, 4) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_pool_stats() {
        let pool = BlockPool::new(12);
        let table: ObjectTable<()> = ObjectTable::new();
        let stats = HeapStats::collect(&pool, &table, GcStats::new());
        assert_eq!(stats.total_blocks, 12);
        assert_eq!(stats.free_blocks, 12);
        assert_eq!(stats.allocated_blocks, 0);
        assert_eq!(stats.largest_free_run, 12);
        assert_eq!(stats.generations.total(), 0);
        assert!(stats.fragmentation.abs() < f64::EPSILON);
    }
}
