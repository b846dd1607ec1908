//! GC metrics and statistics.

use std::fmt;
use std::time::{Duration, Instant};

use crate::object::Generation;

/// What a collection examines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionScope {
    /// Full transitive mark-and-sweep over every object.
    #[default]
    All,
    /// One-hop sweep of the young generation.
    Young,
    /// One-hop sweep of the middle generation.
    Middle,
    /// One-hop sweep of the old generation.
    Old,
}

impl CollectionScope {
    /// The generation a partial collection targets, or `None` for a full one.
    #[must_use]
    pub const fn generation(self) -> Option<Generation> {
        match self {
            Self::All => None,
            Self::Young => Some(Generation::Young),
            Self::Middle => Some(Generation::Middle),
            Self::Old => Some(Generation::Old),
        }
    }

    /// Lower-case name, as used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Young => "young",
            Self::Middle => "middle",
            Self::Old => "old",
        }
    }
}

impl From<Generation> for CollectionScope {
    fn from(generation: Generation) -> Self {
        match generation {
            Generation::Young => Self::Young,
            Generation::Middle => Self::Middle,
            Generation::Old => Self::Old,
        }
    }
}

impl fmt::Display for CollectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Cumulative statistics
// ============================================================================

/// Cumulative collection counters for one engine.
///
/// Zero at construction and only ever increased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GcStats {
    /// Collections of any scope.
    pub total_collections: u64,
    /// Full collections.
    pub full_collections: u64,
    /// Young-generation collections, including those triggered by allocation.
    pub young_collections: u64,
    /// Middle-generation collections.
    pub middle_collections: u64,
    /// Old-generation collections.
    pub old_collections: u64,
    /// Objects freed by collections. Explicit frees are not counted.
    pub objects_collected: u64,
    /// Wall time spent collecting.
    pub time_spent: Duration,
}

impl GcStats {
    /// Create a new `GcStats` with all counters set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_collections: 0,
            full_collections: 0,
            young_collections: 0,
            middle_collections: 0,
            old_collections: 0,
            objects_collected: 0,
            time_spent: Duration::ZERO,
        }
    }

    /// Fold one finished collection into the counters.
    pub(crate) fn record(&mut self, metrics: &CollectionMetrics) {
        self.total_collections += 1;
        match metrics.scope {
            CollectionScope::All => self.full_collections += 1,
            CollectionScope::Young => self.young_collections += 1,
            CollectionScope::Middle => self.middle_collections += 1,
            CollectionScope::Old => self.old_collections += 1,
        }
        self.objects_collected += metrics.objects_collected as u64;
        self.time_spent += metrics.duration;
    }

    /// Number of collections of the given scope.
    #[must_use]
    pub const fn collections_of(&self, scope: CollectionScope) -> u64 {
        match scope {
            CollectionScope::All => self.full_collections,
            CollectionScope::Young => self.young_collections,
            CollectionScope::Middle => self.middle_collections,
            CollectionScope::Old => self.old_collections,
        }
    }
}

// ============================================================================
// Per-collection metrics
// ============================================================================

/// Statistics from a single collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionMetrics {
    /// Scope of the collection.
    pub scope: CollectionScope,
    /// Duration of the whole collection.
    pub duration: Duration,
    /// Duration of the mark phase.
    pub mark_duration: Duration,
    /// Duration of the sweep phase, promotion included.
    pub sweep_duration: Duration,
    /// Objects considered for collection.
    pub objects_examined: usize,
    /// Objects freed.
    pub objects_collected: usize,
    /// Examined objects that survived.
    pub objects_surviving: usize,
    /// Survivors moved to an older generation.
    pub objects_promoted: usize,
    /// Blocks returned to the pool.
    pub blocks_reclaimed: usize,
    /// Value of the collection counter after this collection.
    pub total_collections: u64,
}

impl CollectionMetrics {
    /// Create empty metrics for a collection of `scope`.
    #[must_use]
    pub const fn new(scope: CollectionScope) -> Self {
        Self {
            scope,
            duration: Duration::ZERO,
            mark_duration: Duration::ZERO,
            sweep_duration: Duration::ZERO,
            objects_examined: 0,
            objects_collected: 0,
            objects_surviving: 0,
            objects_promoted: 0,
            blocks_reclaimed: 0,
            total_collections: 0,
        }
    }
}

/// Internal helper for capturing phase durations.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimer {
    /// Accumulated mark phase time.
    pub mark: Duration,
    /// Accumulated sweep phase time.
    pub sweep: Duration,
    /// Start time of current phase.
    current_start: Option<Instant>,
}

impl PhaseTimer {
    /// Create a new `PhaseTimer` with all durations set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mark: Duration::ZERO,
            sweep: Duration::ZERO,
            current_start: None,
        }
    }

    /// Start timing a phase.
    pub fn start(&mut self) {
        self.current_start = Some(Instant::now());
    }

    /// End the mark phase and record its duration.
    pub fn end_mark(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.mark = start.elapsed();
        }
    }

    /// End the sweep phase and record its duration.
    pub fn end_sweep(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.sweep = start.elapsed();
        }
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// History
// ============================================================================

/// Ring buffer size for GC history.
pub const HISTORY_SIZE: usize = 64;

/// Fixed-size ring buffer of recent [`CollectionMetrics`].
///
/// Keeps the most recent 64 collections; older entries are overwritten.
#[derive(Debug, Clone)]
pub struct GcHistory {
    buffer: Vec<CollectionMetrics>,
    write_idx: usize,
}

impl Default for GcHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GcHistory {
    /// Create a new `GcHistory` with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(HISTORY_SIZE),
            write_idx: 0,
        }
    }

    /// Push a new metrics snapshot, overwriting the oldest one when full.
    pub(crate) fn push(&mut self, metrics: CollectionMetrics) {
        let slot = self.write_idx % HISTORY_SIZE;
        if slot < self.buffer.len() {
            self.buffer[slot] = metrics;
        } else {
            self.buffer.push(metrics);
        }
        self.write_idx += 1;
    }

    /// Get the total number of metrics recorded.
    ///
    /// This may exceed `HISTORY_SIZE` if more collections have occurred
    /// than the buffer can hold.
    #[inline]
    #[must_use]
    pub const fn total_recorded(&self) -> usize {
        self.write_idx
    }

    /// Most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<CollectionMetrics> {
        let idx = self.write_idx.checked_sub(1)?;
        self.buffer.get(idx % HISTORY_SIZE).copied()
    }

    /// Get the most recent N metrics snapshots, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<CollectionMetrics> {
        let total = self.total_recorded();
        let n = n.min(HISTORY_SIZE).min(total);
        (total - n..total)
            .map(|i| self.buffer[i % HISTORY_SIZE])
            .collect()
    }

    /// Average pause time over the most recent N collections.
    ///
    /// Returns `Duration::ZERO` if no collections have been recorded.
    #[must_use]
    pub fn average_pause_time(&self, n: usize) -> Duration {
        let recent = self.recent(n);
        if recent.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = recent.iter().map(|m| m.duration).sum();
        // `recent` holds at most HISTORY_SIZE entries.
        #[allow(clippy::cast_possible_truncation)]
        let count = recent.len() as u32;
        total / count
    }

    /// Maximum pause time over the most recent N collections.
    ///
    /// Returns `Duration::ZERO` if no collections have been recorded.
    #[must_use]
    pub fn max_pause_time(&self, n: usize) -> Duration {
        self.recent(n)
            .iter()
            .map(|m| m.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with(scope: CollectionScope, millis: u64) -> CollectionMetrics {
        let mut m = CollectionMetrics::new(scope);
        m.duration = Duration::from_millis(millis);
        m.objects_collected = 2;
        m
    }

    #[test]
    fn test_gc_stats_new_is_zero() {
        let stats = GcStats::new();
        assert_eq!(stats, GcStats::default());
        assert_eq!(stats.total_collections, 0);
        assert_eq!(stats.time_spent, Duration::ZERO);
    }

    #[test]
    fn test_gc_stats_record_routes_by_scope() {
        let mut stats = GcStats::new();
        stats.record(&metrics_with(CollectionScope::All, 1));
        stats.record(&metrics_with(CollectionScope::Young, 1));
        stats.record(&metrics_with(CollectionScope::Young, 1));
        stats.record(&metrics_with(CollectionScope::Old, 1));

        assert_eq!(stats.total_collections, 4);
        assert_eq!(stats.full_collections, 1);
        assert_eq!(stats.collections_of(CollectionScope::Young), 2);
        assert_eq!(stats.middle_collections, 0);
        assert_eq!(stats.old_collections, 1);
        assert_eq!(stats.objects_collected, 8);
        assert_eq!(stats.time_spent, Duration::from_millis(4));
    }

    #[test]
    fn test_phase_timer_captures_durations() {
        let mut timer = PhaseTimer::new();
        assert!(timer.current_start.is_none());

        timer.start();
        std::thread::sleep(Duration::from_millis(1));
        timer.end_mark();
        assert!(timer.mark > Duration::ZERO);
        assert!(timer.current_start.is_none());

        timer.start();
        std::thread::sleep(Duration::from_millis(1));
        timer.end_sweep();
        assert!(timer.sweep > Duration::ZERO);
    }

    #[test]
    fn test_gc_history_new() {
        let history = GcHistory::new();
        assert_eq!(history.total_recorded(), 0);
        assert!(history.last().is_none());
        assert!(history.recent(10).is_empty());
        assert_eq!(history.average_pause_time(10), Duration::ZERO);
        assert_eq!(history.max_pause_time(10), Duration::ZERO);
    }

    #[test]
    fn test_gc_history_wraps() {
        let mut history = GcHistory::new();
        for i in 0..(HISTORY_SIZE as u64 + 6) {
            history.push(metrics_with(CollectionScope::All, i));
        }
        assert_eq!(history.total_recorded(), HISTORY_SIZE + 6);
        assert_eq!(history.recent(1000).len(), HISTORY_SIZE);
        assert_eq!(
            history.last().map(|m| m.duration),
            Some(Duration::from_millis(HISTORY_SIZE as u64 + 5))
        );
        let recent = history.recent(2);
        assert_eq!(recent[0].duration, Duration::from_millis(HISTORY_SIZE as u64 + 4));
        assert_eq!(history.max_pause_time(3), Duration::from_millis(HISTORY_SIZE as u64 + 5));
    }

    #[test]
    fn test_gc_history_average() {
        let mut history = GcHistory::new();
        history.push(metrics_with(CollectionScope::Young, 2));
        history.push(metrics_with(CollectionScope::Young, 4));
        assert_eq!(history.average_pause_time(10), Duration::from_millis(3));
    }

    #[test]
    fn test_scope_from_generation() {
        assert_eq!(CollectionScope::from(Generation::Middle), CollectionScope::Middle);
        assert_eq!(CollectionScope::All.generation(), None);
        assert_eq!(CollectionScope::Old.generation(), Some(Generation::Old));
    }
}
