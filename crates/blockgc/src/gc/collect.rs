//! Mark-sweep collection over the block pool.
//!
//! A collection runs in two phases:
//!
//! 1. **Mark** decides which examined objects survive. Full collections
//!    examine every object and use transitive reachability; generational
//!    collections examine one generation and use one-hop reachability.
//! 2. **Sweep** frees every examined object that was not marked and ages the
//!    survivors, promoting the ones that crossed their generation's threshold.
//!
//! # Promotion epochs
//!
//! Each collection has an epoch equal to the value the collection counter
//! holds once the collection is recorded (`total_collections + 1`). A
//! survivor's age is `epoch - last_collection_epoch` using the epoch stored
//! from its previous examination; the promotion decision is made on that age
//! and only then is `last_collection_epoch` overwritten with the current
//! epoch. An object moves at most one generation per collection.

use std::time::Instant;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::gc::mark::{mark_one_hop, mark_transitive};
use crate::metrics::{CollectionMetrics, CollectionScope, PhaseTimer};
use crate::object::{Generation, ManagedObject, ObjectId};
use crate::tracing::{
    log_mark_end, log_phase_start, log_promotion, log_sweep_end, next_gc_id, trace_gc_collection,
    trace_phase, GcPhase,
};

/// Run one collection of `scope` and record it in the engine's statistics.
pub fn collect<P>(heap: &mut Engine<P>, scope: CollectionScope) -> CollectionMetrics {
    let gc_id = next_gc_id();
    let _gc_span = trace_gc_collection(scope, gc_id);

    let start = Instant::now();
    let mut timer = PhaseTimer::new();
    let mut metrics = CollectionMetrics::new(scope);
    let epoch = heap.stats.total_collections + 1;
    let target = scope.generation();

    // 1. Mark Phase
    timer.start();
    let marked = {
        let _mark_span = trace_phase(GcPhase::Mark);
        log_phase_start(GcPhase::Mark, heap.objects.len());
        let marked = match target {
            None => mark_transitive(&heap.objects, &heap.roots),
            Some(generation) => mark_one_hop(&heap.objects, &heap.roots, generation),
        };
        log_mark_end(marked.len());
        marked
    };
    timer.end_mark();

    // 2. Sweep Phase
    timer.start();
    {
        let _sweep_span = trace_phase(GcPhase::Sweep);
        let examined: Vec<ObjectId> = heap
            .objects
            .iter()
            .filter(|o| target.is_none_or(|g| o.generation() == g))
            .map(ManagedObject::id)
            .collect();
        metrics.objects_examined = examined.len();
        log_phase_start(GcPhase::Sweep, examined.len());

        for &id in examined.iter().filter(|id| !marked.contains(id)) {
            if let Some(object) = free_object(heap, id) {
                metrics.objects_collected += 1;
                metrics.blocks_reclaimed += object.size();
            }
        }

        let config = heap.config;
        for object in heap.objects.iter_mut() {
            if examined.binary_search(&object.id).is_err() {
                continue;
            }
            metrics.objects_surviving += 1;
            if age_survivor(object, epoch, &config).is_some() {
                metrics.objects_promoted += 1;
            }
        }

        log_sweep_end(metrics.objects_collected, metrics.blocks_reclaimed);
    }
    timer.end_sweep();

    metrics.mark_duration = timer.mark;
    metrics.sweep_duration = timer.sweep;
    metrics.duration = start.elapsed();

    heap.stats.record(&metrics);
    metrics.total_collections = heap.stats.total_collections;
    heap.history.push(metrics);

    metrics
}

/// Age a survivor of the collection with the given epoch.
///
/// Returns the generation the object was promoted to, if it was.
fn age_survivor<P>(
    object: &mut ManagedObject<P>,
    epoch: u64,
    config: &EngineConfig,
) -> Option<Generation> {
    let age = epoch.saturating_sub(object.last_collection_epoch);
    object.last_collection_epoch = epoch;

    let threshold = match object.generation {
        Generation::Young => config.young_promotion_age,
        Generation::Middle => config.middle_promotion_age,
        Generation::Old => return None,
    };
    if age <= threshold {
        return None;
    }

    let from = object.generation;
    let to = from.next()?;
    object.generation = to;
    log_promotion(object.id, from, to, age);
    Some(to)
}

/// Free one object: release its blocks, drop its record and unroot it.
///
/// Returns the removed record, or `None` if `id` was not live.
pub fn free_object<P>(heap: &mut Engine<P>, id: ObjectId) -> Option<ManagedObject<P>> {
    let object = heap.objects.remove(id)?;
    heap.pool.release(&object.blocks);
    heap.roots.remove(id);
    Some(object)
}
