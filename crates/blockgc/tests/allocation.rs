//! Allocation tests: first-fit placement, zero-sized objects, out-of-memory
//! handling and the single young collection on exhaustion.

use blockgc::{AllocError, CollectionScope, Engine, EngineConfig, Generation, Slot};

fn engine(total_blocks: usize) -> Engine<&'static str> {
    Engine::with_config(EngineConfig::new().total_blocks(total_blocks)).unwrap()
}

#[test]
fn test_new_object_is_young_and_contiguous() {
    let mut engine = engine(16);
    let a = engine.allocate("a", 4, []).unwrap();
    let b = engine.allocate("b", 3, []).unwrap();

    assert_eq!(engine.object_generation(a), Some(Generation::Young));
    assert_eq!(engine.object_blocks(a), &[0, 1, 2, 3]);
    assert_eq!(engine.object_blocks(b), &[4, 5, 6]);
    assert_eq!(engine.object(a).map(|o| o.last_collection_epoch()), Some(0));
    assert_eq!(engine.payload(b), Some(&"b"));
    engine.verify().unwrap();
}

#[test]
fn test_ids_are_unique_and_not_reused() {
    let mut engine = engine(4);
    let a = engine.allocate("a", 1, []).unwrap();
    engine.free(a);
    let b = engine.allocate("b", 1, []).unwrap();
    assert_ne!(a, b);
    assert_eq!(engine.object_blocks(b), &[0]);
}

#[test]
fn test_first_fit_reuses_leftmost_hole() {
    let mut engine = engine(10);
    let a = engine.allocate("a", 2, []).unwrap();
    let _b = engine.allocate("b", 2, []).unwrap();
    let c = engine.allocate("c", 3, []).unwrap();
    let _d = engine.allocate("d", 1, []).unwrap();
    engine.free(a);
    engine.free(c);

    // holes: [0,1] and [4,5,6], tail [8,9]
    let small = engine.allocate("small", 2, []).unwrap();
    assert_eq!(engine.object_blocks(small), &[0, 1]);
    let mid = engine.allocate("mid", 3, []).unwrap();
    assert_eq!(engine.object_blocks(mid), &[4, 5, 6]);
    engine.verify().unwrap();
}

#[test]
fn test_zero_size_allocation_always_succeeds() {
    let mut engine = engine(3);
    let full = engine.allocate("full", 3, []).unwrap();
    engine.add_root(full);

    let empty = engine.allocate("empty", 0, [full]).unwrap();
    assert!(engine.contains(empty));
    assert!(engine.object_blocks(empty).is_empty());
    assert_eq!(engine.object_references(empty).count, 1);
    assert_eq!(engine.stats().free_blocks, 0);
    assert_eq!(engine.gc_stats().total_collections, 0);
    engine.verify().unwrap();
}

#[test]
fn test_zero_size_object_can_be_collected() {
    let mut engine = engine(3);
    let empty = engine.allocate("empty", 0, []).unwrap();
    assert_eq!(engine.collect(CollectionScope::All), 1);
    assert!(!engine.contains(empty));
    engine.verify().unwrap();
}

#[test]
fn test_allocate_then_free_restores_pool() {
    let mut engine = engine(12);
    let keep = engine.allocate("keep", 2, []).unwrap();
    let hole = engine.allocate("hole", 3, []).unwrap();
    engine.allocate("tail", 2, []).unwrap();
    engine.free(hole);
    engine.add_root(keep);

    let before = engine.pool_snapshot();
    let id = engine.allocate("temp", 3, []).unwrap();
    assert_ne!(engine.pool_snapshot(), before);
    engine.free(id);
    assert_eq!(engine.pool_snapshot(), before);
}

#[test]
fn test_out_of_memory_when_survivor_is_rooted() {
    let mut engine = engine(8);
    let x = engine.allocate("x", 5, []).unwrap();
    engine.add_root(x);

    let err = engine.allocate("y", 5, []).unwrap_err();
    assert!(matches!(err, AllocError::OutOfMemory { requested: 5, .. }));

    // exactly one young collection was attempted and nothing was claimed
    let gc = engine.gc_stats();
    assert_eq!(gc.young_collections, 1);
    assert_eq!(gc.total_collections, 1);
    assert_eq!(engine.object_count(), 1);
    assert_eq!(engine.stats().free_blocks, 3);
    assert!(engine.pool_snapshot()[5..].iter().all(|s| s.is_empty()));
    engine.verify().unwrap();
}

#[test]
fn test_allocation_succeeds_when_collection_frees_space() {
    let mut engine = engine(8);
    let x = engine.allocate("x", 5, []).unwrap();

    let y = engine.allocate("y", 5, []).unwrap();
    assert!(!engine.contains(x));
    assert_eq!(engine.object_blocks(y), &[0, 1, 2, 3, 4]);
    assert_eq!(engine.gc_stats().objects_collected, 1);
    engine.verify().unwrap();
}

#[test]
fn test_oversized_request_fails_cleanly() {
    let mut engine = engine(4);
    let err = engine.allocate("huge", 5, []).unwrap_err();
    assert_eq!(
        err,
        AllocError::OutOfMemory {
            requested: 5,
            free_blocks: 4,
            largest_free_run: 4,
        }
    );
    assert_eq!(engine.gc_stats().young_collections, 1);
    assert_eq!(engine.pool_snapshot(), vec![Slot::Empty; 4]);
}

#[test]
fn test_fragmented_pool_reports_out_of_memory() {
    let mut engine = engine(6);
    let ids: Vec<_> = (0..6).map(|_| engine.allocate("x", 1, []).unwrap()).collect();
    for (i, &id) in ids.iter().enumerate() {
        if i % 2 == 0 {
            engine.add_root(id);
        } else {
            engine.free(id);
        }
    }

    // three free blocks, none adjacent
    let err = engine.allocate("pair", 2, []).unwrap_err();
    assert_eq!(
        err,
        AllocError::OutOfMemory {
            requested: 2,
            free_blocks: 3,
            largest_free_run: 1,
        }
    );

    engine.compact();
    assert!(engine.allocate("pair", 2, []).is_ok());
}

#[test]
fn test_retry_collection_only_touches_young() {
    let mut engine = engine(6);
    let old = engine.allocate("old", 2, []).unwrap();
    engine.add_root(old);
    // skip-ahead so the first examination promotes
    engine.collect(CollectionScope::Old);
    engine.collect(CollectionScope::Young);
    assert_eq!(engine.object_generation(old), Some(Generation::Middle));
    engine.remove_root(old);

    engine.allocate("young", 4, []).unwrap();
    let err = engine.allocate("big", 4, []);
    assert!(err.is_ok(), "young garbage should have been reclaimed");
    // the unrooted middle object was not examined
    assert!(engine.contains(old));
}
