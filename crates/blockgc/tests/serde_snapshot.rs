//! Serialization of snapshots handed to presentation layers.

#![cfg(feature = "serde")]

use blockgc::{CollectionScope, Engine, EngineConfig, Generation, HeapStats, ObjectId, Slot};

#[test]
fn test_stats_serialize_to_json() {
    let mut engine: Engine<()> = Engine::with_config(EngineConfig::new().total_blocks(8)).unwrap();
    let id = engine.allocate((), 3, []).unwrap();
    engine.add_root(id);
    engine.collect(CollectionScope::Young);

    let json = serde_json::to_value(engine.stats()).unwrap();
    assert_eq!(json["total_blocks"], 8);
    assert_eq!(json["allocated_blocks"], 3);
    assert_eq!(json["generations"]["young"], 1);
    assert_eq!(json["gc"]["young_collections"], 1);

    let back: HeapStats = serde_json::from_value(json).unwrap();
    assert_eq!(back, engine.stats());
}

#[test]
fn test_pool_snapshot_serializes_owner_ids() {
    let mut engine: Engine<()> = Engine::with_config(EngineConfig::new().total_blocks(3)).unwrap();
    let id = engine.allocate((), 2, []).unwrap();

    let json = serde_json::to_string(&engine.pool_snapshot()).unwrap();
    assert_eq!(json, format!(r#"[{{"Owned":{0}}},{{"Owned":{0}}},"Empty"]"#, id.get()));

    let back: Vec<Slot> = serde_json::from_str(&json).unwrap();
    assert_eq!(back[0], Slot::Owned(ObjectId::new(id.get())));
}

#[test]
fn test_generation_names() {
    assert_eq!(serde_json::to_string(&Generation::Middle).unwrap(), r#""Middle""#);
    let scope: CollectionScope = serde_json::from_str(r#""Old""#).unwrap();
    assert_eq!(scope, CollectionScope::Old);
}
