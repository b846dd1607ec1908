//! Session tests: one engine shared between threads behind one lock.

use std::thread;

use blockgc::{CollectionScope, ConfigError, EngineConfig, Session};

#[test]
fn test_threads_share_one_engine() {
    let session: Session<usize> =
        Session::with_config(EngineConfig::new().total_blocks(400)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let session = session.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let mut engine = session.lock();
                    let id = engine.allocate(t * 100 + i, 2, []).unwrap();
                    engine.add_root(id);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    session.with(|engine| {
        assert_eq!(engine.object_count(), 100);
        assert_eq!(engine.stats().allocated_blocks, 200);
        assert_eq!(engine.collect(CollectionScope::All), 0);
        engine.verify().unwrap();
    });
}

#[test]
fn test_invalid_config_is_rejected() {
    let result: Result<Session<()>, _> = Session::with_config(EngineConfig::new().total_blocks(0));
    assert_eq!(result.err(), Some(ConfigError::ZeroCapacity));
}
