//! A generational garbage collector simulator over a fixed block pool.
//!
//! `blockgc` models a small heap as an array of blocks. Objects claim
//! contiguous runs of blocks, point at each other through id references, and
//! are reclaimed by a **mark-sweep** collector that runs either over the
//! whole heap or over a single generation. Live objects can be slid to the
//! front of the pool by a **compactor**. Everything is observable, which
//! makes the engine suitable for teaching and visualising GC behaviour.
//!
//! # Features
//!
//! - **First-fit allocation**: leftmost contiguous run, with one young
//!   collection before reporting out-of-memory
//! - **Two collection modes**: transitive full mark-sweep, and a shallow
//!   one-hop sweep per generation
//! - **Generations**: Young, Middle and Old, with age-based promotion
//! - **Compaction**: deterministic, idempotent sliding compaction
//! - **Statistics**: block usage, fragmentation, per-generation counts and
//!   cumulative collection metrics
//!
//! # Quick Start
//!
//! ```
//! use blockgc::{CollectionScope, Engine};
//!
//! let mut engine: Engine<&str> = Engine::new();
//!
//! let b = engine.allocate("b", 2, []).unwrap();
//! let a = engine.allocate("a", 3, [b]).unwrap();
//! let r = engine.allocate("r", 1, [a]).unwrap();
//! engine.add_root(r);
//!
//! // A full collection keeps the whole chain r -> a -> b.
//! assert_eq!(engine.collect(CollectionScope::All), 0);
//!
//! // A young collection only looks one hop away from roots and older
//! // objects, so `b` is reclaimed.
//! assert_eq!(engine.collect(CollectionScope::Young), 1);
//! assert!(!engine.contains(b));
//! ```
//!
//! # Thread Safety
//!
//! An [`Engine`] is a plain value with no interior mutability and no global
//! state. Use a [`Session`] to share one engine between threads behind a
//! single lock.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod alloc;
mod compact;
mod config;
mod engine;
mod error;
mod metrics;
mod object;
mod pool;
mod roots;
mod session;
mod stats;
mod tracing;

/// Collector internals.
///
/// Public so reachability can be inspected without running a collection.
pub mod gc;

// Re-export public API
pub use compact::CompactionReport;
pub use config::{EngineConfig, DEFAULT_MIDDLE_PROMOTION_AGE, DEFAULT_YOUNG_PROMOTION_AGE};
pub use engine::{Engine, Outcome, ReferenceSummary};
pub use error::{AllocError, ConfigError, HeapCorruption};
pub use metrics::{CollectionMetrics, CollectionScope, GcHistory, GcStats, PhaseTimer, HISTORY_SIZE};
pub use object::{Generation, ManagedObject, ObjectId, ObjectTable};
pub use pool::{BlockPool, Slot, DEFAULT_TOTAL_BLOCKS};
pub use roots::RootSet;
pub use session::Session;
pub use stats::{fragmentation, GenerationCounts, HeapStats};
