//! Garbage collection.
//!
//! This module provides the collector: reachability analysis for both
//! collection modes, the sweep, promotion of survivors, and the shared
//! helper that frees a single object.

mod collect;
pub mod mark;

pub(crate) use collect::{collect, free_object};
pub use mark::{mark_one_hop, mark_transitive};
