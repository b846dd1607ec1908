//! Root tracking.
//!
//! Roots are object ids pinned by the caller. A rooted object is never
//! collected, and in a full collection everything it reaches survives too.

use std::collections::BTreeSet;

use crate::object::ObjectId;

/// Set of pinned object ids.
///
/// Membership is idempotent. The engine keeps this a subset of the live
/// object table: freeing an object unroots it in the same step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSet {
    roots: BTreeSet<ObjectId>,
}

impl RootSet {
    /// Create an empty root set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roots: BTreeSet::new(),
        }
    }

    /// Register a root. Returns `false` if it was already registered.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        self.roots.insert(id)
    }

    /// Unregister a root. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.roots.remove(&id)
    }

    /// Whether `id` is a root.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.roots.contains(&id)
    }

    /// Get the number of roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Check if there are no roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterate over all roots in id order.
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.roots.iter().copied()
    }

    /// Clear all roots.
    pub fn clear(&mut self) {
        self.roots.clear();
    }
}
