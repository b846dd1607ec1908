//! The engine: one block pool, its objects, their roots and the collector's
//! bookkeeping, behind the operations a presentation layer drives.
//!
//! Every mutating operation runs to completion and leaves the pool, the
//! object table and the root set consistent with each other. Operations that
//! name an unknown object are not errors: they report [`Outcome::Ignored`] or
//! return an empty answer, since interactive callers routinely hold stale ids.

use crate::alloc;
use crate::compact::{self, CompactionReport};
use crate::config::EngineConfig;
use crate::error::{AllocError, ConfigError, HeapCorruption};
use crate::gc;
use crate::metrics::{CollectionMetrics, CollectionScope, GcHistory, GcStats};
use crate::object::{Generation, ManagedObject, ObjectId, ObjectTable};
use crate::pool::{BlockPool, Slot};
use crate::roots::RootSet;
use crate::stats::HeapStats;

/// Result of an operation that may legitimately do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The operation changed the engine state.
    Applied,
    /// Nothing to do: unknown id, or the state already matched.
    Ignored,
}

impl Outcome {
    /// Whether the operation changed anything.
    #[inline]
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    const fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Ignored
        }
    }
}

/// Outgoing references of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceSummary {
    /// Number of entries in `references`.
    pub count: usize,
    /// Referenced ids in insertion order, dangling ones included.
    pub references: Vec<ObjectId>,
}

/// A simulated generational heap.
///
/// `P` is the payload type. The engine stores payloads but never looks at
/// them.
///
/// # Example
///
/// ```
/// use blockgc::{CollectionScope, Engine, Generation};
///
/// let mut engine: Engine<&str> = Engine::new();
/// let leaf = engine.allocate("leaf", 2, []).unwrap();
/// let root = engine.allocate("root", 1, [leaf]).unwrap();
/// engine.add_root(root);
///
/// let garbage = engine.allocate("garbage", 4, []).unwrap();
/// assert_eq!(engine.collect(CollectionScope::All), 1);
/// assert_eq!(engine.object_generation(garbage), None);
/// assert_eq!(engine.object_generation(leaf), Some(Generation::Young));
/// ```
#[derive(Debug, Clone)]
pub struct Engine<P> {
    pub(crate) config: EngineConfig,
    pub(crate) pool: BlockPool,
    pub(crate) objects: ObjectTable<P>,
    pub(crate) roots: RootSet,
    pub(crate) stats: GcStats,
    pub(crate) history: GcHistory,
}

impl<P> Default for Engine<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Engine<P> {
    /// Create an engine with the default configuration (256 blocks).
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }

    /// Create an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        Self {
            config,
            pool: BlockPool::new(config.total_blocks),
            objects: ObjectTable::new(),
            roots: RootSet::new(),
            stats: GcStats::new(),
            history: GcHistory::new(),
        }
    }

    /// The configuration this engine was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Allocate an object occupying `size` contiguous blocks.
    ///
    /// The leftmost free run that fits is used. When none fits, one young
    /// collection runs and the search is retried once, so allocation may free
    /// other objects as a side effect. A zero-sized object takes no blocks and
    /// always succeeds. `references` may name objects that do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::OutOfMemory`] when the retry also fails. No
    /// block is claimed and no object is registered in that case.
    pub fn allocate(
        &mut self,
        payload: P,
        size: usize,
        references: impl IntoIterator<Item = ObjectId>,
    ) -> Result<ObjectId, AllocError> {
        alloc::allocate(self, payload, size, references.into_iter().collect())
    }

    /// Run a collection and return the number of objects it freed.
    ///
    /// [`CollectionScope::All`] marks transitively from the roots and sweeps
    /// every object. A generation scope only sweeps that generation and keeps
    /// an object when it is a root or is referenced directly by a root or by
    /// an object of another generation.
    pub fn collect(&mut self, scope: CollectionScope) -> usize {
        gc::collect(self, scope).objects_collected
    }

    /// Like [`collect`](Self::collect) but returns the full metrics.
    pub fn collect_with_metrics(&mut self, scope: CollectionScope) -> CollectionMetrics {
        gc::collect(self, scope)
    }

    /// Free an object explicitly, releasing its blocks and unrooting it.
    ///
    /// Explicit frees do not count towards [`GcStats::objects_collected`].
    pub fn free(&mut self, id: ObjectId) -> Outcome {
        Outcome::from_changed(gc::free_object(self, id).is_some())
    }

    /// Move every object to the front of the pool, in allocation order.
    pub fn compact(&mut self) -> CompactionReport {
        compact::compact(self)
    }

    /// Pin `id` as a root. Ignored for unknown ids and existing roots.
    pub fn add_root(&mut self, id: ObjectId) -> Outcome {
        if !self.objects.contains(id) {
            return Outcome::Ignored;
        }
        Outcome::from_changed(self.roots.insert(id))
    }

    /// Unpin `id`. Ignored if it was not a root.
    pub fn remove_root(&mut self, id: ObjectId) -> Outcome {
        Outcome::from_changed(self.roots.remove(id))
    }

    /// Append `to` to the references of `from`.
    ///
    /// Ignored when `from` does not exist. `to` may be dangling, and may be
    /// `from` itself.
    pub fn add_reference(&mut self, from: ObjectId, to: ObjectId) -> Outcome {
        match self.objects.get_mut(from) {
            Some(object) => {
                object.references.push(to);
                Outcome::Applied
            }
            None => Outcome::Ignored,
        }
    }

    /// Remove the first occurrence of `to` from the references of `from`.
    pub fn remove_reference(&mut self, from: ObjectId, to: ObjectId) -> Outcome {
        let Some(object) = self.objects.get_mut(from) else {
            return Outcome::Ignored;
        };
        match object.references.iter().position(|&r| r == to) {
            Some(pos) => {
                object.references.remove(pos);
                Outcome::Applied
            }
            None => Outcome::Ignored,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Statistics recomputed from the current state.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        HeapStats::collect(&self.pool, &self.objects, self.stats)
    }

    /// Cumulative collection counters.
    #[inline]
    #[must_use]
    pub const fn gc_stats(&self) -> GcStats {
        self.stats
    }

    /// Metrics of the most recent collection.
    #[must_use]
    pub fn last_collection(&self) -> Option<CollectionMetrics> {
        self.history.last()
    }

    /// Recent collection metrics.
    #[inline]
    #[must_use]
    pub const fn history(&self) -> &GcHistory {
        &self.history
    }

    /// Generation of `id`, or `None` if it does not exist.
    #[must_use]
    pub fn object_generation(&self, id: ObjectId) -> Option<Generation> {
        self.objects.get(id).map(ManagedObject::generation)
    }

    /// Blocks owned by `id`; empty if it does not exist.
    #[must_use]
    pub fn object_blocks(&self, id: ObjectId) -> &[usize] {
        match self.objects.get(id) {
            Some(object) => object.blocks(),
            None => &[],
        }
    }

    /// References held by `id`; empty if it does not exist.
    #[must_use]
    pub fn object_references(&self, id: ObjectId) -> ReferenceSummary {
        let references = self
            .objects
            .get(id)
            .map(|o| o.references().to_vec())
            .unwrap_or_default();
        ReferenceSummary {
            count: references.len(),
            references,
        }
    }

    /// Full record of `id`.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&ManagedObject<P>> {
        self.objects.get(id)
    }

    /// Payload of `id`.
    #[must_use]
    pub fn payload(&self, id: ObjectId) -> Option<&P> {
        self.objects.get(id).map(ManagedObject::payload)
    }

    /// Whether `id` names a live object.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(id)
    }

    /// Number of live objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Live ids in allocation order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.ids()
    }

    /// Live objects in allocation order.
    pub fn objects(&self) -> impl Iterator<Item = &ManagedObject<P>> + '_ {
        self.objects.iter()
    }

    /// Whether `id` is a root.
    #[must_use]
    pub fn is_root(&self, id: ObjectId) -> bool {
        self.roots.contains(id)
    }

    /// Current roots.
    pub fn roots(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.roots.iter()
    }

    /// The block pool.
    #[inline]
    #[must_use]
    pub const fn pool(&self) -> &BlockPool {
        &self.pool
    }

    /// Copy of every slot, for rendering.
    #[must_use]
    pub fn pool_snapshot(&self) -> Vec<Slot> {
        self.pool.snapshot()
    }

    /// Check that the pool, the object table and the root set agree.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn verify(&self) -> Result<(), HeapCorruption> {
        let total_blocks = self.pool.len();

        for (block, slot) in self.pool.iter().enumerate() {
            let Some(owner) = slot.owner() else {
                continue;
            };
            match self.objects.get(owner) {
                None => return Err(HeapCorruption::OrphanBlock { block, owner }),
                Some(object) if !object.blocks().contains(&block) => {
                    return Err(HeapCorruption::OwnershipMismatch { id: owner, block });
                }
                Some(_) => {}
            }
        }

        for object in self.objects.iter() {
            for &block in object.blocks() {
                if block >= total_blocks {
                    return Err(HeapCorruption::BlockOutOfRange {
                        id: object.id(),
                        block,
                        total_blocks,
                    });
                }
                if self.pool.get(block) != Slot::Owned(object.id()) {
                    return Err(HeapCorruption::OwnershipMismatch {
                        id: object.id(),
                        block,
                    });
                }
            }
        }

        let owned = self.objects.owned_blocks();
        let free = self.pool.free_blocks();
        if owned + free != total_blocks {
            return Err(HeapCorruption::BlockAccounting {
                owned,
                free,
                total_blocks,
            });
        }

        if let Some(root) = self.roots.iter().find(|&id| !self.objects.contains(id)) {
            return Err(HeapCorruption::DanglingRoot(root));
        }

        Ok(())
    }
}
