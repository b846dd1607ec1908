//! Managed objects and the object table.
//!
//! Every live object owns a set of pool blocks, an opaque payload and a list
//! of outgoing references. The table keeps objects in allocation order, which
//! is the order the compactor lays them out in.

use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// ObjectId
// ============================================================================

/// Identifier of a managed object.
///
/// Ids are handed out by a per-engine counter starting at 1 and are never
/// reused, so ordering ids is the same as ordering by allocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectId(u64);

impl ObjectId {
    /// Wrap a raw id value.
    ///
    /// Useful for callers that persist ids between interactions.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Age class of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Generation {
    /// Newly allocated.
    #[default]
    Young,
    /// Survived long enough to leave the young generation.
    Middle,
    /// Terminal generation. Objects are never demoted.
    Old,
}

impl Generation {
    /// All generations, youngest first.
    pub const ALL: [Self; 3] = [Self::Young, Self::Middle, Self::Old];

    /// The generation an object moves to on promotion, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Young => Some(Self::Middle),
            Self::Middle => Some(Self::Old),
            Self::Old => None,
        }
    }

    /// Lower-case name, as used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Young => "young",
            Self::Middle => "middle",
            Self::Old => "old",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ManagedObject
// ============================================================================

/// Bookkeeping record for one live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedObject<P> {
    pub(crate) id: ObjectId,
    pub(crate) payload: P,
    pub(crate) blocks: Vec<usize>,
    pub(crate) generation: Generation,
    pub(crate) last_collection_epoch: u64,
    pub(crate) references: Vec<ObjectId>,
}

impl<P> ManagedObject<P> {
    pub(crate) fn new(
        id: ObjectId,
        payload: P,
        blocks: Vec<usize>,
        references: Vec<ObjectId>,
    ) -> Self {
        Self {
            id,
            payload,
            blocks,
            generation: Generation::Young,
            last_collection_epoch: 0,
            references,
        }
    }

    /// The object's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// The opaque payload given at allocation.
    #[inline]
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Pool slots owned by this object, in ascending order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    /// Number of blocks requested at allocation.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// Current generation.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Collection counter value of the last collection this object survived
    /// while being examined. Zero until the first such collection.
    #[inline]
    #[must_use]
    pub const fn last_collection_epoch(&self) -> u64 {
        self.last_collection_epoch
    }

    /// Outgoing references. May name objects that no longer exist.
    #[inline]
    #[must_use]
    pub fn references(&self) -> &[ObjectId] {
        &self.references
    }

    /// Whether this object lists `target` among its references.
    #[inline]
    #[must_use]
    pub fn refers_to(&self, target: ObjectId) -> bool {
        self.references.contains(&target)
    }
}

// ============================================================================
// ObjectTable
// ============================================================================

/// Map from id to object record, iterated in allocation order.
#[derive(Debug, Clone)]
pub struct ObjectTable<P> {
    objects: BTreeMap<ObjectId, ManagedObject<P>>,
    next_id: u64,
}

impl<P> ObjectTable<P> {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the next unused id.
    pub(crate) fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, object: ManagedObject<P>) {
        debug_assert!(!self.objects.contains_key(&object.id));
        self.objects.insert(object.id, object);
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> Option<ManagedObject<P>> {
        self.objects.remove(&id)
    }

    /// Look up an object.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&ManagedObject<P>> {
        self.objects.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut ManagedObject<P>> {
        self.objects.get_mut(&id)
    }

    /// Whether `id` names a live object.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Number of live objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the table holds no objects.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over objects in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &ManagedObject<P>> + '_ {
        self.objects.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ManagedObject<P>> + '_ {
        self.objects.values_mut()
    }

    /// Iterate over ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// Total blocks owned by all objects.
    #[must_use]
    pub fn owned_blocks(&self) -> usize {
        self.objects.values().map(ManagedObject::size).sum()
    }
}

impl<P> Default for ObjectTable<P> {
    fn default() -> Self {
        Self::new()
    }
}
