//! Fixed-capacity block pool.
//!
//! The pool is a flat array of slots. Each slot is either empty or owned by
//! exactly one object. The pool itself has no policy; allocation, sweeping and
//! compaction decide what goes where.
//!
//! ```text
//! index:  0   1   2   3   4   5   6   7
//!        +---+---+---+---+---+---+---+---+
//!        | 1 | 1 | 1 | . | . | 2 | 2 | . |
//!        +---+---+---+---+---+---+---+---+
//!                     \_____/         \_/
//!                   free run 2    free run 1
//! ```

use std::ops::Range;

use crate::object::ObjectId;

/// Default number of blocks in a pool.
pub const DEFAULT_TOTAL_BLOCKS: usize = 256;

/// State of one pool slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// Free.
    #[default]
    Empty,
    /// Claimed by the given object.
    Owned(ObjectId),
}

impl Slot {
    /// Whether the slot is free.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Owner of the slot, if any.
    #[inline]
    #[must_use]
    pub const fn owner(self) -> Option<ObjectId> {
        match self {
            Self::Empty => None,
            Self::Owned(id) => Some(id),
        }
    }
}

/// Fixed-length array of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPool {
    slots: Box<[Slot]>,
}

impl BlockPool {
    /// Create a pool of `total_blocks` empty slots.
    #[must_use]
    pub fn new(total_blocks: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; total_blocks].into_boxed_slice(),
        }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no slots at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Read a slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Slot {
        self.slots[index]
    }

    /// Overwrite a slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot;
    }

    /// Claim every slot in `range` for `owner`.
    pub(crate) fn claim(&mut self, range: Range<usize>, owner: ObjectId) {
        for index in range {
            debug_assert!(self.get(index).is_empty());
            self.set(index, Slot::Owned(owner));
        }
    }

    /// Reset the given slots to empty.
    pub(crate) fn release(&mut self, blocks: &[usize]) {
        for &index in blocks {
            self.set(index, Slot::Empty);
        }
    }

    /// Reset every slot to empty.
    pub(crate) fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
    }

    /// Iterate over slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.iter().copied()
    }

    /// Copy of all slots, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Slot> {
        self.slots.to_vec()
    }

    /// Number of empty slots.
    #[must_use]
    pub fn free_blocks(&self) -> usize {
        self.slots.iter().filter(|s| s.is_empty()).count()
    }

    /// Number of owned slots.
    #[must_use]
    pub fn allocated_blocks(&self) -> usize {
        self.len() - self.free_blocks()
    }

    /// Leftmost run of `size` consecutive empty slots.
    ///
    /// Scans left to right counting the current run of empty slots and
    /// restarting on every owned slot. A zero-sized request is satisfied by
    /// the empty range at index 0.
    #[must_use]
    pub fn find_free_run(&self, size: usize) -> Option<Range<usize>> {
        if size == 0 {
            return Some(0..0);
        }
        let mut run = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_empty() {
                run += 1;
                if run == size {
                    let end = index + 1;
                    return Some(end - size..end);
                }
            } else {
                run = 0;
            }
        }
        None
    }

    /// Length of the longest run of empty slots.
    #[must_use]
    pub fn largest_free_run(&self) -> usize {
        let mut run = 0;
        let mut largest = 0;
        for slot in self.slots.iter() {
            if slot.is_empty() {
                run += 1;
                largest = largest.max(run);
            } else {
                run = 0;
            }
        }
        largest
    }
}

impl Default for BlockPool {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_BLOCKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(owned: &[usize], total: usize) -> BlockPool {
        let mut pool = BlockPool::new(total);
        for &i in owned {
            pool.set(i, Slot::Owned(ObjectId::new(1)));
        }
        pool
    }

    #[test]
    fn test_new_pool_is_empty() {
        let pool = BlockPool::default();
        assert_eq!(pool.len(), DEFAULT_TOTAL_BLOCKS);
        assert_eq!(pool.free_blocks(), DEFAULT_TOTAL_BLOCKS);
        assert_eq!(pool.allocated_blocks(), 0);
        assert_eq!(pool.largest_free_run(), DEFAULT_TOTAL_BLOCKS);
    }

    #[test]
    fn test_find_free_run_is_leftmost_first_fit() {
        // . X . . X . . .
        let pool = pool_with(&[1, 4], 8);
        assert_eq!(pool.find_free_run(1), Some(0..1));
        assert_eq!(pool.find_free_run(2), Some(2..4));
        assert_eq!(pool.find_free_run(3), Some(5..8));
        assert_eq!(pool.find_free_run(4), None);
    }

    #[test]
    fn test_find_free_run_zero_size() {
        let pool = pool_with(&[0, 1, 2], 3);
        assert_eq!(pool.find_free_run(0), Some(0..0));
    }

    #[test]
    fn test_largest_free_run() {
        let pool = pool_with(&[3, 4], 10);
        assert_eq!(pool.largest_free_run(), 5);

        let full = pool_with(&[0, 1], 2);
        assert_eq!(full.largest_free_run(), 0);
    }

    #[test]
    fn test_claim_and_release() {
        let mut pool = BlockPool::new(4);
        let id = ObjectId::new(9);
        pool.claim(1..3, id);
        assert_eq!(pool.get(1), Slot::Owned(id));
        assert_eq!(pool.get(2).owner(), Some(id));
        assert!(pool.get(3).is_empty());

        pool.release(&[1, 2]);
        assert_eq!(pool.free_blocks(), 4);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_get_out_of_range_panics() {
        let pool = BlockPool::new(2);
        let _ = pool.get(2);
    }
}
