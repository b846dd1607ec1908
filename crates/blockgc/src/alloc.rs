//! First-fit allocation.
//!
//! Objects occupy a contiguous run of blocks at allocation time. The
//! allocator takes the leftmost run that is long enough; when none exists it
//! runs a single young-generation collection and tries once more.

use crate::engine::Engine;
use crate::error::AllocError;
use crate::gc;
use crate::metrics::CollectionScope;
use crate::object::{ManagedObject, ObjectId};
use crate::tracing::{log_allocation, log_allocation_retry, log_out_of_memory};

/// Allocate an object of `size` blocks.
///
/// On success the object is Young with epoch 0 and its blocks are claimed.
/// On failure nothing has been claimed or registered, although the retry
/// collection may have freed unrelated objects.
pub fn allocate<P>(
    heap: &mut Engine<P>,
    payload: P,
    size: usize,
    references: Vec<ObjectId>,
) -> Result<ObjectId, AllocError> {
    let run = match heap.pool.find_free_run(size) {
        Some(run) => run,
        None => {
            log_allocation_retry(size, heap.pool.free_blocks());
            gc::collect(heap, CollectionScope::Young);
            heap.pool.find_free_run(size).ok_or_else(|| {
                let free_blocks = heap.pool.free_blocks();
                let largest_free_run = heap.pool.largest_free_run();
                log_out_of_memory(size, free_blocks, largest_free_run);
                AllocError::OutOfMemory {
                    requested: size,
                    free_blocks,
                    largest_free_run,
                }
            })?
        }
    };

    let id = heap.objects.next_id();
    log_allocation(id, size, run.start);
    heap.pool.claim(run.clone(), id);
    heap.objects
        .insert(ManagedObject::new(id, payload, run.collect(), references));
    Ok(id)
}
