//! Reachability analysis.
//!
//! Two notions of "reachable" are used, one per collection mode:
//!
//! - [`mark_transitive`]: everything reachable from a root through any chain
//!   of references. Used by full collections.
//! - [`mark_one_hop`]: objects of one generation that are roots or are named
//!   directly by a referrer that is not itself under examination. Used by
//!   generational collections, and deliberately shallower.

use std::collections::HashSet;

use crate::object::{Generation, ObjectId, ObjectTable};
use crate::roots::RootSet;

/// Mark every object transitively reachable from the roots.
///
/// Uses an explicit worklist and a visited set, so deep chains and cycles
/// (self-references included) neither recurse nor loop. References to ids
/// that are not in the table are skipped.
pub fn mark_transitive<P>(table: &ObjectTable<P>, roots: &RootSet) -> HashSet<ObjectId> {
    let mut marked = HashSet::with_capacity(table.len());
    let mut worklist: Vec<ObjectId> = roots.iter().filter(|&id| table.contains(id)).collect();

    while let Some(id) = worklist.pop() {
        if !marked.insert(id) {
            continue;
        }
        let Some(object) = table.get(id) else {
            continue;
        };
        for &target in object.references() {
            if !marked.contains(&target) && table.contains(target) {
                worklist.push(target);
            }
        }
    }

    marked
}

/// Mark the objects of `generation` that survive a generational collection.
///
/// An object of the target generation survives when it is a root, or when
/// some *other* live object lists it in its references and that referrer is
/// either a root or belongs to a different generation. Non-root referrers of
/// the target generation are candidates themselves and do not count. The
/// referrer's own reachability is never examined, so a garbage object in an
/// older generation still keeps its young referents alive for one more
/// round.
pub fn mark_one_hop<P>(
    table: &ObjectTable<P>,
    roots: &RootSet,
    generation: Generation,
) -> HashSet<ObjectId> {
    let mut marked: HashSet<ObjectId> = roots
        .iter()
        .filter(|&id| table.get(id).is_some_and(|o| o.generation() == generation))
        .collect();

    let referrers = table
        .iter()
        .filter(|o| o.generation() != generation || roots.contains(o.id()));
    for referrer in referrers {
        for &target in referrer.references() {
            if target == referrer.id() {
                continue;
            }
            if table.get(target).is_some_and(|o| o.generation() == generation) {
                marked.insert(target);
            }
        }
    }

    marked
}
