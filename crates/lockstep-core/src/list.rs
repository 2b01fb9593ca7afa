//! Bounded traversal of the per-category thing lists.
//!
//! Lists are intrusive: each thing stores the index of the next thing in
//! its category. A corrupted link can point at an invalid slot or close a
//! cycle, so every walk is capped at the world's thing capacity and
//! stops at the first bad link instead of looping.

use crate::checksum::Checksum;
use crate::error::TraversalError;
use crate::id::ThingIndex;
use crate::thing::{Thing, ThingCategory};
use crate::traits::SimulationWorld;

/// Iterator over one category's thing list.
///
/// Yields `Ok(thing)` for each linked thing and at most one trailing
/// `Err` if the list is corrupted.
pub struct ThingListIter<'w> {
    world: &'w dyn SimulationWorld,
    category: ThingCategory,
    next: ThingIndex,
    visited: usize,
    cap: usize,
    finished: bool,
}

impl<'w> ThingListIter<'w> {
    /// Start walking `category` from its list head.
    pub fn new(world: &'w dyn SimulationWorld, category: ThingCategory) -> Self {
        Self {
            world,
            category,
            next: world.thing_list_head(category),
            visited: 0,
            cap: world.thing_capacity(),
            finished: false,
        }
    }
}

impl<'w> Iterator for ThingListIter<'w> {
    type Item = Result<&'w Thing, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.next.is_none() {
            return None;
        }
        if self.visited > self.cap {
            self.finished = true;
            return Some(Err(TraversalError::CycleSuspected {
                category: self.category,
                cap: self.cap,
            }));
        }
        let Some(thing) = self.world.thing(self.next) else {
            self.finished = true;
            return Some(Err(TraversalError::InvalidThing {
                category: self.category,
                index: self.next,
            }));
        };
        self.next = thing.next_of_class;
        self.visited += 1;
        Some(Ok(thing))
    }
}

/// Result of walking one thing list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListChecksum {
    /// Wrapping sum of per-thing checksums over the things reached.
    pub sum: Checksum,
    /// Number of things reached.
    pub count: usize,
    /// Why the walk stopped early, if it did.
    pub error: Option<TraversalError>,
}

/// Sum the per-thing checksums of one category list.
///
/// A corrupted list is logged and the partial sum returned; this never
/// fails and never loops past the thing capacity.
pub fn thing_list_checksum(world: &dyn SimulationWorld, category: ThingCategory) -> ListChecksum {
    let mut result = ListChecksum::default();
    for item in ThingListIter::new(world, category) {
        match item {
            Ok(thing) => {
                result.sum = result.sum.wrapping_add(thing.checksum());
                result.count += 1;
            }
            Err(e) => {
                tracing::error!(target: "lockstep::desync", "{e}");
                result.error = Some(e);
            }
        }
    }
    result
}

/// Count the things reachable in one category list.
pub fn count_things(world: &dyn SimulationWorld, category: ThingCategory) -> usize {
    ThingListIter::new(world, category)
        .take_while(Result::is_ok)
        .count()
}
