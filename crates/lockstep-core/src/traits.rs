//! The read-only view of the simulation that diagnostics consume.

use crate::id::{GameTurn, PlayerId, ThingIndex};
use crate::player::Player;
use crate::room::Room;
use crate::thing::{Thing, ThingCategory};

/// Snapshot of the simulation's three independent RNG streams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RandomSeeds {
    /// Gameplay action RNG.
    pub action: u32,
    /// Computer player RNG.
    pub ai: u32,
    /// Player-visible RNG.
    pub player: u32,
}

/// Read-only access to the simulation state that lockstep checksums.
///
/// Diagnostics never mutate the world and never hold a reference to it
/// past a single call, so any game state container can implement this
/// directly. All methods must be deterministic for a given world state.
pub trait SimulationWorld {
    /// The turn the simulation has just completed.
    fn current_turn(&self) -> GameTurn;

    /// Head of a category's thing list, or [`ThingIndex::NONE`] if empty.
    fn thing_list_head(&self, category: ThingCategory) -> ThingIndex;

    /// Look up a thing by index.
    ///
    /// Returns `None` if the index is out of range or the slot is invalid.
    fn thing(&self, index: ThingIndex) -> Option<&Thing>;

    /// Capacity of the global thing table. Bounds every list traversal.
    fn thing_capacity(&self) -> usize;

    /// All room slots, live or not. Check [`Room::exists`].
    fn rooms(&self) -> &[Room];

    /// Look up a player slot.
    ///
    /// Returns `None` if the slot has no player.
    fn player(&self, id: PlayerId) -> Option<&Player>;

    /// Current RNG stream states.
    fn random_seeds(&self) -> RandomSeeds;
}
