//! Core types and traits for lockstep desync diagnostics.
//!
//! This is the leaf crate of the workspace. It defines the identifiers,
//! the checksum fold, the simulation records that are checksummed each
//! turn (things, rooms, players, RNG seeds), the input [`Packet`], and
//! the [`SimulationWorld`] trait through which diagnostics read the game.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod checksum;
pub mod error;
pub mod id;
pub mod list;
pub mod packet;
pub mod player;
pub mod room;
pub mod thing;
pub mod traits;

pub use checksum::{checksum_add, wrapping_sum, Checksum, ChecksumFold, CHECKSUM_MULTIPLIER};
pub use error::TraversalError;
pub use id::{GameTurn, PlayerId, ThingIndex, NET_PLAYERS_COUNT, PLAYERS_COUNT};
pub use list::{count_things, thing_list_checksum, ListChecksum, ThingListIter};
pub use packet::Packet;
pub use player::{Camera, Controller, Player};
pub use room::Room;
pub use thing::{CreatureInstance, MapPos, Thing, ThingCategory, ThingClass};
pub use traits::{RandomSeeds, SimulationWorld};
