//! Lockstep: bounded-memory desync diagnostics for deterministic
//! lockstep multiplayer simulations.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the lockstep sub-crates. Implement [`types::SimulationWorld`] for your
//! game state and drive a [`desync::DesyncDiagnostics`] from the turn
//! loop.
//!
//! # Quick start
//!
//! ```rust
//! use lockstep::prelude::*;
//!
//! // A world with no things, rooms or players: only a turn counter.
//! struct Empty(u32);
//! impl SimulationWorld for Empty {
//!     fn current_turn(&self) -> GameTurn { GameTurn(self.0) }
//!     fn thing_list_head(&self, _: ThingCategory) -> ThingIndex { ThingIndex::NONE }
//!     fn thing(&self, _: ThingIndex) -> Option<&Thing> { None }
//!     fn thing_capacity(&self) -> usize { 0 }
//!     fn rooms(&self) -> &[Room] { &[] }
//!     fn player(&self, _: PlayerId) -> Option<&Player> { None }
//!     fn random_seeds(&self) -> RandomSeeds { RandomSeeds { action: self.0, ai: 0, player: 0 } }
//! }
//!
//! let mut host = DesyncDiagnostics::new();
//! let mut client = DesyncDiagnostics::new();
//! for turn in 0..10 {
//!     host.on_turn_simulated(&Empty(turn));
//!     client.on_turn_simulated(&Empty(turn));
//! }
//!
//! let bytes = lockstep::desync::payload_to_bytes(&host.prepare_resync()).unwrap();
//! let mut payload = lockstep::desync::payload_from_bytes(&bytes, 40).unwrap();
//! let outcome = client.analyze_resync(&Empty(9), &mut payload);
//! assert!(outcome.report().unwrap().is_clean());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lockstep-core` | IDs, checksums, simulation records, `SimulationWorld` |
//! | [`history`] | `lockstep-history` | Checksum and received-packet rings, configuration |
//! | [`desync`] | `lockstep-desync` | Resync payload, wire codec, comparator, verifier |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits and IDs (`lockstep-core`).
///
/// Contains the simulation records that are checksummed, the `*31`
/// checksum fold, bounded thing-list traversal and the
/// [`types::SimulationWorld`] trait.
pub use lockstep_core as types;

/// Per-turn history rings (`lockstep-history`).
///
/// [`history::ChecksumHistoryRing`] and [`history::ReceivedPacketRing`],
/// sized by [`history::HistoryConfig`].
pub use lockstep_history as history;

/// Desync diagnosis (`lockstep-desync`).
///
/// The [`desync::DesyncDiagnosticsPayload`] and its codec, the
/// comparator, the per-turn checksum verifier and the
/// [`desync::DesyncDiagnostics`] session facade.
pub use lockstep_desync as desync;

/// Common imports for typical lockstep usage.
///
/// ```rust
/// use lockstep::prelude::*;
/// ```
pub mod prelude {
    pub use lockstep_core::{
        Checksum, GameTurn, Packet, Player, PlayerId, RandomSeeds, Room, SimulationWorld, Thing,
        ThingCategory, ThingIndex,
    };
    pub use lockstep_desync::{
        ChecksumField, ChecksumVerdict, DesyncDiagnostics, DesyncDiagnosticsPayload,
        DesyncOutcome, DesyncReport, PayloadError,
    };
    pub use lockstep_history::{
        ChecksumHistoryRing, ChecksumSnapshot, ConfigError, HistoryConfig, ReceivedPacketRing,
    };
}
