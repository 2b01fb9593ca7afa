//! Bounded per-turn history for lockstep desync diagnosis.
//!
//! Two rings, neither depending on the other:
//!
//! - [`ChecksumHistoryRing`]: one [`ChecksumSnapshot`] per simulated turn,
//!   aggregate checksums broken down by thing category, rooms, players
//!   and RNG seeds.
//! - [`ReceivedPacketRing`]: the non-empty input packets each remote
//!   player sent, keyed by (turn, player).
//!
//! Both are fixed-size, overwrite oldest-first and are scanned linearly
//! on lookup. Sizing comes from [`HistoryConfig`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod checksum_ring;
pub mod config;
pub mod received;
pub mod snapshot;

pub use checksum_ring::ChecksumHistoryRing;
pub use config::{ConfigError, HistoryConfig, DEFAULT_HISTORY_TURNS, DEFAULT_NET_PLAYERS};
pub use received::{ReceivedPacketEntry, ReceivedPacketRing, TurnPackets};
pub use snapshot::{find_turn, latest_valid_turn, ChecksumSnapshot};
