//! Desync diagnosis for lockstep sessions.
//!
//! The resync authority packs its checksum history into a
//! [`DesyncDiagnosticsPayload`], ships it with the resync message as a
//! fixed-size block ([`codec`]), and the desynced client compares it
//! against its own history ([`compare_desync_history_from_host`]).
//! [`verify_turn_checksums`] is the per-turn check that detects the
//! desync in the first place, and [`DesyncDiagnostics`] ties the rings,
//! the verifier and the comparator to one peer's session.
//!
//! Nothing here fails the caller: missing or stale data degrades to a
//! log line and a [`DesyncOutcome`] saying so. Only payload decoding
//! returns errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod compare;
pub mod error;
pub mod payload;
pub mod session;
pub mod verify;

pub use codec::{encoded_len, payload_from_bytes, payload_to_bytes, FORMAT_VERSION, MAGIC};
pub use compare::{
    compare_desync_history_from_host, ChecksumComparison, ChecksumField, DesyncOutcome,
    DesyncReport, ThingCensus,
};
pub use error::PayloadError;
pub use payload::DesyncDiagnosticsPayload;
pub use session::DesyncDiagnostics;
pub use verify::{verify_turn_checksums, ChecksumVerdict, PlayerMismatch};
