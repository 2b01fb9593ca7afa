//! The host's checksum history as carried inside a resync message.

use lockstep_core::GameTurn;
use lockstep_history::{find_turn, latest_valid_turn, ChecksumHistoryRing, ChecksumSnapshot};

/// Diagnostics the resync authority attaches to a resync message.
///
/// `host_history` is a verbatim copy of the host ring's slots in storage
/// order. `has_desync_diagnostics` gates its use and is cleared by the
/// comparator, so a payload can be analyzed at most once per pack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesyncDiagnosticsPayload {
    /// Every slot of the host's checksum ring.
    pub host_history: Vec<ChecksumSnapshot>,
    /// Whether `host_history` is present and not yet analyzed.
    pub has_desync_diagnostics: bool,
}

impl DesyncDiagnosticsPayload {
    /// Pack the host ring for a resync.
    pub fn pack(ring: &ChecksumHistoryRing) -> Self {
        let mut payload = Self::default();
        payload.pack_from(ring);
        payload
    }

    /// Overwrite this payload with a fresh copy of `ring`.
    pub fn pack_from(&mut self, ring: &ChecksumHistoryRing) {
        self.host_history.clear();
        self.host_history.extend_from_slice(ring.entries());
        self.has_desync_diagnostics = true;
        tracing::error!(target: "lockstep::desync", "Host packed desync history for resync");
    }

    /// The host's current turn: the highest valid turn in its history.
    pub fn host_current_turn(&self) -> Option<GameTurn> {
        latest_valid_turn(&self.host_history)
    }

    /// The host's valid snapshot for `turn`.
    pub fn find(&self, turn: GameTurn) -> Option<&ChecksumSnapshot> {
        find_turn(&self.host_history, turn)
    }

    /// Slot count of the carried history.
    pub fn depth(&self) -> usize {
        self.host_history.len()
    }
}
