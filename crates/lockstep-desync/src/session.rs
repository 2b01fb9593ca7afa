//! One peer's desync diagnostics state for a game session.

use lockstep_core::{Checksum, GameTurn, Packet, PlayerId, SimulationWorld};
use lockstep_history::{ChecksumHistoryRing, ConfigError, HistoryConfig, ReceivedPacketRing};

use crate::compare::{compare_with_detected_turn, DesyncOutcome};
use crate::payload::DesyncDiagnosticsPayload;
use crate::verify::{verify_turn_checksums, ChecksumVerdict};

/// Owns both history rings and wires them to the turn loop and the
/// resync flow.
///
/// Per turn, the scheduler calls [`on_turn_simulated`](Self::on_turn_simulated)
/// after the simulation update and [`on_packets_exchanged`](Self::on_packets_exchanged)
/// once the exchange completes. On resync the host calls
/// [`prepare_resync`](Self::prepare_resync) and the client that fell out
/// of sync calls [`analyze_resync`](Self::analyze_resync).
#[derive(Clone, Debug)]
pub struct DesyncDiagnostics {
    checksums: ChecksumHistoryRing,
    received: ReceivedPacketRing,
    desync_detected_turn: Option<GameTurn>,
}

impl DesyncDiagnostics {
    /// Diagnostics with default ring sizes.
    pub fn new() -> Self {
        Self {
            checksums: ChecksumHistoryRing::new(),
            received: ReceivedPacketRing::new(),
            desync_detected_turn: None,
        }
    }

    /// Diagnostics sized from `config`.
    pub fn with_config(config: &HistoryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            checksums: ChecksumHistoryRing::with_config(config)?,
            received: ReceivedPacketRing::with_config(config)?,
            desync_detected_turn: None,
        })
    }

    /// Forget all history. Call on session start and level load.
    pub fn reset(&mut self) {
        self.checksums.clear();
        self.received.clear();
        self.desync_detected_turn = None;
    }

    /// Record the turn just simulated. Returns the turn checksum to stamp
    /// on the local outgoing packet.
    pub fn on_turn_simulated(&mut self, world: &dyn SimulationWorld) -> Checksum {
        self.checksums.store_turn_checksums(world)
    }

    /// Record one turn's exchanged packets, skipping the local slot.
    pub fn on_packets_exchanged(&mut self, turn: GameTurn, packets: &[Packet], local: PlayerId) -> usize {
        self.received.store_received_packets(turn, packets, local)
    }

    /// Check the exchanged checksums against the host's.
    ///
    /// A mismatch records the host packet's turn as the desync turn.
    pub fn verify_turn_checksums(
        &mut self,
        world: &dyn SimulationWorld,
        packets: &[Packet],
        host: PlayerId,
    ) -> ChecksumVerdict {
        let verdict = verify_turn_checksums(world, packets, host);
        if let Some(turn) = verdict.detected_turn() {
            self.desync_detected_turn = Some(turn);
        }
        verdict
    }

    /// Host side: pack the local checksum history for a resync message.
    pub fn prepare_resync(&self) -> DesyncDiagnosticsPayload {
        DesyncDiagnosticsPayload::pack(&self.checksums)
    }

    /// Client side: compare local history with the host's payload.
    ///
    /// Consumes the payload's diagnostics flag; a second call on the same
    /// payload reports [`DesyncOutcome::MissingPayload`].
    pub fn analyze_resync(
        &mut self,
        world: &dyn SimulationWorld,
        payload: &mut DesyncDiagnosticsPayload,
    ) -> DesyncOutcome {
        compare_with_detected_turn(world, &self.checksums, payload, self.desync_detected_turn)
    }

    /// Host packet turn of the last checksum mismatch seen.
    pub fn desync_detected_turn(&self) -> Option<GameTurn> {
        self.desync_detected_turn
    }

    /// The local checksum ring.
    pub fn checksum_history(&self) -> &ChecksumHistoryRing {
        &self.checksums
    }

    /// The received-packet ring.
    pub fn received_packets(&self) -> &ReceivedPacketRing {
        &self.received
    }
}

impl Default for DesyncDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_test_utils::fixtures::{agreeing_exchange, checksum_packet};
    use lockstep_test_utils::MockWorld;

    #[test]
    fn turn_loop_fills_both_rings() {
        let mut diag = DesyncDiagnostics::new();
        let mut world = MockWorld::new();
        world.add_human(PlayerId(0), 0, 0);
        world.add_human(PlayerId(1), 0, 0);
        for _ in 0..3 {
            let checksum = diag.on_turn_simulated(&world);
            let turn = world.current_turn();
            let packets = agreeing_exchange(turn, checksum);
            diag.on_packets_exchanged(turn, &packets, PlayerId(0));
            assert!(!diag.verify_turn_checksums(&world, &packets, PlayerId(0)).is_mismatch());
            world.step();
        }
        assert_eq!(diag.checksum_history().valid_count(), 3);
        assert_eq!(diag.received_packets().valid_count(), 9);
        assert_eq!(diag.desync_detected_turn(), None);
    }

    #[test]
    fn mismatch_records_detected_turn() {
        let mut diag = DesyncDiagnostics::new();
        let mut world = MockWorld::new();
        world.add_human(PlayerId(0), 0, 0);
        world.add_human(PlayerId(1), 0, 0);
        let mut packets = agreeing_exchange(GameTurn(12), 5);
        packets[1] = checksum_packet(GameTurn(12), 6);
        diag.verify_turn_checksums(&world, &packets, PlayerId(0));
        assert_eq!(diag.desync_detected_turn(), Some(GameTurn(12)));

        diag.reset();
        assert_eq!(diag.desync_detected_turn(), None);
        assert_eq!(diag.checksum_history().valid_count(), 0);
    }

    #[test]
    fn config_errors_propagate() {
        let cfg = HistoryConfig {
            net_players: 0,
            ..HistoryConfig::default()
        };
        assert_eq!(
            DesyncDiagnostics::with_config(&cfg).unwrap_err(),
            ConfigError::ZeroNetPlayers
        );
    }
}
