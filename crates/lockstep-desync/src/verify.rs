//! Per-turn packet checksum verification.
//!
//! Every peer stamps its turn checksum on its outgoing packet. After an
//! exchange, each human player's stamp is compared with the host's; any
//! disagreement is the signal that triggers a resync.

use smallvec::SmallVec;

use lockstep_core::{
    Checksum, GameTurn, Packet, PlayerId, SimulationWorld, NET_PLAYERS_COUNT, PLAYERS_COUNT,
};

/// Why one player failed verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerMismatch {
    /// The player's packet slot was empty.
    EmptyPacket {
        /// Offending player.
        player: PlayerId,
    },
    /// The player reported a different checksum.
    ChecksumDiffers {
        /// Offending player.
        player: PlayerId,
        /// Checksum the player sent.
        checksum: Checksum,
        /// Turn stamped on the player's packet.
        turn: GameTurn,
    },
}

impl PlayerMismatch {
    /// The offending player.
    pub fn player(&self) -> PlayerId {
        match *self {
            Self::EmptyPacket { player } | Self::ChecksumDiffers { player, .. } => player,
        }
    }
}

/// Outcome of checking one turn's exchanged checksums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecksumVerdict {
    /// The resync authority.
    pub host: PlayerId,
    /// Turn stamped on the host packet.
    pub host_turn: GameTurn,
    /// Checksum stamped on the host packet.
    pub host_checksum: Checksum,
    /// Players that disagree with the host.
    pub mismatches: SmallVec<[PlayerMismatch; NET_PLAYERS_COUNT]>,
}

impl ChecksumVerdict {
    /// Whether any player disagrees with the host.
    pub fn is_mismatch(&self) -> bool {
        !self.mismatches.is_empty()
    }

    /// The turn to record as the desync turn, if there was a mismatch.
    pub fn detected_turn(&self) -> Option<GameTurn> {
        self.is_mismatch().then_some(self.host_turn)
    }
}

/// Compare every human player's packet checksum with the host's.
///
/// `packets` is the turn's exchange indexed by player slot. Slots with
/// no player, computer players, players without a packet slot and the
/// host itself are skipped. An empty packet counts as a mismatch.
pub fn verify_turn_checksums(
    world: &dyn SimulationWorld,
    packets: &[Packet],
    host: PlayerId,
) -> ChecksumVerdict {
    let host_packet = packets.get(host.index()).copied().unwrap_or_default();
    let mut verdict = ChecksumVerdict {
        host,
        host_turn: host_packet.turn,
        host_checksum: host_packet.checksum,
        mismatches: SmallVec::new(),
    };

    for slot in 0..PLAYERS_COUNT {
        let id = PlayerId(slot as u8);
        if id == host {
            continue;
        }
        match world.player(id) {
            Some(player) if !player.is_computer_controlled() => {}
            _ => continue,
        }
        let Some(packet) = packets.get(slot) else {
            continue;
        };
        if packet.is_empty() {
            tracing::debug!(
                target: "lockstep::multiplayer",
                "checksums_different: packet[{slot}] is EMPTY",
            );
            verdict.mismatches.push(PlayerMismatch::EmptyPacket { player: id });
            continue;
        }
        if packet.checksum != host_packet.checksum {
            tracing::error!(
                target: "lockstep::desync",
                "Checksums {:08x}(Host) != {:08x}(Client) turn: {} vs {}",
                host_packet.checksum,
                packet.checksum,
                host_packet.turn,
                packet.turn,
            );
            verdict.mismatches.push(PlayerMismatch::ChecksumDiffers {
                player: id,
                checksum: packet.checksum,
                turn: packet.turn,
            });
        }
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_test_utils::fixtures::{agreeing_exchange, checksum_packet};
    use lockstep_test_utils::MockWorld;

    fn two_humans() -> MockWorld {
        let mut world = MockWorld::new();
        world.add_human(PlayerId(0), 0, 0);
        world.add_human(PlayerId(1), 0, 0);
        world
    }

    #[test]
    fn agreeing_players_pass() {
        let world = two_humans();
        let packets = agreeing_exchange(GameTurn(4), 0xabcd);
        let verdict = verify_turn_checksums(&world, &packets, PlayerId(0));
        assert!(!verdict.is_mismatch());
        assert_eq!(verdict.detected_turn(), None);
        assert_eq!(verdict.host_checksum, 0xabcd);
    }

    #[test]
    fn differing_checksum_is_reported() {
        let world = two_humans();
        let mut packets = agreeing_exchange(GameTurn(4), 1);
        packets[1] = checksum_packet(GameTurn(4), 2);
        let verdict = verify_turn_checksums(&world, &packets, PlayerId(0));
        assert_eq!(
            verdict.mismatches.as_slice(),
            &[PlayerMismatch::ChecksumDiffers {
                player: PlayerId(1),
                checksum: 2,
                turn: GameTurn(4),
            }]
        );
        assert_eq!(verdict.detected_turn(), Some(GameTurn(4)));
    }

    #[test]
    fn empty_packet_counts_as_mismatch() {
        let world = two_humans();
        let mut packets = agreeing_exchange(GameTurn(9), 1);
        packets[1] = Packet::default();
        let verdict = verify_turn_checksums(&world, &packets, PlayerId(0));
        assert_eq!(verdict.mismatches[0].player(), PlayerId(1));
        assert!(matches!(
            verdict.mismatches[0],
            PlayerMismatch::EmptyPacket { .. }
        ));
    }

    #[test]
    fn computer_and_absent_players_are_skipped() {
        let mut world = two_humans();
        world.add_computer(PlayerId(2));
        let mut packets = agreeing_exchange(GameTurn(1), 7);
        packets[2] = checksum_packet(GameTurn(1), 99);
        packets[3] = Packet::default();
        let verdict = verify_turn_checksums(&world, &packets, PlayerId(0));
        assert!(!verdict.is_mismatch());
    }

    #[test]
    fn host_slot_is_not_checked_against_itself() {
        let world = two_humans();
        let mut packets = agreeing_exchange(GameTurn(1), 7);
        packets[1] = checksum_packet(GameTurn(1), 8);
        let verdict = verify_turn_checksums(&world, &packets, PlayerId(1));
        assert_eq!(verdict.host_checksum, 8);
        assert_eq!(verdict.mismatches.len(), 1);
        assert_eq!(verdict.mismatches[0].player(), PlayerId(0));
    }
}
