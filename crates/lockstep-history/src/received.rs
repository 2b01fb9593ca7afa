//! Ring of input packets received from remote players.
//!
//! Independent of the checksum ring: it answers "what did each peer send
//! on turn T", which separates input-level desyncs (a lost or late
//! packet) from simulation-level ones.
//!
//! # Known limitation
//!
//! Empty packets are never stored. A turn on which every remote player
//! sent an empty packet therefore looks exactly like a turn that was
//! never received, and [`ReceivedPacketRing::packets_for_turn`] returns
//! `None` for both.

use smallvec::SmallVec;

use lockstep_core::{GameTurn, Packet, PlayerId, NET_PLAYERS_COUNT};

use crate::config::{ConfigError, HistoryConfig};

/// Packets of one turn indexed by player slot.
pub type TurnPackets = SmallVec<[Packet; NET_PLAYERS_COUNT]>;

/// One stored packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceivedPacketEntry {
    /// Turn the packet was received for.
    pub turn: GameTurn,
    /// Sender slot.
    pub player: PlayerId,
    /// Whether the slot has been written since the last clear.
    pub valid: bool,
    /// The packet as delivered by the transport.
    pub packet: Packet,
}

impl ReceivedPacketEntry {
    /// The cleared slot.
    pub const EMPTY: ReceivedPacketEntry = ReceivedPacketEntry {
        turn: GameTurn::SENTINEL,
        player: PlayerId(0),
        valid: false,
        packet: Packet {
            turn: GameTurn(0),
            checksum: 0,
            action: 0,
            actn_par1: 0,
            actn_par2: 0,
            pos_x: 0,
            pos_y: 0,
            control_flags: 0,
            additional_packet_values: 0,
        },
    };
}

impl Default for ReceivedPacketEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounded history of non-empty packets keyed by (turn, player).
///
/// Sized `history_turns * net_players`, so the most recent
/// `history_turns` turns survive even if every player sends input every
/// turn. Lookups scan the whole ring.
#[derive(Clone, Debug)]
pub struct ReceivedPacketRing {
    entries: Box<[ReceivedPacketEntry]>,
    head: usize,
    net_players: usize,
}

impl ReceivedPacketRing {
    /// A cleared ring with the default sizing.
    pub fn new() -> Self {
        let cfg = HistoryConfig::default();
        Self::with_sizes(cfg.received_capacity(), cfg.net_players)
    }

    /// A cleared ring sized from `config`.
    pub fn with_config(config: &HistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_sizes(
            config.received_capacity(),
            config.net_players,
        ))
    }

    fn with_sizes(capacity: usize, net_players: usize) -> Self {
        Self {
            entries: vec![ReceivedPacketEntry::EMPTY; capacity].into_boxed_slice(),
            head: 0,
            net_players,
        }
    }

    /// Invalidate every slot and rewind the head.
    pub fn clear(&mut self) {
        self.entries.fill(ReceivedPacketEntry::EMPTY);
        self.head = 0;
    }

    /// Record one remote player's packet for `turn`.
    ///
    /// Empty packets and senders outside the network player range are
    /// skipped. Overwrites the oldest entry once the ring is full.
    /// Returns whether the packet was stored.
    pub fn store_received_packet(&mut self, turn: GameTurn, player: PlayerId, packet: &Packet) -> bool {
        if packet.is_empty() || player.index() >= self.net_players {
            return false;
        }
        self.entries[self.head] = ReceivedPacketEntry {
            turn,
            player,
            valid: true,
            packet: *packet,
        };
        self.head = (self.head + 1) % self.entries.len();
        true
    }

    /// Record the result of one turn's packet exchange.
    ///
    /// `packets` is indexed by player slot. The local player's own slot
    /// is skipped. Returns the number of packets stored.
    pub fn store_received_packets(&mut self, turn: GameTurn, packets: &[Packet], local: PlayerId) -> usize {
        let mut stored = 0;
        for (slot, packet) in packets.iter().enumerate().take(self.net_players) {
            if slot == local.index() {
                continue;
            }
            if self.store_received_packet(turn, PlayerId(slot as u8), packet) {
                stored += 1;
            }
        }
        if stored > 0 {
            tracing::debug!(
                target: "lockstep::multiplayer",
                "store_received_packets: turn={turn} stored={stored}",
            );
        }
        stored
    }

    /// All packets received for `turn`, indexed by player slot.
    ///
    /// Slots with no stored packet are empty packets. Returns `None` if
    /// no entry at all matches `turn`.
    pub fn packets_for_turn(&self, turn: GameTurn) -> Option<TurnPackets> {
        let mut out: TurnPackets = SmallVec::from_elem(Packet::default(), self.net_players);
        let mut found = false;
        for entry in self.entries.iter().filter(|e| e.valid && e.turn == turn) {
            if let Some(slot) = out.get_mut(entry.player.index()) {
                *slot = entry.packet;
                found = true;
            }
        }
        found.then_some(out)
    }

    /// The packet `player` sent for `turn`, if stored.
    pub fn packet_for_player(&self, turn: GameTurn, player: PlayerId) -> Option<&Packet> {
        self.entries
            .iter()
            .find(|e| e.valid && e.turn == turn && e.player == player)
            .map(|e| &e.packet)
    }

    /// Packets for the turn whose input executes now under `input_lag`.
    ///
    /// Looks up `current - input_lag`, clamped at turn 0.
    pub fn packets_for_lagged_turn(&self, current: GameTurn, input_lag: u32) -> Option<TurnPackets> {
        self.packets_for_turn(current.saturating_sub(input_lag))
    }

    /// Every slot in storage order.
    pub fn entries(&self) -> &[ReceivedPacketEntry] {
        &self.entries
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Next slot to be written.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Network player slots covered.
    pub fn net_players(&self) -> usize {
        self.net_players
    }

    /// Number of valid entries.
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }
}

impl Default for ReceivedPacketRing {
    fn default() -> Self {
        Self::new()
    }
}
