//! The per-turn, per-player input packet exchanged by the transport.

use crate::checksum::Checksum;
use crate::id::GameTurn;

/// One player's input for one turn, as delivered by the transport.
///
/// The all-zero packet is the "nothing received / no input" sentinel,
/// see [`is_empty`](Packet::is_empty).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Packet {
    /// Turn the sender stamped on the packet.
    pub turn: GameTurn,
    /// Sender's turn checksum for `turn`.
    pub checksum: Checksum,
    /// Action code, 0 for none.
    pub action: u8,
    /// First action parameter.
    pub actn_par1: u16,
    /// Second action parameter.
    pub actn_par2: u16,
    /// Cursor x in map units.
    pub pos_x: i32,
    /// Cursor y in map units.
    pub pos_y: i32,
    /// Held/clicked control bits.
    pub control_flags: u32,
    /// Packed context bits.
    pub additional_packet_values: u8,
}

impl Packet {
    /// Whether this is the empty/no-op packet.
    ///
    /// History rings never store empty packets.
    pub fn is_empty(&self) -> bool {
        *self == Packet::default()
    }

    /// A packet carrying only an action and its two parameters.
    pub fn with_action(turn: GameTurn, action: u8, par1: u16, par2: u16) -> Self {
        Self {
            turn,
            action,
            actn_par1: par1,
            actn_par2: par2,
            ..Self::default()
        }
    }
}
