//! Strongly-typed identifiers for turns, players and things.

use std::fmt;

/// Number of player slots tracked per turn, including the neutral and
/// hero slots that never send input.
pub const PLAYERS_COUNT: usize = 9;

/// Number of network player slots that exchange input packets.
pub const NET_PLAYERS_COUNT: usize = 4;

/// Monotonically increasing simulation turn counter.
///
/// Incremented once per lockstep step by the external scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameTurn(pub u32);

impl GameTurn {
    /// Out-of-range turn stamped on history slots that have not been
    /// written since the last clear.
    pub const SENTINEL: GameTurn = GameTurn(10_000_000);

    /// The turn `turns` steps before this one, clamped at turn 0.
    pub fn saturating_sub(self, turns: u32) -> Self {
        Self(self.0.saturating_sub(turns))
    }

    /// The turn after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for GameTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GameTurn {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a player slot.
///
/// Slots `0..NET_PLAYERS_COUNT` double as packet slots in the per-turn
/// exchange; higher slots belong to non-network players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The slot index as a `usize`, for array addressing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for PlayerId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Index of a thing in the simulation's global thing table.
///
/// Index 0 is reserved: as a list head it means "empty list", as a
/// `next_of_class` link it terminates the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingIndex(pub u16);

impl ThingIndex {
    /// The null link.
    pub const NONE: ThingIndex = ThingIndex(0);

    /// Whether this is the null link.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ThingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ThingIndex {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_out_of_range() {
        assert!(GameTurn::SENTINEL > GameTurn(1_000_000));
    }

    #[test]
    fn saturating_sub_clamps_at_zero() {
        assert_eq!(GameTurn(3).saturating_sub(5), GameTurn(0));
        assert_eq!(GameTurn(10).saturating_sub(4), GameTurn(6));
    }

    #[test]
    fn thing_index_zero_is_none() {
        assert!(ThingIndex::NONE.is_none());
        assert!(!ThingIndex(7).is_none());
    }
}
