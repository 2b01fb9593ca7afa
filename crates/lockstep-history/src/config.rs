//! History ring sizing and its validation.

use std::error::Error;
use std::fmt;

use lockstep_core::PLAYERS_COUNT;

/// Default number of turns each ring retains.
pub const DEFAULT_HISTORY_TURNS: usize = 40;

/// Default number of network players exchanging packets.
pub const DEFAULT_NET_PLAYERS: usize = 4;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`HistoryConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `history_turns` is zero, so no turn could ever be retained.
    ZeroHistoryTurns,
    /// `net_players` is zero, so the packet ring would have no slots.
    ZeroNetPlayers,
    /// `net_players` exceeds the number of player slots.
    TooManyNetPlayers {
        /// The configured player count.
        configured: usize,
        /// Largest accepted value.
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroHistoryTurns => write!(f, "history_turns must be at least 1"),
            Self::ZeroNetPlayers => write!(f, "net_players must be at least 1"),
            Self::TooManyNetPlayers { configured, max } => {
                write!(f, "net_players {configured} exceeds the {max} player slots")
            }
        }
    }
}

impl Error for ConfigError {}

// ── HistoryConfig ──────────────────────────────────────────────────

/// Sizing for the checksum and received-packet history rings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Turns retained by the checksum ring (ring depth `N`).
    pub history_turns: usize,
    /// Network players whose packets are recorded per turn.
    pub net_players: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_turns: DEFAULT_HISTORY_TURNS,
            net_players: DEFAULT_NET_PLAYERS,
        }
    }
}

impl HistoryConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_turns == 0 {
            return Err(ConfigError::ZeroHistoryTurns);
        }
        if self.net_players == 0 {
            return Err(ConfigError::ZeroNetPlayers);
        }
        if self.net_players > PLAYERS_COUNT {
            return Err(ConfigError::TooManyNetPlayers {
                configured: self.net_players,
                max: PLAYERS_COUNT,
            });
        }
        Ok(())
    }

    /// Slot count of the received-packet ring.
    ///
    /// Holds `history_turns` full turns even if every network player
    /// sends input on every turn.
    pub fn received_capacity(&self) -> usize {
        self.history_turns.saturating_mul(self.net_players)
    }
}
