//! Fixed-depth ring of per-turn checksum snapshots.
//!
//! [`ChecksumHistoryRing`] is written once per simulated turn and read
//! only on the resync path. Slots are overwritten oldest-first; a slot
//! that has not been written since the last [`clear`](ChecksumHistoryRing::clear)
//! carries the sentinel turn and `valid == false`.

use lockstep_core::{Checksum, GameTurn, SimulationWorld};

use crate::config::{ConfigError, HistoryConfig, DEFAULT_HISTORY_TURNS};
use crate::snapshot::{find_turn, latest_valid_turn, ChecksumSnapshot};

/// The local peer's checksum history.
#[derive(Clone, Debug)]
pub struct ChecksumHistoryRing {
    entries: Box<[ChecksumSnapshot]>,
    head: usize,
}

impl ChecksumHistoryRing {
    /// A cleared ring retaining the default 40 turns.
    pub fn new() -> Self {
        Self::with_depth_unchecked(DEFAULT_HISTORY_TURNS)
    }

    /// A cleared ring sized from `config`.
    pub fn with_config(config: &HistoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_depth_unchecked(config.history_turns))
    }

    fn with_depth_unchecked(depth: usize) -> Self {
        Self {
            entries: vec![ChecksumSnapshot::EMPTY; depth].into_boxed_slice(),
            head: 0,
        }
    }

    /// Reset every slot to the sentinel state and rewind the head.
    ///
    /// Call at session start and on level load. Idempotent.
    pub fn clear(&mut self) {
        self.entries.fill(ChecksumSnapshot::EMPTY);
        self.head = 0;
    }

    /// Capture `world` at its current turn into the slot at the head.
    ///
    /// Returns the turn checksum so the caller can stamp it on the local
    /// outgoing packet. Call exactly once per simulated turn, after the
    /// simulation update and before the turn counter advances.
    pub fn store_turn_checksums(&mut self, world: &dyn SimulationWorld) -> Checksum {
        let snap = ChecksumSnapshot::capture(world);
        self.push(snap);
        tracing::debug!(
            target: "lockstep::multiplayer",
            "store_turn_checksums: turn={} checksum={:08x} things={:08x} rooms={:08x} players={:08x}",
            snap.turn,
            snap.turn_checksum,
            snap.things_sum,
            snap.rooms_sum,
            snap.players_sum,
        );
        snap.turn_checksum
    }

    /// Write a precomputed snapshot at the head, marking it valid.
    pub fn push(&mut self, mut snapshot: ChecksumSnapshot) {
        snapshot.valid = true;
        self.entries[self.head] = snapshot;
        self.head = (self.head + 1) % self.entries.len();
    }

    /// The valid snapshot for `turn`, if still retained.
    pub fn find(&self, turn: GameTurn) -> Option<&ChecksumSnapshot> {
        find_turn(&self.entries, turn)
    }

    /// Most recent turn held by the ring.
    pub fn latest_turn(&self) -> Option<GameTurn> {
        latest_valid_turn(&self.entries)
    }

    /// Every slot in storage order, valid or not.
    pub fn entries(&self) -> &[ChecksumSnapshot] {
        &self.entries
    }

    /// Valid slots, oldest first.
    pub fn iter_valid(&self) -> impl Iterator<Item = &ChecksumSnapshot> {
        let (newer, older) = self.entries.split_at(self.head);
        older.iter().chain(newer).filter(|e| e.valid)
    }

    /// Next slot to be written.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of turns the ring retains.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Number of slots written since the last clear, up to the depth.
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }
}

impl Default for ChecksumHistoryRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_test_utils::MockWorld;

    #[test]
    fn test_new_ring_is_cleared() {
        let ring = ChecksumHistoryRing::new();
        assert_eq!(ring.depth(), 40);
        assert_eq!(ring.head(), 0);
        assert_eq!(ring.valid_count(), 0);
        assert!(ring.latest_turn().is_none());
        assert!(ring
            .entries()
            .iter()
            .all(|e| e.turn == GameTurn::SENTINEL && !e.valid));
    }

    #[test]
    fn test_config_rejects_zero_depth() {
        let cfg = HistoryConfig {
            history_turns: 0,
            ..HistoryConfig::default()
        };
        assert_eq!(
            ChecksumHistoryRing::with_config(&cfg).unwrap_err(),
            ConfigError::ZeroHistoryTurns
        );
    }

    #[test]
    fn test_store_advances_head_and_wraps() {
        let cfg = HistoryConfig {
            history_turns: 3,
            ..HistoryConfig::default()
        };
        let mut ring = ChecksumHistoryRing::with_config(&cfg).unwrap();
        let mut world = MockWorld::new();
        for _ in 0..4 {
            ring.store_turn_checksums(&world);
            world.advance_turn();
        }
        assert_eq!(ring.head(), 1);
        assert_eq!(ring.valid_count(), 3);
        assert!(ring.find(GameTurn(0)).is_none());
        assert_eq!(ring.latest_turn(), Some(GameTurn(3)));
        let turns: Vec<u32> = ring.iter_valid().map(|e| e.turn.0).collect();
        assert_eq!(turns, vec![1, 2, 3]);
    }

    #[test]
    fn test_store_returns_turn_checksum() {
        let mut world = MockWorld::new();
        world.spawn_creature(4, 4);
        world.seeds_mut().action = 99;
        let mut ring = ChecksumHistoryRing::new();
        let checksum = ring.store_turn_checksums(&world);
        let stored = ring.find(GameTurn(0)).unwrap();
        assert_eq!(stored.turn_checksum, checksum);
        assert_eq!(stored.expected_turn_checksum(), checksum);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ring = ChecksumHistoryRing::new();
        ring.store_turn_checksums(&MockWorld::new());
        ring.clear();
        let once = ring.entries().to_vec();
        ring.clear();
        assert_eq!(ring.entries(), &once[..]);
        assert_eq!(ring.head(), 0);
        assert_eq!(ring.valid_count(), 0);
    }

    #[test]
    fn test_push_marks_valid() {
        let mut ring = ChecksumHistoryRing::new();
        ring.push(ChecksumSnapshot {
            turn: GameTurn(12),
            ..ChecksumSnapshot::EMPTY
        });
        assert!(ring.find(GameTurn(12)).is_some_and(|e| e.valid));
    }
}
