//! Per-turn checksum snapshots and their capture from a world.

use lockstep_core::{
    thing_list_checksum, wrapping_sum, Checksum, GameTurn, PlayerId, SimulationWorld,
    ThingCategory, PLAYERS_COUNT,
};

/// Aggregate checksums of one simulated turn on one peer.
///
/// Plain data with no pointers or variable-length fields, so a slot can
/// be copied into a resync payload verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChecksumSnapshot {
    /// Turn this slot was captured on, or [`GameTurn::SENTINEL`].
    pub turn: GameTurn,
    /// Whether the slot has been written since the last clear.
    pub valid: bool,
    /// Sum of things, rooms, players and the three seeds. Stamped on the
    /// outgoing packet for the turn.
    pub turn_checksum: Checksum,
    /// Sum of the eight category sums below.
    pub things_sum: Checksum,
    /// Sum of per-room checksums over live rooms.
    pub rooms_sum: Checksum,
    /// Sum of [`player_checksums`](Self::player_checksums).
    pub players_sum: Checksum,
    /// Creature list sum.
    pub creatures_sum: Checksum,
    /// Trap list sum.
    pub traps_sum: Checksum,
    /// Shot list sum.
    pub shots_sum: Checksum,
    /// Object list sum.
    pub objects_sum: Checksum,
    /// Effect list sum.
    pub effects_sum: Checksum,
    /// Dead creature list sum.
    pub dead_creatures_sum: Checksum,
    /// Effect generator list sum.
    pub effect_gens_sum: Checksum,
    /// Door list sum.
    pub doors_sum: Checksum,
    /// Gameplay action RNG state.
    pub action_random_seed: u32,
    /// Computer player RNG state.
    pub ai_random_seed: u32,
    /// Player-visible RNG state.
    pub player_random_seed: u32,
    /// Per-slot player checksum, zero for missing or computer players.
    pub player_checksums: [Checksum; PLAYERS_COUNT],
}

impl ChecksumSnapshot {
    /// The cleared slot: sentinel turn, not valid, every sum zero.
    pub const EMPTY: ChecksumSnapshot = ChecksumSnapshot {
        turn: GameTurn::SENTINEL,
        valid: false,
        turn_checksum: 0,
        things_sum: 0,
        rooms_sum: 0,
        players_sum: 0,
        creatures_sum: 0,
        traps_sum: 0,
        shots_sum: 0,
        objects_sum: 0,
        effects_sum: 0,
        dead_creatures_sum: 0,
        effect_gens_sum: 0,
        doors_sum: 0,
        action_random_seed: 0,
        ai_random_seed: 0,
        player_random_seed: 0,
        player_checksums: [0; PLAYERS_COUNT],
    };

    /// Compute a valid snapshot of `world` at its current turn.
    ///
    /// Never fails: a corrupted thing list is logged by the traversal and
    /// contributes its partial sum.
    pub fn capture(world: &dyn SimulationWorld) -> Self {
        let mut snap = Self {
            turn: world.current_turn(),
            valid: true,
            ..Self::EMPTY
        };

        for category in ThingCategory::ALL {
            let list = thing_list_checksum(world, category);
            *snap.category_sum_mut(category) = list.sum;
        }
        snap.things_sum = wrapping_sum(snap.category_sums());

        snap.rooms_sum = wrapping_sum(
            world
                .rooms()
                .iter()
                .filter(|room| room.exists)
                .map(|room| room.checksum()),
        );

        let seeds = world.random_seeds();
        snap.action_random_seed = seeds.action;
        snap.ai_random_seed = seeds.ai;
        snap.player_random_seed = seeds.player;

        for (slot, checksum) in snap.player_checksums.iter_mut().enumerate() {
            let id = PlayerId(slot as u8);
            *checksum = world.player(id).map_or(0, |player| player.checksum());
        }
        snap.players_sum = wrapping_sum(snap.player_checksums);
        snap.turn_checksum = snap.expected_turn_checksum();
        snap
    }

    /// Sum of one category's thing list.
    pub fn category_sum(&self, category: ThingCategory) -> Checksum {
        match category {
            ThingCategory::Creatures => self.creatures_sum,
            ThingCategory::Traps => self.traps_sum,
            ThingCategory::Shots => self.shots_sum,
            ThingCategory::Objects => self.objects_sum,
            ThingCategory::Effects => self.effects_sum,
            ThingCategory::DeadCreatures => self.dead_creatures_sum,
            ThingCategory::EffectGens => self.effect_gens_sum,
            ThingCategory::Doors => self.doors_sum,
        }
    }

    /// Mutable access to one category's sum.
    pub fn category_sum_mut(&mut self, category: ThingCategory) -> &mut Checksum {
        match category {
            ThingCategory::Creatures => &mut self.creatures_sum,
            ThingCategory::Traps => &mut self.traps_sum,
            ThingCategory::Shots => &mut self.shots_sum,
            ThingCategory::Objects => &mut self.objects_sum,
            ThingCategory::Effects => &mut self.effects_sum,
            ThingCategory::DeadCreatures => &mut self.dead_creatures_sum,
            ThingCategory::EffectGens => &mut self.effect_gens_sum,
            ThingCategory::Doors => &mut self.doors_sum,
        }
    }

    /// All eight category sums, in [`ThingCategory::ALL`] order.
    pub fn category_sums(&self) -> [Checksum; ThingCategory::COUNT] {
        ThingCategory::ALL.map(|category| self.category_sum(category))
    }

    /// The turn checksum implied by the other aggregates.
    pub fn expected_turn_checksum(&self) -> Checksum {
        wrapping_sum([
            self.things_sum,
            self.rooms_sum,
            self.players_sum,
            self.action_random_seed,
            self.player_random_seed,
            self.ai_random_seed,
        ])
    }

    /// Whether every derived aggregate matches its parts.
    ///
    /// Always true for snapshots produced by [`capture`](Self::capture).
    /// Useful for rejecting hand-built or decoded snapshots.
    pub fn is_consistent(&self) -> bool {
        self.things_sum == wrapping_sum(self.category_sums())
            && self.players_sum == wrapping_sum(self.player_checksums)
            && self.turn_checksum == self.expected_turn_checksum()
    }
}

impl Default for ChecksumSnapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// First valid snapshot for `turn`, by linear scan.
pub fn find_turn(entries: &[ChecksumSnapshot], turn: GameTurn) -> Option<&ChecksumSnapshot> {
    entries.iter().find(|e| e.valid && e.turn == turn)
}

/// Highest turn among valid snapshots.
pub fn latest_valid_turn(entries: &[ChecksumSnapshot]) -> Option<GameTurn> {
    entries.iter().filter(|e| e.valid).map(|e| e.turn).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_test_utils::MockWorld;

    #[test]
    fn empty_slot_is_sentinel() {
        let e = ChecksumSnapshot::default();
        assert_eq!(e.turn, GameTurn::SENTINEL);
        assert!(!e.valid);
        assert_eq!(e.things_sum, 0);
        assert!(e.is_consistent());
    }

    #[test]
    fn empty_world_captures_zero_sums() {
        let world = MockWorld::new();
        let snap = ChecksumSnapshot::capture(&world);
        assert!(snap.valid);
        assert_eq!(snap.turn, GameTurn(0));
        assert_eq!(snap.things_sum, 0);
        assert_eq!(snap.rooms_sum, 0);
        assert!(snap.is_consistent());
    }

    #[test]
    fn capture_splits_things_by_category() {
        let mut world = MockWorld::new();
        let c = world.spawn_creature(10, 20);
        let d = world.spawn(ThingCategory::Doors, 5, 5);
        let snap = ChecksumSnapshot::capture(&world);

        let creature_sum = world.thing_ref(c).checksum();
        let door_sum = world.thing_ref(d).checksum();
        assert_eq!(snap.creatures_sum, creature_sum);
        assert_eq!(snap.doors_sum, door_sum);
        assert_eq!(snap.traps_sum, 0);
        assert_eq!(snap.things_sum, creature_sum.wrapping_add(door_sum));
        assert!(snap.is_consistent());
    }

    #[test]
    fn dead_rooms_are_skipped() {
        let mut world = MockWorld::new();
        world.add_room(9, 10, 10);
        let live = ChecksumSnapshot::capture(&world).rooms_sum;
        assert_ne!(live, 0);
        world.rooms_mut()[0].exists = false;
        assert_eq!(ChecksumSnapshot::capture(&world).rooms_sum, 0);
    }

    #[test]
    fn computer_players_do_not_count() {
        let mut world = MockWorld::new();
        world.add_human(PlayerId(0), 100, 200);
        world.add_computer(PlayerId(1));
        let snap = ChecksumSnapshot::capture(&world);
        assert_ne!(snap.player_checksums[0], 0);
        assert_eq!(snap.player_checksums[1], 0);
        assert_eq!(snap.players_sum, snap.player_checksums[0]);
    }

    #[test]
    fn turn_checksum_covers_seeds() {
        let mut world = MockWorld::new();
        let a = ChecksumSnapshot::capture(&world);
        world.seeds_mut().ai = 12345;
        let b = ChecksumSnapshot::capture(&world);
        assert_eq!(b.turn_checksum.wrapping_sub(a.turn_checksum), 12345);
    }

    #[test]
    fn tampered_snapshot_is_inconsistent() {
        let mut world = MockWorld::new();
        world.spawn_creature(1, 1);
        let mut snap = ChecksumSnapshot::capture(&world);
        snap.creatures_sum ^= 1;
        assert!(!snap.is_consistent());
    }

    #[test]
    fn find_ignores_invalid_slots() {
        let mut slots = [ChecksumSnapshot::EMPTY; 3];
        slots[1].turn = GameTurn(7);
        assert!(find_turn(&slots, GameTurn(7)).is_none());
        slots[1].valid = true;
        assert_eq!(find_turn(&slots, GameTurn(7)).map(|s| s.turn), Some(GameTurn(7)));
        assert_eq!(latest_valid_turn(&slots), Some(GameTurn(7)));
        assert_eq!(latest_valid_turn(&[ChecksumSnapshot::EMPTY]), None);
    }
}
