//! Test utilities and mock worlds for lockstep development.
//!
//! [`MockWorld`] is an in-memory [`SimulationWorld`] with builder-style
//! helpers for spawning things, rooms and players, stepping turns
//! deterministically and corrupting thing lists. [`fixtures`] adds
//! seeded random worlds and packet builders.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;

use lockstep_core::{
    Camera, Controller, CreatureInstance, GameTurn, MapPos, Player, PlayerId, RandomSeeds, Room,
    SimulationWorld, Thing, ThingCategory, ThingClass, ThingIndex, PLAYERS_COUNT,
};

/// Default thing table capacity for mock worlds.
pub const MOCK_THING_CAPACITY: usize = 2048;

/// Class stored for things spawned into each category list.
pub fn class_for(category: ThingCategory) -> ThingClass {
    match category {
        ThingCategory::Creatures => ThingClass::Creature,
        ThingCategory::Traps => ThingClass::Trap,
        ThingCategory::Shots => ThingClass::Shot,
        ThingCategory::Objects => ThingClass::Object,
        ThingCategory::Effects => ThingClass::Effect,
        ThingCategory::DeadCreatures => ThingClass::DeadCreature,
        ThingCategory::EffectGens => ThingClass::EffectGen,
        ThingCategory::Doors => ThingClass::Door,
    }
}

fn lcg(state: u32) -> u32 {
    state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

/// In-memory simulation world.
///
/// Things live in an `IndexMap` keyed by index, so iteration order is
/// insertion order and two worlds built by the same calls step
/// identically. New things are pushed at the head of their list.
#[derive(Clone, Debug)]
pub struct MockWorld {
    turn: GameTurn,
    things: IndexMap<ThingIndex, Thing>,
    heads: [ThingIndex; ThingCategory::COUNT],
    next_index: u16,
    capacity: usize,
    rooms: Vec<Room>,
    players: [Option<Player>; PLAYERS_COUNT],
    seeds: RandomSeeds,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::with_capacity(MOCK_THING_CAPACITY)
    }

    /// A world whose thing table holds `capacity` things.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turn: GameTurn(0),
            things: IndexMap::new(),
            heads: [ThingIndex::NONE; ThingCategory::COUNT],
            next_index: 1,
            capacity,
            rooms: Vec::new(),
            players: [None; PLAYERS_COUNT],
            seeds: RandomSeeds::default(),
        }
    }

    // ── Turns ──────────────────────────────────────────────────────

    pub fn set_turn(&mut self, turn: GameTurn) {
        self.turn = turn;
    }

    /// Advance the turn counter without touching any state.
    pub fn advance_turn(&mut self) {
        self.turn = self.turn.next();
    }

    /// Simulate one turn: every thing moves one unit east and reseeds,
    /// the action and player RNGs advance, then the turn counter does.
    pub fn step(&mut self) {
        for thing in self.things.values_mut() {
            thing.mappos.x = thing.mappos.x.wrapping_add(1);
            thing.random_seed = lcg(thing.random_seed);
        }
        self.seeds.action = lcg(self.seeds.action);
        self.seeds.player = lcg(self.seeds.player);
        self.advance_turn();
    }

    // ── Things ─────────────────────────────────────────────────────

    /// Spawn a default thing of the category's class at (x, y).
    pub fn spawn(&mut self, category: ThingCategory, x: i32, y: i32) -> ThingIndex {
        let class = class_for(category);
        let creature = (class == ThingClass::Creature).then(CreatureInstance::default);
        let thing = Thing {
            index: ThingIndex::NONE,
            exists: true,
            class,
            model: 1,
            owner: 0,
            creation_turn: self.turn,
            random_seed: u32::from(self.next_index).wrapping_mul(2_654_435_761),
            mappos: MapPos { x, y, z: 0 },
            health: 100,
            current_frame: 0,
            max_frames: 8,
            next_of_class: ThingIndex::NONE,
            creature,
        };
        self.insert_thing(category, thing)
    }

    pub fn spawn_creature(&mut self, x: i32, y: i32) -> ThingIndex {
        self.spawn(ThingCategory::Creatures, x, y)
    }

    /// Link a caller-built thing at the head of `category`'s list.
    ///
    /// The thing's `index` and `next_of_class` are overwritten.
    pub fn insert_thing(&mut self, category: ThingCategory, mut thing: Thing) -> ThingIndex {
        let index = ThingIndex(self.next_index);
        self.next_index += 1;
        thing.index = index;
        thing.next_of_class = self.heads[category.index()];
        self.heads[category.index()] = index;
        self.things.insert(index, thing);
        index
    }

    /// Borrow a thing. Panics if it does not exist.
    pub fn thing_ref(&self, index: ThingIndex) -> &Thing {
        &self.things[&index]
    }

    /// Mutably borrow a thing. Panics if it does not exist.
    pub fn thing_mut(&mut self, index: ThingIndex) -> &mut Thing {
        self.things
            .get_mut(&index)
            .unwrap_or_else(|| panic!("no thing {index}"))
    }

    pub fn thing_count(&self) -> usize {
        self.things.len()
    }

    // ── Corruption ─────────────────────────────────────────────────

    /// Point `index`'s list link at `target`, valid or not.
    pub fn set_link(&mut self, index: ThingIndex, target: ThingIndex) {
        self.thing_mut(index).next_of_class = target;
    }

    /// Close `category`'s list into a cycle by linking its tail back to
    /// its head. No-op on an empty list.
    pub fn make_cycle(&mut self, category: ThingCategory) {
        let head = self.heads[category.index()];
        let mut tail = head;
        while let Some(next) = self
            .things
            .get(&tail)
            .map(|t| t.next_of_class)
            .filter(|n| !n.is_none())
        {
            tail = next;
        }
        if !tail.is_none() {
            self.set_link(tail, head);
        }
    }

    // ── Rooms ──────────────────────────────────────────────────────

    /// Add a live room and return its slot.
    pub fn add_room(&mut self, slabs_count: u32, central_stl_x: u16, central_stl_y: u16) -> usize {
        let slot = self.rooms.len();
        self.rooms.push(Room {
            index: slot as u16 + 1,
            exists: true,
            slabs_count,
            central_stl_x,
            central_stl_y,
            efficiency: 100,
            used_capacity: 0,
        });
        slot
    }

    pub fn rooms_mut(&mut self) -> &mut Vec<Room> {
        &mut self.rooms
    }

    // ── Players ────────────────────────────────────────────────────

    /// A human player with a camera at (x, y).
    pub fn add_human(&mut self, id: PlayerId, x: i32, y: i32) {
        self.players[id.index()] = Some(Player {
            id,
            controller: Controller::Human,
            camera: Some(Camera { x, y, z: 0 }),
            instance_remain_turns: 0,
            instance_num: 0,
        });
    }

    pub fn add_computer(&mut self, id: PlayerId) {
        self.players[id.index()] = Some(Player {
            id,
            controller: Controller::Computer,
            camera: None,
            instance_remain_turns: 0,
            instance_num: 0,
        });
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn remove_player(&mut self, id: PlayerId) {
        self.players[id.index()] = None;
    }

    // ── Seeds ──────────────────────────────────────────────────────

    pub fn seeds_mut(&mut self) -> &mut RandomSeeds {
        &mut self.seeds
    }
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationWorld for MockWorld {
    fn current_turn(&self) -> GameTurn {
        self.turn
    }

    fn thing_list_head(&self, category: ThingCategory) -> ThingIndex {
        self.heads[category.index()]
    }

    fn thing(&self, index: ThingIndex) -> Option<&Thing> {
        self.things.get(&index)
    }

    fn thing_capacity(&self) -> usize {
        self.capacity
    }

    fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index()).and_then(Option::as_ref)
    }

    fn random_seeds(&self) -> RandomSeeds {
        self.seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_core::{count_things, thing_list_checksum, TraversalError};

    #[test]
    fn spawned_things_are_linked_head_first() {
        let mut world = MockWorld::new();
        let a = world.spawn(ThingCategory::Traps, 0, 0);
        let b = world.spawn(ThingCategory::Traps, 1, 0);
        assert_eq!(world.thing_list_head(ThingCategory::Traps), b);
        assert_eq!(world.thing_ref(b).next_of_class, a);
        assert_eq!(count_things(&world, ThingCategory::Traps), 2);
        assert_eq!(world.thing_ref(a).class, ThingClass::Trap);
    }

    #[test]
    fn identical_worlds_step_identically() {
        let mut a = MockWorld::new();
        a.spawn_creature(3, 4);
        let mut b = a.clone();
        a.step();
        b.step();
        assert_eq!(a.current_turn(), GameTurn(1));
        assert_eq!(
            thing_list_checksum(&a, ThingCategory::Creatures),
            thing_list_checksum(&b, ThingCategory::Creatures)
        );
        assert_eq!(a.random_seeds(), b.random_seeds());
    }

    #[test]
    fn make_cycle_is_detected() {
        let mut world = MockWorld::with_capacity(8);
        world.spawn(ThingCategory::Shots, 0, 0);
        world.spawn(ThingCategory::Shots, 0, 0);
        world.make_cycle(ThingCategory::Shots);
        let r = thing_list_checksum(&world, ThingCategory::Shots);
        assert!(matches!(
            r.error,
            Some(TraversalError::CycleSuspected { .. })
        ));
    }

    #[test]
    fn players_round_trip() {
        let mut world = MockWorld::new();
        world.add_human(PlayerId(2), 5, 6);
        assert!(world.player(PlayerId(2)).is_some());
        world.player_mut(PlayerId(2)).unwrap().instance_num = 3;
        assert_eq!(world.player(PlayerId(2)).unwrap().instance_num, 3);
        world.remove_player(PlayerId(2));
        assert!(world.player(PlayerId(2)).is_none());
    }
}
