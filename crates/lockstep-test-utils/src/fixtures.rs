//! Seeded random worlds and packet builders.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lockstep_core::{Checksum, GameTurn, Packet, PlayerId, ThingCategory, NET_PLAYERS_COUNT};

use crate::MockWorld;

/// A world populated from `seed`: `things` things spread across every
/// category, a handful of rooms, two humans and one computer player,
/// and random RNG seeds. Same seed, same world.
pub fn random_world(seed: u64, things: usize) -> MockWorld {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = MockWorld::new();
    for _ in 0..things {
        let category = ThingCategory::ALL[rng.next_u32() as usize % ThingCategory::COUNT];
        let x = (rng.next_u32() % 0x4000) as i32;
        let y = (rng.next_u32() % 0x4000) as i32;
        let index = world.spawn(category, x, y);
        world.thing_mut(index).health = (rng.next_u32() % 1000) as i32;
    }
    for _ in 0..(rng.next_u32() % 6) {
        let slabs = rng.next_u32() % 64 + 1;
        let x = (rng.next_u32() % 255) as u16;
        let y = (rng.next_u32() % 255) as u16;
        world.add_room(slabs, x, y);
    }
    world.add_human(PlayerId(0), (rng.next_u32() % 0x4000) as i32, 0);
    world.add_human(PlayerId(1), (rng.next_u32() % 0x4000) as i32, 0);
    world.add_computer(PlayerId(2));
    let seeds = world.seeds_mut();
    seeds.action = rng.next_u32();
    seeds.ai = rng.next_u32();
    seeds.player = rng.next_u32();
    world
}

/// A non-empty input packet for `turn`.
pub fn input_packet(turn: GameTurn, action: u8) -> Packet {
    Packet::with_action(turn, action, 0, 0)
}

/// A packet carrying only a turn checksum.
pub fn checksum_packet(turn: GameTurn, checksum: Checksum) -> Packet {
    Packet {
        turn,
        checksum,
        ..Packet::default()
    }
}

/// One turn's exchange where every network player reports `checksum`.
pub fn agreeing_exchange(turn: GameTurn, checksum: Checksum) -> [Packet; NET_PLAYERS_COUNT] {
    [checksum_packet(turn, checksum); NET_PLAYERS_COUNT]
}
