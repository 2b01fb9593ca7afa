//! Benchmark profiles for lockstep desync diagnostics.
//!
//! - [`reference_world`]: a mid-game sized world (500 things)
//! - [`stress_world`]: a late-game sized world (2000 things)
//! - [`warm_ring`]: a checksum ring already wrapped past its depth

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lockstep_history::ChecksumHistoryRing;
use lockstep_test_utils::fixtures::random_world;
use lockstep_test_utils::MockWorld;

/// Mid-game world: 500 things, a few rooms, two humans.
pub fn reference_world(seed: u64) -> MockWorld {
    random_world(seed, 500)
}

/// Late-game world: 2000 things, near the mock thing capacity.
pub fn stress_world(seed: u64) -> MockWorld {
    random_world(seed, 2000)
}

/// Step `world` through `turns` turns, storing each, and return the ring.
pub fn warm_ring(world: &mut MockWorld, turns: usize) -> ChecksumHistoryRing {
    let mut ring = ChecksumHistoryRing::new();
    for _ in 0..turns {
        ring.store_turn_checksums(world);
        world.step();
    }
    ring
}
