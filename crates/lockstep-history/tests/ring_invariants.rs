//! Property tests for the history rings' bound and compaction invariants.

use lockstep_core::{wrapping_sum, GameTurn, Packet, PlayerId, ThingCategory};
use lockstep_history::{ChecksumHistoryRing, HistoryConfig, ReceivedPacketRing};
use lockstep_test_utils::fixtures::random_world;
use lockstep_test_utils::MockWorld;
use proptest::prelude::*;

fn arb_packet() -> impl Strategy<Value = Packet> {
    (any::<u32>(), any::<u8>(), any::<u16>(), any::<u32>()).prop_map(
        |(checksum, action, par1, flags)| Packet {
            checksum,
            action,
            actn_par1: par1,
            control_flags: flags,
            ..Packet::default()
        },
    )
}

proptest! {
    #[test]
    fn ring_retains_exactly_last_depth_turns(depth in 1usize..64, extra in 1usize..80, start in 0u32..1000) {
        let cfg = HistoryConfig { history_turns: depth, ..HistoryConfig::default() };
        let mut ring = ChecksumHistoryRing::with_config(&cfg).unwrap();
        let mut world = MockWorld::new();
        world.set_turn(GameTurn(start));
        let calls = depth + extra;
        for _ in 0..calls {
            ring.store_turn_checksums(&world);
            world.advance_turn();
        }
        let last = start + calls as u32 - 1;
        let first = last + 1 - depth as u32;
        prop_assert_eq!(ring.valid_count(), depth);
        prop_assert_eq!(ring.latest_turn(), Some(GameTurn(last)));
        for turn in first..=last {
            prop_assert!(ring.find(GameTurn(turn)).is_some());
        }
        prop_assert!(ring.find(GameTurn(first - 1)).is_none());
    }

    #[test]
    fn things_sum_is_sum_of_categories(seed in any::<u64>(), things in 0usize..120, steps in 1usize..10) {
        let mut world = random_world(seed, things);
        let mut ring = ChecksumHistoryRing::new();
        for _ in 0..steps {
            ring.store_turn_checksums(&world);
            world.step();
        }
        for snap in ring.iter_valid() {
            let parts = ThingCategory::ALL.map(|c| snap.category_sum(c));
            prop_assert_eq!(snap.things_sum, wrapping_sum(parts));
            prop_assert!(snap.is_consistent());
        }
    }

    #[test]
    fn empty_packets_never_take_a_slot(
        ops in prop::collection::vec((0u32..50, 0u8..4, prop::bool::ANY, arb_packet()), 1..200)
    ) {
        let mut ring = ReceivedPacketRing::new();
        for (turn, player, empty, packet) in ops {
            let before = ring.valid_count();
            let head = ring.head();
            if empty {
                ring.store_received_packet(GameTurn(turn), PlayerId(player), &Packet::default());
                prop_assert_eq!(ring.valid_count(), before);
                prop_assert_eq!(ring.head(), head);
            } else if !packet.is_empty() {
                prop_assert!(ring.store_received_packet(GameTurn(turn), PlayerId(player), &packet));
                prop_assert!(ring.valid_count() >= before);
            }
        }
    }
}
