//! Fixed-size binary encoding of [`DesyncDiagnosticsPayload`].
//!
//! All integers are little-endian and booleans are a single `0`/`1`
//! byte. Layout:
//!
//! ```text
//! header  magic "DSYN" | version u8 | has_desync_diagnostics u8 | depth u32
//! slot    turn u32 | valid u8 | turn_checksum | things | rooms | players
//!         | 8 category sums | action, ai, player seeds | player checksums
//! ```
//!
//! There are no length prefixes: the encoded size depends only on the
//! ring depth, see [`encoded_len`].

use std::io::{Read, Write};

use lockstep_core::{GameTurn, ThingCategory, PLAYERS_COUNT};
use lockstep_history::ChecksumSnapshot;

use crate::error::PayloadError;
use crate::payload::DesyncDiagnosticsPayload;

/// Magic bytes at the start of every encoded payload.
pub const MAGIC: [u8; 4] = *b"DSYN";

/// Current payload format version.
pub const FORMAT_VERSION: u8 = 1;

/// Encoded size of the header.
pub const HEADER_LEN: usize = 4 + 1 + 1 + 4;

/// Encoded size of one [`ChecksumSnapshot`].
pub const SLOT_LEN: usize = 4 + 1 + 4 * (4 + ThingCategory::COUNT + 3 + PLAYERS_COUNT);

/// Encoded size of a payload carrying `depth` slots.
pub fn encoded_len(depth: usize) -> usize {
    HEADER_LEN + depth * SLOT_LEN
}

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), PayloadError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), PayloadError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, PayloadError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, PayloadError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_flag(r: &mut dyn Read, slot: Option<usize>) -> Result<bool, PayloadError> {
    match read_u8(r)? {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(PayloadError::InvalidFlag { slot, value }),
    }
}

// ── Slots ───────────────────────────────────────────────────────

/// Encode one snapshot.
pub fn encode_snapshot(w: &mut dyn Write, snap: &ChecksumSnapshot) -> Result<(), PayloadError> {
    write_u32_le(w, snap.turn.0)?;
    write_u8(w, u8::from(snap.valid))?;
    write_u32_le(w, snap.turn_checksum)?;
    write_u32_le(w, snap.things_sum)?;
    write_u32_le(w, snap.rooms_sum)?;
    write_u32_le(w, snap.players_sum)?;
    for sum in snap.category_sums() {
        write_u32_le(w, sum)?;
    }
    write_u32_le(w, snap.action_random_seed)?;
    write_u32_le(w, snap.ai_random_seed)?;
    write_u32_le(w, snap.player_random_seed)?;
    for checksum in snap.player_checksums {
        write_u32_le(w, checksum)?;
    }
    Ok(())
}

/// Decode one snapshot. `slot` is only used in error reports.
pub fn decode_snapshot(r: &mut dyn Read, slot: usize) -> Result<ChecksumSnapshot, PayloadError> {
    let mut snap = ChecksumSnapshot::EMPTY;
    snap.turn = GameTurn(read_u32_le(r)?);
    snap.valid = read_flag(r, Some(slot))?;
    snap.turn_checksum = read_u32_le(r)?;
    snap.things_sum = read_u32_le(r)?;
    snap.rooms_sum = read_u32_le(r)?;
    snap.players_sum = read_u32_le(r)?;
    for category in ThingCategory::ALL {
        *snap.category_sum_mut(category) = read_u32_le(r)?;
    }
    snap.action_random_seed = read_u32_le(r)?;
    snap.ai_random_seed = read_u32_le(r)?;
    snap.player_random_seed = read_u32_le(r)?;
    for checksum in snap.player_checksums.iter_mut() {
        *checksum = read_u32_le(r)?;
    }
    Ok(snap)
}

// ── Payload ─────────────────────────────────────────────────────

/// Encode a payload: header, then every slot in storage order.
pub fn encode_payload(
    w: &mut dyn Write,
    payload: &DesyncDiagnosticsPayload,
) -> Result<(), PayloadError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u8(w, u8::from(payload.has_desync_diagnostics))?;
    write_u32_le(w, payload.host_history.len() as u32)?;
    for snap in &payload.host_history {
        encode_snapshot(w, snap)?;
    }
    Ok(())
}

/// Decode a payload from a stream, requiring `expected_depth` slots.
///
/// Reads exactly [`encoded_len`]`(expected_depth)` bytes on success.
pub fn decode_payload(
    r: &mut dyn Read,
    expected_depth: usize,
) -> Result<DesyncDiagnosticsPayload, PayloadError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(PayloadError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(PayloadError::UnsupportedVersion { found: version });
    }
    let has_desync_diagnostics = read_flag(r, None)?;
    let depth = read_u32_le(r)?;
    if depth as usize != expected_depth {
        return Err(PayloadError::DepthMismatch {
            expected: expected_depth,
            found: depth,
        });
    }
    let host_history = (0..expected_depth)
        .map(|slot| decode_snapshot(r, slot))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DesyncDiagnosticsPayload {
        host_history,
        has_desync_diagnostics,
    })
}

/// Encode a payload into a new buffer of exactly [`encoded_len`] bytes.
pub fn payload_to_bytes(payload: &DesyncDiagnosticsPayload) -> Result<Vec<u8>, PayloadError> {
    let mut buf = Vec::with_capacity(encoded_len(payload.host_history.len()));
    encode_payload(&mut buf, payload)?;
    Ok(buf)
}

/// Decode a payload that must fill `bytes` exactly.
///
/// Rejects short and over-long blocks before decoding any slot, so a
/// mismatched block is never partially applied.
pub fn payload_from_bytes(
    bytes: &[u8],
    expected_depth: usize,
) -> Result<DesyncDiagnosticsPayload, PayloadError> {
    let expected = encoded_len(expected_depth);
    if bytes.len() < HEADER_LEN {
        return Err(PayloadError::Truncated {
            expected,
            found: bytes.len(),
        });
    }
    let mut header = &bytes[..HEADER_LEN];
    let mut magic = [0u8; 4];
    header.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(PayloadError::InvalidMagic);
    }
    if bytes.len() < expected {
        return Err(PayloadError::Truncated {
            expected,
            found: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(PayloadError::TrailingBytes {
            extra: bytes.len() - expected,
        });
    }
    let mut reader = bytes;
    decode_payload(&mut reader, expected_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_history::ChecksumHistoryRing;
    use lockstep_test_utils::fixtures::random_world;
    use proptest::prelude::*;

    fn packed(turns: usize) -> DesyncDiagnosticsPayload {
        let mut world = random_world(11, 30);
        let mut ring = ChecksumHistoryRing::new();
        for _ in 0..turns {
            ring.store_turn_checksums(&world);
            world.step();
        }
        DesyncDiagnosticsPayload::pack(&ring)
    }

    #[test]
    fn slot_len_matches_layout() {
        assert_eq!(SLOT_LEN, 101);
        let mut buf = Vec::new();
        encode_snapshot(&mut buf, &ChecksumSnapshot::EMPTY).unwrap();
        assert_eq!(buf.len(), SLOT_LEN);
    }

    #[test]
    fn encoded_len_depends_only_on_depth() {
        let a = payload_to_bytes(&packed(3)).unwrap();
        let b = payload_to_bytes(&packed(55)).unwrap();
        assert_eq!(a.len(), encoded_len(40));
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn round_trip_preserves_every_slot() {
        let payload = packed(47);
        let bytes = payload_to_bytes(&payload).unwrap();
        let decoded = payload_from_bytes(&bytes, 40).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn stream_decode_stops_at_payload_end() {
        let payload = packed(4);
        let mut bytes = payload_to_bytes(&payload).unwrap();
        bytes.extend_from_slice(b"next message");
        let mut reader = bytes.as_slice();
        let decoded = decode_payload(&mut reader, 40).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(reader, b"next message");
    }

    #[test]
    fn wrong_magic_rejected() {
        let mut bytes = payload_to_bytes(&packed(1)).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            payload_from_bytes(&bytes, 40),
            Err(PayloadError::InvalidMagic)
        ));
    }

    #[test]
    fn future_version_rejected() {
        let mut bytes = payload_to_bytes(&packed(1)).unwrap();
        bytes[4] = FORMAT_VERSION + 1;
        assert!(matches!(
            payload_from_bytes(&bytes, 40),
            Err(PayloadError::UnsupportedVersion { found }) if found == FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn depth_mismatch_rejected() {
        let bytes = payload_to_bytes(&packed(1)).unwrap();
        let mut reader = bytes.as_slice();
        assert!(matches!(
            decode_payload(&mut reader, 39),
            Err(PayloadError::DepthMismatch {
                expected: 39,
                found: 40
            })
        ));
    }

    #[test]
    fn truncated_and_trailing_rejected() {
        let bytes = payload_to_bytes(&packed(2)).unwrap();
        let short = &bytes[..bytes.len() - 1];
        assert!(matches!(
            payload_from_bytes(short, 40),
            Err(PayloadError::Truncated { .. })
        ));
        assert!(matches!(
            payload_from_bytes(&bytes[..3], 40),
            Err(PayloadError::Truncated { found: 3, .. })
        ));
        let mut long = bytes.clone();
        long.push(0);
        assert!(matches!(
            payload_from_bytes(&long, 40),
            Err(PayloadError::TrailingBytes { extra: 1 })
        ));
    }

    #[test]
    fn bad_valid_flag_rejected() {
        let mut bytes = payload_to_bytes(&packed(1)).unwrap();
        bytes[HEADER_LEN + SLOT_LEN + 4] = 7;
        assert!(matches!(
            payload_from_bytes(&bytes, 40),
            Err(PayloadError::InvalidFlag {
                slot: Some(1),
                value: 7
            })
        ));
    }

    proptest! {
        #[test]
        fn arbitrary_slots_round_trip(
            turns in prop::collection::vec(any::<u32>(), 1..40),
            sums in prop::collection::vec(any::<u32>(), 1..40),
            flag in any::<bool>(),
        ) {
            let mut ring = ChecksumHistoryRing::new();
            for (i, turn) in turns.iter().enumerate() {
                let mut snap = ChecksumSnapshot { turn: GameTurn(*turn), ..ChecksumSnapshot::EMPTY };
                let v = sums[i % sums.len()];
                snap.doors_sum = v;
                snap.player_checksums[i % PLAYERS_COUNT] = v.rotate_left(7);
                snap.ai_random_seed = !v;
                ring.push(snap);
            }
            let mut payload = DesyncDiagnosticsPayload::pack(&ring);
            payload.has_desync_diagnostics = flag;
            let bytes = payload_to_bytes(&payload).unwrap();
            prop_assert_eq!(bytes.len(), encoded_len(ring.depth()));
            let decoded = payload_from_bytes(&bytes, ring.depth()).unwrap();
            prop_assert_eq!(decoded, payload);
        }
    }
}
