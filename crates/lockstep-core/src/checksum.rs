//! Checksum type and the polynomial fold used for rooms, players and things.
//!
//! Every field is folded as `checksum = checksum * 31 + field` with
//! wrapping 32-bit arithmetic. The multiplier and the field order are part
//! of the wire contract: peers running different fold orders will report
//! every room and player as mismatched.

/// A 32-bit checksum. All arithmetic on checksums wraps.
pub type Checksum = u32;

/// Multiplier of the polynomial fold.
pub const CHECKSUM_MULTIPLIER: Checksum = 31;

/// Fold one field into a running checksum.
#[inline]
pub fn checksum_add(checksum: Checksum, value: u32) -> Checksum {
    checksum
        .wrapping_mul(CHECKSUM_MULTIPLIER)
        .wrapping_add(value)
}

/// Builder over [`checksum_add`] for folding a fixed sequence of fields.
///
/// Signed fields are converted with `as u32`, which sign-extends, so a
/// field holding `-1` folds as `0xffff_ffff`.
///
/// # Examples
///
/// ```
/// use lockstep_core::checksum::{checksum_add, ChecksumFold};
///
/// let folded = ChecksumFold::new().add(3).add(4).finish();
/// assert_eq!(folded, checksum_add(checksum_add(0, 3), 4));
/// assert_eq!(folded, 3 * 31 + 4);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChecksumFold(Checksum);

impl ChecksumFold {
    /// Start a fold from zero.
    pub fn new() -> Self {
        Self(0)
    }

    /// Fold in one field.
    #[must_use]
    pub fn add(self, value: u32) -> Self {
        Self(checksum_add(self.0, value))
    }

    /// The folded checksum.
    pub fn finish(self) -> Checksum {
        self.0
    }
}

/// Wrapping sum of a sequence of checksums.
pub fn wrapping_sum<I: IntoIterator<Item = Checksum>>(values: I) -> Checksum {
    values
        .into_iter()
        .fold(0, |acc: Checksum, v| acc.wrapping_add(v))
}
