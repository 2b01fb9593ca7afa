//! Error types for the resync payload codec.

use std::fmt;
use std::io;

/// Errors that can occur while encoding or decoding a diagnostics payload.
#[derive(Debug)]
pub enum PayloadError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The block does not start with the expected `b"DSYN"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the block.
        found: u8,
    },
    /// The sender's ring depth differs from ours.
    DepthMismatch {
        /// Depth this peer was configured with.
        expected: usize,
        /// Depth in the block header.
        found: u32,
    },
    /// A boolean byte held something other than 0 or 1.
    InvalidFlag {
        /// Slot the byte belongs to, or `None` for the header.
        slot: Option<usize>,
        /// The byte found.
        value: u8,
    },
    /// The block is shorter than its header says.
    Truncated {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        found: usize,
    },
    /// Bytes remain after the last slot.
    TrailingBytes {
        /// Number of unexpected bytes.
        extra: usize,
    },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"DSYN\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported payload version {found}")
            }
            Self::DepthMismatch { expected, found } => {
                write!(f, "history depth mismatch: expected {expected}, found {found}")
            }
            Self::InvalidFlag {
                slot: Some(slot),
                value,
            } => write!(f, "invalid valid flag {value} in slot {slot}"),
            Self::InvalidFlag { slot: None, value } => {
                write!(f, "invalid diagnostics flag {value} in header")
            }
            Self::Truncated { expected, found } => {
                write!(f, "payload truncated: need {expected} bytes, have {found}")
            }
            Self::TrailingBytes { extra } => {
                write!(f, "{extra} trailing bytes after payload")
            }
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PayloadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
