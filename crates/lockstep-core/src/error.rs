//! Error types for thing-list traversal.

use std::error::Error;
use std::fmt;

use crate::id::ThingIndex;
use crate::thing::ThingCategory;

/// A thing list could not be walked to its end.
///
/// Traversals stop at the first error and keep whatever they had
/// accumulated; the error is reported next to the partial result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalError {
    /// A `next_of_class` link pointed at an invalid thing.
    InvalidThing {
        /// List being walked.
        category: ThingCategory,
        /// The bad link.
        index: ThingIndex,
    },
    /// More things were visited than the thing table can hold, so the
    /// list must contain a cycle.
    CycleSuspected {
        /// List being walked.
        category: ThingCategory,
        /// Visit cap that was exceeded.
        cap: usize,
    },
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThing { category, index } => {
                write!(f, "jump to invalid thing {index} detected in {category} list")
            }
            Self::CycleSuspected { category, cap } => {
                write!(
                    f,
                    "infinite loop detected in {category} list (more than {cap} things)"
                )
            }
        }
    }
}

impl Error for TraversalError {}
