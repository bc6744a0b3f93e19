//! Error types for lrucache

use std::fmt;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller violated a precondition (non-positive capacity, zero shards, ...)
    InvalidArgument(String),

    /// The cost function reported a negative cost for an entry
    NegativeCost(i64),

    /// Adding an entry's cost would overflow the size total
    SizeOverflow {
        /// Running size total before the entry was added
        size: i64,
        /// Cost of the entry being added
        cost: i64,
    },

    /// Size accounting no longer matches the stored entries
    InternalInconsistency {
        /// Running size total at the time of detection
        size: i64,
        /// Number of entries held at the time of detection
        entries: usize,
    },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::NegativeCost(cost) => write!(f, "Negative cost: {}", cost),
            Error::SizeOverflow { size, cost } => {
                write!(f, "Size overflow: cost {} on top of size {}", cost, size)
            }
            Error::InternalInconsistency { size, entries } => write!(
                f,
                "Cost function is reporting inconsistent results: size={} with {} entries",
                size, entries
            ),
        }
    }
}

impl std::error::Error for Error {}
