//! Error kinds for array allocation.
//!
//! Every allocation entry point reports failure through [`AllocError`].
//! None of these are retried internally; retry policy belongs to the caller.

use std::error::Error;
use std::fmt;

/// Errors that can occur while allocating an array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// A raw element tag did not name a supported type.
    ///
    /// Raised before any memory is requested.
    UnsupportedType {
        /// The unrecognised tag.
        tag: u32,
    },
    /// The number of extents was zero or greater than [`MAX_RANK`](crate::MAX_RANK).
    InvalidRank {
        /// The rejected rank.
        rank: usize,
    },
    /// The product of the extents (or the byte size derived from it)
    /// does not fit in `usize`.
    SizeOverflow,
    /// The underlying allocator could not satisfy a request.
    ///
    /// Any partially built index structure has already been released.
    AllocationFailed {
        /// Bytes requested by the failing call.
        requested: usize,
        /// Running total of bytes requested by this allocator, including
        /// the failing request.
        total_requested: u64,
    },
    /// The registry already holds `capacity` live multidimensional arrays.
    ///
    /// Raised before any memory is requested.
    RegistryFull {
        /// Configured registry capacity.
        capacity: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { tag } => write!(f, "element type tag {tag} not supported"),
            Self::InvalidRank { rank } => {
                write!(
                    f,
                    "rank {rank} not supported: expected 1..={}",
                    crate::MAX_RANK
                )
            }
            Self::SizeOverflow => write!(f, "array size overflows usize"),
            Self::AllocationFailed {
                requested,
                total_requested,
            } => {
                write!(
                    f,
                    "could not allocate {requested} bytes: total allocated memory {} kbytes",
                    total_requested / 1000
                )
            }
            Self::RegistryFull { capacity } => {
                write!(
                    f,
                    "registry full: {capacity} live arrays, increase registry_capacity"
                )
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_reports_kbytes() {
        let err = AllocError::AllocationFailed {
            requested: 64,
            total_requested: 12_345,
        };
        assert_eq!(
            err.to_string(),
            "could not allocate 64 bytes: total allocated memory 12 kbytes"
        );
    }

    #[test]
    fn registry_full_names_capacity() {
        let err = AllocError::RegistryFull { capacity: 150 };
        assert!(err.to_string().contains("150"));
    }
}
