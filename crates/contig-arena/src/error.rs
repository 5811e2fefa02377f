//! Arena-specific error types.
//!
//! Allocation failures use [`contig_core::AllocError`]; this module covers
//! release, element access, and configuration.

use std::error::Error;
use std::fmt;

use contig_core::{ElementType, Extents};

use crate::handle::GridHandle;

/// Errors that can occur while releasing an array.
///
/// On any of these, nothing is released and the arena is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseError {
    /// The handle was already released, or never came from this arena.
    DoubleFreeOrUnknownHandle {
        /// The offending handle.
        handle: GridHandle,
    },
    /// The declared rank differs from the rank the array was built with.
    RankMismatch {
        /// Rank recorded at allocation.
        expected: usize,
        /// Rank passed to the release call.
        actual: usize,
    },
    /// The declared extents differ from the extents the array was built with.
    ExtentMismatch {
        /// Extents recorded at allocation.
        expected: Extents,
        /// Extents passed to the release call.
        actual: Vec<usize>,
    },
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleFreeOrUnknownHandle { handle } => {
                write!(f, "{handle} already released or unknown")
            }
            Self::RankMismatch { expected, actual } => {
                write!(
                    f,
                    "release declared rank {actual}, array has rank {expected}"
                )
            }
            Self::ExtentMismatch { expected, actual } => {
                write!(
                    f,
                    "release declared extents {actual:?}, array has extents {expected}"
                )
            }
        }
    }
}

impl Error for ReleaseError {}

/// Errors from typed element access on a [`Grid`](crate::Grid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The requested Rust type does not match the array's element type.
    TypeMismatch {
        /// Element type of the array.
        expected: ElementType,
        /// Element type of the requested Rust type.
        actual: ElementType,
    },
    /// Wrong number of coordinates.
    RankMismatch {
        /// Number of coordinates the call needs.
        expected: usize,
        /// Number of coordinates given.
        actual: usize,
    },
    /// A coordinate lies outside its extent.
    OutOfBounds,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, actual } => {
                write!(f, "element type is {expected}, requested {actual}")
            }
            Self::RankMismatch { expected, actual } => {
                write!(f, "expected {expected} coordinates, got {actual}")
            }
            Self::OutOfBounds => write!(f, "index out of bounds"),
        }
    }
}

impl Error for AccessError {}

/// Errors detected by [`ArenaConfig::validate`](crate::ArenaConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Registry capacity is zero.
    ZeroCapacity,
    /// Registry capacity does not fit a `u32` slot index.
    CapacityTooLarge {
        /// The configured capacity.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "registry capacity must be positive"),
            Self::CapacityTooLarge { capacity } => {
                write!(f, "registry capacity {capacity} exceeds u32::MAX slots")
            }
        }
    }
}

impl Error for ConfigError {}
