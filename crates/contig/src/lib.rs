//! Contig: contiguous row-major arrays of rank 1 to 4.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the contig sub-crates. For most users, adding `contig` as a single
//! dependency is sufficient.
//!
//! Every array's elements live in one zero-initialised buffer, in
//! row-major order. Arrays of rank 2 and up also carry a precomputed index
//! of row offsets and are tracked in a bounded registry, so they can be
//! released from a handle alone.
//!
//! # Quick start
//!
//! ```rust
//! use contig::prelude::*;
//!
//! let mut arena = MdArena::new(ArenaConfig::default()).unwrap();
//!
//! // A 3×4 array of 32-bit ints.
//! let h = arena.alloc_2d(3, 4, ElementType::Int).unwrap();
//! let grid = arena.grid_mut(h).unwrap();
//! grid.set(&[2, 1], 7i32).unwrap();
//! assert_eq!(grid.byte_offset(&[2, 1]), Ok(36));
//! assert_eq!(grid.get::<i32>(&[2, 1]), Ok(7));
//!
//! // Release declares the extents the array was built with.
//! arena.free_2d(h, 3, 4).unwrap();
//! assert_eq!(arena.stats().live_bytes, 0);
//!
//! // Rank-1 arrays are owned directly and never take a registry slot.
//! let line = arena.alloc_1d(16, ElementType::Double).unwrap();
//! assert_eq!(line.byte_len(), 128);
//! arena.free_1d(Some(line));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `contig-core` | Element types, extents, allocation errors |
//! | [`arena`] | `contig-arena` | Allocator, index builder, registry, `MdArena` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Element types, extents, and row-major arithmetic (`contig-core`).
pub use contig_core as types;

/// Allocation context, index structure, and registry (`contig-arena`).
///
/// Most users only need [`arena::MdArena`] and [`arena::Grid`] from this
/// module; they are also available in the [`prelude`].
pub use contig_arena as arena;

/// Common imports for typical contig usage.
///
/// ```rust
/// use contig::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use contig_core::{Element, ElementType, Extents};

    // Errors
    pub use contig_arena::{AccessError, ConfigError, ReleaseError};
    pub use contig_core::AllocError;

    // Arena
    pub use contig_arena::{
        Allocation, AllocStats, ArenaConfig, ArenaId, FlatBuffer, Grid, GridHandle, MdArena,
    };
}
