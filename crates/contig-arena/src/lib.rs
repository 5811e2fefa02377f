//! Registry-backed allocation of contiguous multidimensional arrays.
//!
//! Every array of rank 1..=4 lives in one contiguous, zero-initialised
//! [`FlatBuffer`]. Rank 2..=4 arrays also get a precomputed index
//! structure of row offsets and a registry slot, so the whole allocation
//! can be found and released from a [`GridHandle`] alone.
//!
//! # Architecture
//!
//! ```text
//! MdArena (allocation context)
//! ├── CountingAlloc<A: RawAlloc>   running byte total, live blocks
//! │   └── RawAlloc                 SystemAlloc, or a test double
//! └── Registry<Grid>               slot + generation, bounded capacity
//!     └── Grid
//!         ├── FlatBuffer           row-major bytes
//!         └── IndexNode            rank - 1 levels of row offsets
//! ```
//!
//! # Failure model
//!
//! Allocation is all-or-nothing: registry admission is checked before any
//! memory is requested, and a failed nested allocation releases every
//! level built so far. Releasing an unknown, already released, or foreign
//! handle is reported as [`ReleaseError::DoubleFreeOrUnknownHandle`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod arena;
pub mod config;
pub mod error;
pub mod flat;
pub mod grid;
pub mod handle;
pub mod index;
pub mod registry;
pub mod stats;

// Public re-exports for the primary API surface.
pub use alloc::{CountingAlloc, RawAlloc, SystemAlloc};
pub use arena::MdArena;
pub use config::ArenaConfig;
pub use error::{AccessError, ConfigError, ReleaseError};
pub use flat::FlatBuffer;
pub use grid::Grid;
pub use handle::{Allocation, ArenaId, GridHandle};
pub use index::IndexNode;
pub use registry::Registry;
pub use stats::AllocStats;
