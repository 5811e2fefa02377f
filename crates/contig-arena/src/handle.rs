//! Handles for registered multidimensional arrays.
//!
//! A [`GridHandle`] names the arena that issued it, a registry slot, and
//! the generation that slot had when the array was registered. Releasing
//! the array bumps the slot's generation, so a second release through the
//! same handle, a release after the slot was reused, or a release through
//! another arena is detected instead of touching someone else's memory.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::flat::FlatBuffer;

/// Counter for unique [`ArenaId`] allocation.
static ARENA_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a registry.
///
/// Allocated from a monotonic atomic counter via [`ArenaId::next`]. Two
/// arenas never share an id, so their handles never alias even when slot
/// and generation coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique id. Thread-safe.
    pub fn next() -> Self {
        Self(ARENA_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a rank 2..=4 array inside an [`MdArena`](crate::MdArena).
///
/// Handles are plain `Copy` values. Holding one does not keep the array
/// alive; it only lets the issuing arena find it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct GridHandle {
    pub(crate) arena: ArenaId,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl GridHandle {
    pub(crate) fn new(arena: ArenaId, slot: u32, generation: u32) -> Self {
        Self {
            arena,
            slot,
            generation,
        }
    }

    /// Id of the arena that issued the handle.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// Registry slot index.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for GridHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GridHandle(arena={}, slot={}, gen={})",
            self.arena, self.slot, self.generation
        )
    }
}

/// Result of a rank-generic allocation.
///
/// Rank-1 arrays are self-contained and owned by the caller; deeper
/// arrays live in the registry and are reached through a handle.
#[derive(Debug)]
#[must_use]
pub enum Allocation {
    /// A rank-1 array.
    Linear(FlatBuffer),
    /// A registered rank 2..=4 array.
    Grid(GridHandle),
}

impl Allocation {
    /// The grid handle, if this is a registered array.
    pub fn handle(&self) -> Option<GridHandle> {
        match self {
            Self::Linear(_) => None,
            Self::Grid(h) => Some(*h),
        }
    }

    /// The flat buffer, if this is a rank-1 array.
    pub fn into_linear(self) -> Option<FlatBuffer> {
        match self {
            Self::Linear(buf) => Some(buf),
            Self::Grid(_) => None,
        }
    }
}
