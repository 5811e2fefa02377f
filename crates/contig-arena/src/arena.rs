//! The allocation context: allocate, look up, and release arrays.
//!
//! [`MdArena`] owns a [`CountingAlloc`] and a [`Registry`] of built grids.
//! Each call site that needs its own allocation scope constructs its own
//! arena; there is no process-wide state.
//!
//! Mutation goes through `&mut self`, so concurrent callers need external
//! mutual exclusion.

use contig_core::{AllocError, ElementType, Extents};

use crate::alloc::{CountingAlloc, RawAlloc, SystemAlloc};
use crate::config::ArenaConfig;
use crate::error::{ConfigError, ReleaseError};
use crate::flat::FlatBuffer;
use crate::grid::Grid;
use crate::handle::{Allocation, ArenaId, GridHandle};
use crate::index;
use crate::registry::Registry;
use crate::stats::AllocStats;

/// Allocator context for contiguous 1..=4 dimensional arrays.
///
/// Rank-1 arrays are returned to the caller as a [`FlatBuffer`]. Rank
/// 2..=4 arrays are built as a flat buffer plus an index structure,
/// registered, and identified by a [`GridHandle`]. Releasing through a
/// handle recovers the storage from the registry.
pub struct MdArena<A: RawAlloc = SystemAlloc> {
    alloc: CountingAlloc<A>,
    registry: Registry<Grid>,
    config: ArenaConfig,
}

impl MdArena<SystemAlloc> {
    /// Create an arena over the global allocator.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        Self::with_raw_alloc(config, SystemAlloc)
    }
}

impl Default for MdArena<SystemAlloc> {
    fn default() -> Self {
        let config = ArenaConfig::default();
        debug_assert_eq!(config.validate(), Ok(()));
        Self::from_parts(config, SystemAlloc)
    }
}

impl<A: RawAlloc> MdArena<A> {
    /// Create an arena over a caller-supplied raw allocator.
    pub fn with_raw_alloc(config: ArenaConfig, raw: A) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, raw))
    }

    /// Assemble an arena from an already validated config.
    fn from_parts(config: ArenaConfig, raw: A) -> Self {
        Self {
            alloc: CountingAlloc::new(raw),
            registry: Registry::new(config.registry_capacity),
            config,
        }
    }

    /// Identity stamped into every handle this arena issues.
    pub fn id(&self) -> ArenaId {
        self.registry.id()
    }

    // ── Allocation ──────────────────────────────────────────────────

    /// Allocate a zeroed array with 1..=4 extents.
    pub fn allocate(
        &mut self,
        extents: &[usize],
        element: ElementType,
    ) -> Result<Allocation, AllocError> {
        let extents = Extents::new(extents)?;
        if extents.rank() == 1 {
            let buffer = FlatBuffer::allocate(&mut self.alloc, &extents, element)?;
            log::debug!("allocated {extents} {element} linear array");
            Ok(Allocation::Linear(buffer))
        } else {
            self.allocate_grid(&extents, element).map(Allocation::Grid)
        }
    }

    /// Allocate using a raw numeric element tag.
    ///
    /// An unrecognised tag fails with [`AllocError::UnsupportedType`]
    /// before any memory is requested.
    pub fn allocate_tagged(
        &mut self,
        extents: &[usize],
        tag: u32,
    ) -> Result<Allocation, AllocError> {
        let element = ElementType::from_tag(tag)?;
        self.allocate(extents, element)
    }

    /// Allocate a rank-1 array. It never occupies a registry slot.
    pub fn alloc_1d(
        &mut self,
        size: usize,
        element: ElementType,
    ) -> Result<FlatBuffer, AllocError> {
        let extents = Extents::new(&[size])?;
        FlatBuffer::allocate(&mut self.alloc, &extents, element)
    }

    /// Allocate a rank-2 array.
    pub fn alloc_2d(
        &mut self,
        size_x: usize,
        size_y: usize,
        element: ElementType,
    ) -> Result<GridHandle, AllocError> {
        self.allocate_grid(&Extents::new(&[size_x, size_y])?, element)
    }

    /// Allocate a rank-3 array.
    pub fn alloc_3d(
        &mut self,
        size_x: usize,
        size_y: usize,
        size_z: usize,
        element: ElementType,
    ) -> Result<GridHandle, AllocError> {
        self.allocate_grid(&Extents::new(&[size_x, size_y, size_z])?, element)
    }

    /// Allocate a rank-4 array.
    pub fn alloc_4d(
        &mut self,
        size_x: usize,
        size_y: usize,
        size_z: usize,
        size_p: usize,
        element: ElementType,
    ) -> Result<GridHandle, AllocError> {
        self.allocate_grid(&Extents::new(&[size_x, size_y, size_z, size_p])?, element)
    }

    fn allocate_grid(
        &mut self,
        extents: &Extents,
        element: ElementType,
    ) -> Result<GridHandle, AllocError> {
        let capacity = self.registry.capacity();
        if !self.registry.has_capacity() {
            log::warn!(
                "registry full ({capacity} live arrays): increase registry_capacity to allocate more"
            );
            return Err(AllocError::RegistryFull { capacity });
        }

        let grid = index::build(&mut self.alloc, extents, element)?;
        match self.registry.register(grid) {
            Ok(handle) => {
                log::debug!("allocated {extents} {element} grid as {handle}");
                Ok(handle)
            }
            Err(grid) => {
                grid.release(&mut self.alloc);
                Err(AllocError::RegistryFull { capacity })
            }
        }
    }

    // ── Release ─────────────────────────────────────────────────────

    /// Release an array, declaring the extents it was allocated with.
    ///
    /// Rank-1 arrays are released directly; their declared extents are
    /// not consulted.
    pub fn release(
        &mut self,
        allocation: Allocation,
        extents: &[usize],
    ) -> Result<(), ReleaseError> {
        match allocation {
            Allocation::Linear(buffer) => {
                self.free_1d(Some(buffer));
                Ok(())
            }
            Allocation::Grid(handle) => self.release_grid(handle, extents),
        }
    }

    /// Release a rank-1 array. `None` is a no-op.
    pub fn free_1d(&mut self, buffer: Option<FlatBuffer>) {
        if let Some(buffer) = buffer {
            buffer.release(&mut self.alloc);
        }
    }

    /// Release a rank-2 array.
    pub fn free_2d(
        &mut self,
        handle: GridHandle,
        size_x: usize,
        size_y: usize,
    ) -> Result<(), ReleaseError> {
        self.release_grid(handle, &[size_x, size_y])
    }

    /// Release a rank-3 array.
    pub fn free_3d(
        &mut self,
        handle: GridHandle,
        size_x: usize,
        size_y: usize,
        size_z: usize,
    ) -> Result<(), ReleaseError> {
        self.release_grid(handle, &[size_x, size_y, size_z])
    }

    /// Release a rank-4 array.
    pub fn free_4d(
        &mut self,
        handle: GridHandle,
        size_x: usize,
        size_y: usize,
        size_z: usize,
        size_p: usize,
    ) -> Result<(), ReleaseError> {
        self.release_grid(handle, &[size_x, size_y, size_z, size_p])
    }

    /// Release every live grid. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let grids = self.registry.drain();
        let count = grids.len();
        for grid in grids {
            grid.release(&mut self.alloc);
        }
        count
    }

    fn release_grid(
        &mut self,
        handle: GridHandle,
        declared: &[usize],
    ) -> Result<(), ReleaseError> {
        let Some(grid) = self.registry.get(handle) else {
            log::warn!("release of {handle}: already released, unknown, or from another arena");
            return Err(ReleaseError::DoubleFreeOrUnknownHandle { handle });
        };
        if grid.rank() != declared.len() {
            return Err(ReleaseError::RankMismatch {
                expected: grid.rank(),
                actual: declared.len(),
            });
        }
        if grid.extents().as_slice() != declared {
            return Err(ReleaseError::ExtentMismatch {
                expected: grid.extents().clone(),
                actual: declared.to_vec(),
            });
        }

        let grid = self
            .registry
            .find_and_release(handle)
            .ok_or(ReleaseError::DoubleFreeOrUnknownHandle { handle })?;
        grid.release(&mut self.alloc);
        log::debug!("released {handle}");
        Ok(())
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// The grid behind a handle, if it is still live.
    pub fn grid(&self, handle: GridHandle) -> Option<&Grid> {
        self.registry.get(handle)
    }

    /// Mutable access to the grid behind a handle.
    pub fn grid_mut(&mut self, handle: GridHandle) -> Option<&mut Grid> {
        self.registry.get_mut(handle)
    }

    /// Whether the handle names a live grid.
    pub fn contains(&self, handle: GridHandle) -> bool {
        self.registry.contains(handle)
    }

    /// Iterate over live grids in slot order.
    pub fn grids(&self) -> impl Iterator<Item = (GridHandle, &Grid)> {
        self.registry.iter()
    }

    // ── Diagnostics ─────────────────────────────────────────────────

    /// Bytes ever requested, including failed requests.
    pub fn total_requested_bytes(&self) -> u64 {
        self.alloc.total_requested()
    }

    /// Snapshot of the arena's counters.
    pub fn stats(&self) -> AllocStats {
        AllocStats {
            total_requested_bytes: self.alloc.total_requested(),
            live_bytes: self.alloc.live_bytes(),
            live_blocks: self.alloc.live_blocks(),
            live_grids: self.registry.live_count(),
            total_grids: self.registry.total_registered(),
            registry_capacity: self.registry.capacity(),
        }
    }

    /// The configuration the arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The raw allocator underneath the counting layer.
    pub fn raw_alloc(&self) -> &A {
        self.alloc.raw()
    }

    /// Mutable access to the raw allocator.
    pub fn raw_alloc_mut(&mut self) -> &mut A {
        self.alloc.raw_mut()
    }
}
