//! Index structure builder for rank 2..=4 arrays.
//!
//! An [`IndexNode`] tree caches the row-major byte offsets of every
//! last-axis row in a [`FlatBuffer`]. A rank-`n` array has `n - 1` index
//! levels: the leaves are [`IndexNode::Rows`] of byte offsets, everything
//! above is [`IndexNode::Levels`]. Each level is its own block from the
//! [`CountingAlloc`], separate from the flat buffer, and is released on its
//! own.
//!
//! ```text
//! rank 3, extents [x, y, z]
//! Levels(x) ─┬─ Rows(y) : base + (i*y*z + j*z) * width
//!            ├─ Rows(y)
//!            └─ ...
//! ```
//!
//! Building is all-or-nothing. If any nested level cannot be allocated,
//! every level built so far is released in reverse order, then the flat
//! buffer, then the outer level, and the error is returned.

use smallvec::SmallVec;

use contig_core::{AllocError, ElementType, Extents, MAX_RANK};

use crate::alloc::{CountingAlloc, RawAlloc};
use crate::flat::FlatBuffer;
use crate::grid::Grid;

/// One level of a precomputed row-major index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexNode {
    /// Byte offsets of last-axis rows within the flat buffer.
    Rows(Vec<usize>),
    /// One child level per entry along this axis.
    Levels(Vec<IndexNode>),
}

/// The null level: an unfilled slot in a freshly allocated outer level.
impl Default for IndexNode {
    fn default() -> Self {
        Self::Rows(Vec::new())
    }
}

impl IndexNode {
    /// Byte offset of the last-axis row selected by `prefix`.
    ///
    /// `prefix` must index every level exactly once (`rank - 1`
    /// coordinates). Returns `None` on a rank mismatch or an out-of-range
    /// coordinate.
    pub fn row_offset(&self, prefix: &[usize]) -> Option<usize> {
        match (self, prefix) {
            (Self::Rows(rows), [i]) => rows.get(*i).copied(),
            (Self::Levels(levels), [i, rest @ ..]) => levels.get(*i)?.row_offset(rest),
            _ => None,
        }
    }

    /// Number of separately allocated blocks in this subtree.
    pub fn block_count(&self) -> usize {
        match self {
            Self::Rows(_) => 1,
            Self::Levels(levels) => 1 + levels.iter().map(Self::block_count).sum::<usize>(),
        }
    }

    /// Release every block in this subtree, children before their parent.
    pub fn release<A: RawAlloc>(self, alloc: &mut CountingAlloc<A>) {
        match self {
            Self::Rows(rows) => alloc.release(rows),
            Self::Levels(mut levels) => {
                for child in levels.iter_mut() {
                    std::mem::take(child).release(alloc);
                }
                alloc.release(levels);
            }
        }
    }
}

/// Build a rank 2..=4 grid: outer level, flat buffer, then nested levels.
///
/// Registry admission is the caller's responsibility and must happen
/// before this is called.
pub fn build<A: RawAlloc>(
    alloc: &mut CountingAlloc<A>,
    extents: &Extents,
    element: ElementType,
) -> Result<Grid, AllocError> {
    let rank = extents.rank();
    if !(2..=MAX_RANK).contains(&rank) {
        return Err(AllocError::InvalidRank { rank });
    }
    // Rejects overflowing shapes before anything is allocated.
    extents.total_bytes(element.width())?;

    let dims = extents.as_slice();
    let byte_strides: SmallVec<[usize; MAX_RANK]> = extents
        .strides()
        .iter()
        .map(|&s| s.saturating_mul(element.width()))
        .collect();
    let index_dims = &dims[..rank - 1];
    let index_strides = &byte_strides[..rank - 1];

    if rank == 2 {
        let mut rows = alloc.allocate_zeroed::<usize>(dims[0])?;
        let flat = match FlatBuffer::allocate(alloc, extents, element) {
            Ok(flat) => flat,
            Err(err) => {
                alloc.release(rows);
                return Err(err);
            }
        };
        fill_rows(&mut rows, 0, index_strides[0]);
        return Ok(Grid::new(flat, IndexNode::Rows(rows), extents.clone()));
    }

    let mut levels = alloc.allocate_zeroed::<IndexNode>(dims[0])?;
    let flat = match FlatBuffer::allocate(alloc, extents, element) {
        Ok(flat) => flat,
        Err(err) => {
            alloc.release(levels);
            return Err(err);
        }
    };

    for i in 0..levels.len() {
        let base = i.saturating_mul(index_strides[0]);
        match build_level(alloc, &index_dims[1..], &index_strides[1..], base) {
            Ok(node) => levels[i] = node,
            Err(err) => {
                log::debug!("rolling back {extents} grid after failure at outer index {i}");
                release_built(alloc, &mut levels, i);
                flat.release(alloc);
                alloc.release(levels);
                return Err(err);
            }
        }
    }

    Ok(Grid::new(flat, IndexNode::Levels(levels), extents.clone()))
}

/// Build one nested level covering `dims` (at least one axis).
fn build_level<A: RawAlloc>(
    alloc: &mut CountingAlloc<A>,
    dims: &[usize],
    strides: &[usize],
    base: usize,
) -> Result<IndexNode, AllocError> {
    if dims.len() == 1 {
        let mut rows = alloc.allocate_zeroed::<usize>(dims[0])?;
        fill_rows(&mut rows, base, strides[0]);
        return Ok(IndexNode::Rows(rows));
    }

    let mut levels = alloc.allocate_zeroed::<IndexNode>(dims[0])?;
    for j in 0..levels.len() {
        let child_base = base.saturating_add(j.saturating_mul(strides[0]));
        match build_level(alloc, &dims[1..], &strides[1..], child_base) {
            Ok(node) => levels[j] = node,
            Err(err) => {
                release_built(alloc, &mut levels, j);
                alloc.release(levels);
                return Err(err);
            }
        }
    }
    Ok(IndexNode::Levels(levels))
}

/// Release the first `built` children of `levels`, last one first.
fn release_built<A: RawAlloc>(
    alloc: &mut CountingAlloc<A>,
    levels: &mut [IndexNode],
    built: usize,
) {
    for slot in levels[..built].iter_mut().rev() {
        std::mem::take(slot).release(alloc);
    }
}

fn fill_rows(rows: &mut [usize], base: usize, stride: usize) {
    for (i, slot) in rows.iter_mut().enumerate() {
        *slot = base.saturating_add(i.saturating_mul(stride));
    }
}
