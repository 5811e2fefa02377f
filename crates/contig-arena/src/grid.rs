//! Built multidimensional arrays and element access.
//!
//! A [`Grid`] is what a registry slot owns for a rank 2..=4 array: the
//! flat buffer, the index structure over it, and the extents it was built
//! with. Callers reach it through [`MdArena::grid`](crate::MdArena::grid)
//! and [`MdArena::grid_mut`](crate::MdArena::grid_mut).

use contig_core::{Element, ElementType, Extents};

use crate::alloc::{CountingAlloc, RawAlloc};
use crate::error::AccessError;
use crate::flat::FlatBuffer;
use crate::index::IndexNode;

/// A rank 2..=4 array: flat buffer plus precomputed index.
#[derive(Debug)]
pub struct Grid {
    flat: FlatBuffer,
    index: IndexNode,
    extents: Extents,
}

impl Grid {
    pub(crate) fn new(flat: FlatBuffer, index: IndexNode, extents: Extents) -> Self {
        Self {
            flat,
            index,
            extents,
        }
    }

    /// Extents the grid was allocated with.
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.extents.rank()
    }

    /// Element type.
    pub fn element(&self) -> ElementType {
        self.flat.element()
    }

    /// The backing buffer.
    pub fn flat(&self) -> &FlatBuffer {
        &self.flat
    }

    /// The index structure.
    pub fn index(&self) -> &IndexNode {
        &self.index
    }

    /// All elements as raw row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.flat.as_bytes()
    }

    /// Byte offset of `index` within the flat buffer, resolved through the
    /// index structure.
    pub fn byte_offset(&self, index: &[usize]) -> Result<usize, AccessError> {
        self.check_index(index)?;
        let (&last, prefix) = index
            .split_last()
            .ok_or(AccessError::RankMismatch {
                expected: self.rank(),
                actual: 0,
            })?;
        let row = self
            .index
            .row_offset(prefix)
            .ok_or(AccessError::OutOfBounds)?;
        Ok(row + last * self.element().width())
    }

    /// Read the element at `index`.
    pub fn get<T: Element>(&self, index: &[usize]) -> Result<T, AccessError> {
        self.check_type::<T>()?;
        let offset = self.byte_offset(index)?;
        self.flat.read_at(offset).ok_or(AccessError::OutOfBounds)
    }

    /// Write the element at `index`.
    pub fn set<T: Element>(&mut self, index: &[usize], value: T) -> Result<(), AccessError> {
        self.check_type::<T>()?;
        let offset = self.byte_offset(index)?;
        if self.flat.write_at(offset, value) {
            Ok(())
        } else {
            Err(AccessError::OutOfBounds)
        }
    }

    /// Bytes of the sub-block selected by a leading `prefix` of coordinates.
    ///
    /// A prefix of `rank - 1` coordinates yields one last-axis row; shorter
    /// prefixes yield a whole plane or volume. Mirrors subscripting a nested
    /// index with `[i]`, `[i][j]` or `[i][j][k]`.
    pub fn block(&self, prefix: &[usize]) -> Result<&[u8], AccessError> {
        let range = self.block_range(prefix)?;
        Ok(&self.flat.as_bytes()[range])
    }

    /// Mutable bytes of the sub-block selected by `prefix`.
    pub fn block_mut(&mut self, prefix: &[usize]) -> Result<&mut [u8], AccessError> {
        let range = self.block_range(prefix)?;
        Ok(&mut self.flat.as_bytes_mut()[range])
    }

    /// Release the flat buffer, then every index level.
    pub(crate) fn release<A: RawAlloc>(self, alloc: &mut CountingAlloc<A>) {
        self.flat.release(alloc);
        self.index.release(alloc);
    }

    fn block_range(&self, prefix: &[usize]) -> Result<std::ops::Range<usize>, AccessError> {
        let rank = self.rank();
        if prefix.is_empty() || prefix.len() >= rank {
            return Err(AccessError::RankMismatch {
                expected: rank - 1,
                actual: prefix.len(),
            });
        }
        let dims = self.extents.as_slice();
        if prefix.iter().zip(dims).any(|(&i, &e)| i >= e) {
            return Err(AccessError::OutOfBounds);
        }
        let tail = &dims[prefix.len()..];
        let len = tail.iter().product::<usize>() * self.element().width();
        if len == 0 {
            // Nothing to index into; an empty block sits at the start.
            return Ok(0..0);
        }
        // The first row of the block starts the block.
        let mut row = prefix.to_vec();
        row.resize(rank - 1, 0);
        let start = self
            .index
            .row_offset(&row)
            .ok_or(AccessError::OutOfBounds)?;
        Ok(start..start + len)
    }

    fn check_index(&self, index: &[usize]) -> Result<(), AccessError> {
        if index.len() != self.rank() {
            return Err(AccessError::RankMismatch {
                expected: self.rank(),
                actual: index.len(),
            });
        }
        if !self.extents.contains(index) {
            return Err(AccessError::OutOfBounds);
        }
        Ok(())
    }

    fn check_type<T: Element>(&self) -> Result<(), AccessError> {
        if T::TYPE != self.element() {
            return Err(AccessError::TypeMismatch {
                expected: self.element(),
                actual: T::TYPE,
            });
        }
        Ok(())
    }
}
