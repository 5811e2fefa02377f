//! Contiguous zero-initialised backing buffers.
//!
//! A [`FlatBuffer`] holds every element of one array in row-major order.
//! Rank-1 arrays hand the buffer straight to the caller; deeper arrays keep
//! it inside their registry entry and expose it through the index structure.

use contig_core::{AllocError, Element, ElementType, Extents};

use crate::alloc::{CountingAlloc, RawAlloc};

/// One contiguous, zero-initialised region of `len × width` bytes.
///
/// Storage is a byte vector, so element access goes through unaligned
/// reads and writes; the element type is checked on every typed access.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct FlatBuffer {
    element: ElementType,
    len: usize,
    bytes: Vec<u8>,
}

impl FlatBuffer {
    /// Allocate a zeroed buffer holding the product of `extents` elements.
    ///
    /// A zero extent is legal and yields an empty buffer. The buffer is
    /// not registered anywhere; registering it is the caller's job once
    /// the surrounding structure is complete.
    pub fn allocate<A: RawAlloc>(
        alloc: &mut CountingAlloc<A>,
        extents: &Extents,
        element: ElementType,
    ) -> Result<Self, AllocError> {
        let len = extents.total_elements()?;
        let byte_len = extents.total_bytes(element.width())?;
        let bytes = alloc.allocate_zeroed::<u8>(byte_len)?;
        Ok(Self {
            element,
            len,
            bytes,
        })
    }

    /// Give the storage back to the allocator it came from.
    pub fn release<A: RawAlloc>(self, alloc: &mut CountingAlloc<A>) {
        alloc.release(self.bytes);
    }

    /// Element type of the buffer.
    pub fn element(&self) -> ElementType {
        self.element
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Raw bytes of the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable raw bytes of the buffer.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Read element `index`.
    ///
    /// Returns `None` if `T` does not match the element type or the index
    /// is out of range.
    pub fn get<T: Element>(&self, index: usize) -> Option<T> {
        let width = self.element.width();
        let start = index.checked_mul(width)?;
        self.read_at(start)
    }

    /// Write element `index`, returning whether the write happened.
    pub fn set<T: Element>(&mut self, index: usize, value: T) -> bool {
        let width = self.element.width();
        match index.checked_mul(width) {
            Some(start) => self.write_at(start, value),
            None => false,
        }
    }

    /// Read a `T` at a byte offset, checking the element type and bounds.
    pub(crate) fn read_at<T: Element>(&self, byte_offset: usize) -> Option<T> {
        if T::TYPE != self.element {
            return None;
        }
        let end = byte_offset.checked_add(std::mem::size_of::<T>())?;
        let bytes = self.bytes.get(byte_offset..end)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    /// Write a `T` at a byte offset, checking the element type and bounds.
    pub(crate) fn write_at<T: Element>(&mut self, byte_offset: usize, value: T) -> bool {
        if T::TYPE != self.element {
            return false;
        }
        let Some(end) = byte_offset.checked_add(std::mem::size_of::<T>()) else {
            return false;
        };
        match self.bytes.get_mut(byte_offset..end) {
            Some(dst) => {
                dst.copy_from_slice(bytemuck::bytes_of(&value));
                true
            }
            None => false,
        }
    }
}
