//! Counting allocator over a raw zero-initialising primitive.
//!
//! [`RawAlloc`] is the seam to the underlying memory source. Production
//! code uses [`SystemAlloc`]; tests substitute a failure-injecting
//! implementation. [`CountingAlloc`] wraps a `RawAlloc`, keeps the running
//! total of bytes ever requested, and tracks how many bytes and blocks are
//! currently outstanding.

use contig_core::AllocError;

/// Underlying allocation primitive.
///
/// Every block handed out is initialised to `T::default()`, which is the
/// all-zero value for the numeric types and an empty (null) level for
/// index-structure slots.
pub trait RawAlloc {
    /// Allocate `count` slots of `T`, each set to `T::default()`.
    ///
    /// Returns `None` if memory is exhausted. Must not panic or abort on
    /// exhaustion.
    fn try_alloc_zeroed<T: Default + Clone>(&mut self, count: usize) -> Option<Vec<T>>;

    /// Give a block back.
    ///
    /// The default implementation simply drops it.
    fn release<T>(&mut self, block: Vec<T>) {
        drop(block);
    }
}

/// [`RawAlloc`] backed by the global allocator.
///
/// Uses `Vec::try_reserve_exact`, so exhaustion surfaces as `None`
/// instead of aborting the process.
///
/// The block is then filled element by element, so zeroing costs one
/// pass over the buffer. A calloc-style zeroed allocation would skip
/// that pass, but there is no fallible zeroed allocation in safe Rust.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAlloc;

impl RawAlloc for SystemAlloc {
    fn try_alloc_zeroed<T: Default + Clone>(&mut self, count: usize) -> Option<Vec<T>> {
        let mut block = Vec::new();
        block.try_reserve_exact(count).ok()?;
        block.resize(count, T::default());
        Some(block)
    }
}

/// Wraps a [`RawAlloc`] and accounts for every request.
///
/// `total_requested` only ever grows and includes requests that failed.
/// It is a diagnostic, never used for admission control.
#[derive(Debug)]
pub struct CountingAlloc<A> {
    raw: A,
    total_requested: u64,
    live_bytes: usize,
    live_blocks: usize,
}

impl<A: RawAlloc> CountingAlloc<A> {
    /// Wrap a raw allocator with all counters at zero.
    pub fn new(raw: A) -> Self {
        Self {
            raw,
            total_requested: 0,
            live_bytes: 0,
            live_blocks: 0,
        }
    }

    /// Allocate `count` zeroed slots of `T`.
    ///
    /// The request is added to the running total before the allocation is
    /// attempted. On failure the shortage is logged together with the
    /// running total and [`AllocError::AllocationFailed`] is returned.
    pub fn allocate_zeroed<T: Default + Clone>(
        &mut self,
        count: usize,
    ) -> Result<Vec<T>, AllocError> {
        let requested = count
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(AllocError::SizeOverflow)?;
        self.total_requested = self.total_requested.saturating_add(requested as u64);
        log::trace!("allocating {count} x {} bytes", std::mem::size_of::<T>());

        match self.raw.try_alloc_zeroed::<T>(count) {
            Some(block) => {
                self.live_bytes += requested;
                self.live_blocks += 1;
                Ok(block)
            }
            None => {
                log::error!(
                    "could not allocate enough memory: total allocated memory {} kbytes",
                    self.total_requested / 1000
                );
                Err(AllocError::AllocationFailed {
                    requested,
                    total_requested: self.total_requested,
                })
            }
        }
    }

    /// Return a block previously obtained from [`allocate_zeroed`](Self::allocate_zeroed).
    pub fn release<T>(&mut self, block: Vec<T>) {
        let bytes = block.len() * std::mem::size_of::<T>();
        self.live_bytes = self.live_bytes.saturating_sub(bytes);
        self.live_blocks = self.live_blocks.saturating_sub(1);
        self.raw.release(block);
    }

    /// Bytes ever requested, including failed requests.
    pub fn total_requested(&self) -> u64 {
        self.total_requested
    }

    /// Bytes currently allocated and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Blocks currently allocated and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.live_blocks
    }

    /// The wrapped raw allocator.
    pub fn raw(&self) -> &A {
        &self.raw
    }

    /// Mutable access to the wrapped raw allocator.
    pub fn raw_mut(&mut self) -> &mut A {
        &mut self.raw
    }
}

impl<A: RawAlloc + Default> Default for CountingAlloc<A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Refuses every request.
    struct Exhausted;

    impl RawAlloc for Exhausted {
        fn try_alloc_zeroed<T: Default + Clone>(&mut self, _count: usize) -> Option<Vec<T>> {
            None
        }
    }

    #[test]
    fn system_alloc_returns_zeroed_block() {
        let mut alloc = CountingAlloc::new(SystemAlloc);
        let block: Vec<u8> = alloc.allocate_zeroed(64).unwrap();
        assert_eq!(block.len(), 64);
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn counters_track_requests_and_releases() {
        let mut alloc = CountingAlloc::new(SystemAlloc);
        let a: Vec<u32> = alloc.allocate_zeroed(10).unwrap();
        let b: Vec<u8> = alloc.allocate_zeroed(6).unwrap();
        assert_eq!(alloc.total_requested(), 46);
        assert_eq!(alloc.live_bytes(), 46);
        assert_eq!(alloc.live_blocks(), 2);

        alloc.release(a);
        assert_eq!(alloc.live_bytes(), 6);
        assert_eq!(alloc.live_blocks(), 1);
        alloc.release(b);
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.live_blocks(), 0);
        // The running total never goes down.
        assert_eq!(alloc.total_requested(), 46);
    }

    #[test]
    fn failed_request_still_counts_toward_total() {
        let mut alloc = CountingAlloc::new(Exhausted);
        let err = alloc.allocate_zeroed::<u64>(125).unwrap_err();
        assert_eq!(
            err,
            AllocError::AllocationFailed {
                requested: 1000,
                total_requested: 1000,
            }
        );
        assert_eq!(alloc.live_blocks(), 0);
    }

    #[test]
    fn zero_count_is_a_valid_empty_block() {
        let mut alloc = CountingAlloc::new(SystemAlloc);
        let block: Vec<f64> = alloc.allocate_zeroed(0).unwrap();
        assert!(block.is_empty());
        assert_eq!(alloc.live_blocks(), 1);
        alloc.release(block);
        assert_eq!(alloc.live_blocks(), 0);
    }

    #[test]
    fn byte_overflow_is_reported() {
        let mut alloc = CountingAlloc::new(SystemAlloc);
        let err = alloc.allocate_zeroed::<u64>(usize::MAX).unwrap_err();
        assert_eq!(err, AllocError::SizeOverflow);
        assert_eq!(alloc.total_requested(), 0);
    }

    #[test]
    fn huge_request_fails_without_aborting() {
        let mut alloc = CountingAlloc::new(SystemAlloc);
        let result = alloc.allocate_zeroed::<u8>(isize::MAX as usize);
        assert!(matches!(result, Err(AllocError::AllocationFailed { .. })));
    }
}
