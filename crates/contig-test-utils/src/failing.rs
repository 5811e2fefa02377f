//! A raw allocator that fails on demand.

use contig_arena::{RawAlloc, SystemAlloc};

/// Wraps [`SystemAlloc`] and fails a chosen allocation call.
///
/// Calls are numbered from 0 in the order the arena makes them. Every
/// successful allocation and every release is counted, so a test can
/// check that a rolled-back build gave back everything it took.
#[derive(Debug, Default)]
pub struct FailingAlloc {
    fail_at: Option<usize>,
    calls: usize,
    allocated: usize,
    released: usize,
}

impl FailingAlloc {
    /// Never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`-th allocation call (0-based) and only that one.
    pub fn fail_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::default()
        }
    }

    /// Re-arm: fail the `n`-th call counted from now.
    pub fn arm(&mut self, n: usize) {
        self.fail_at = Some(self.calls + n);
    }

    /// Stop injecting failures.
    pub fn disarm(&mut self) {
        self.fail_at = None;
    }

    /// Allocation calls made so far, including the failed one.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Successful allocations so far.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Releases so far.
    pub fn released(&self) -> usize {
        self.released
    }

    /// Successful allocations not yet released.
    pub fn outstanding(&self) -> usize {
        self.allocated - self.released
    }
}

impl RawAlloc for FailingAlloc {
    fn try_alloc_zeroed<T: Default + Clone>(&mut self, count: usize) -> Option<Vec<T>> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_at == Some(call) {
            return None;
        }
        let block = SystemAlloc.try_alloc_zeroed(count)?;
        self.allocated += 1;
        Some(block)
    }

    fn release<T>(&mut self, block: Vec<T>) {
        self.released += 1;
        drop(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fails_only_the_chosen_call() {
        let mut alloc = FailingAlloc::fail_at(1);
        assert!(alloc.try_alloc_zeroed::<u8>(4).is_some());
        assert!(alloc.try_alloc_zeroed::<u8>(4).is_none());
        assert!(alloc.try_alloc_zeroed::<u8>(4).is_some());
        assert_eq!(alloc.calls(), 3);
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn arm_counts_from_now() {
        let mut alloc = FailingAlloc::new();
        let a: Vec<u8> = alloc.try_alloc_zeroed(1).unwrap();
        alloc.arm(0);
        assert!(alloc.try_alloc_zeroed::<u8>(1).is_none());
        alloc.release(a);
        assert_eq!(alloc.outstanding(), 0);
    }
}
