//! Allocation diagnostics.
//!
//! [`AllocStats`] is a point-in-time snapshot of an arena's counters,
//! intended for external logging and tests. Nothing in the arena makes
//! admission decisions from it.

/// Counters describing an [`MdArena`](crate::MdArena).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Bytes ever requested from the raw allocator, including failed
    /// requests. Never decreases.
    pub total_requested_bytes: u64,
    /// Bytes currently allocated (flat buffers and index levels).
    pub live_bytes: usize,
    /// Blocks currently allocated.
    pub live_blocks: usize,
    /// Registered rank 2..=4 arrays currently live.
    pub live_grids: usize,
    /// Registered arrays ever created. Never decreases.
    pub total_grids: u64,
    /// Configured registry capacity.
    pub registry_capacity: usize,
}

impl AllocStats {
    /// Free registry slots.
    pub fn registry_headroom(&self) -> usize {
        self.registry_capacity.saturating_sub(self.live_grids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let s = AllocStats::default();
        assert_eq!(s.total_requested_bytes, 0);
        assert_eq!(s.live_blocks, 0);
        assert_eq!(s.registry_headroom(), 0);
    }

    #[test]
    fn headroom_is_capacity_minus_live() {
        let s = AllocStats {
            live_grids: 3,
            registry_capacity: 10,
            ..AllocStats::default()
        };
        assert_eq!(s.registry_headroom(), 7);
    }
}
