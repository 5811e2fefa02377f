//! Integration test: all-or-nothing grid construction under injected
//! allocation failures.
//!
//! The arena requests blocks in a fixed order: outer index level, flat
//! buffer, then each nested level depth-first. Failing every call position
//! in turn must leave no block outstanding and no registry entry behind.

use contig_arena::{ArenaConfig, MdArena};
use contig_core::{AllocError, ElementType};
use contig_test_utils::FailingAlloc;

fn arena_failing_at(n: usize) -> MdArena<FailingAlloc> {
    MdArena::with_raw_alloc(ArenaConfig::new(8), FailingAlloc::fail_at(n)).unwrap()
}

/// Allocation calls made by a successful build of these extents.
fn calls_for(extents: &[usize]) -> usize {
    let mut arena = MdArena::with_raw_alloc(ArenaConfig::new(8), FailingAlloc::new()).unwrap();
    let _allocation = arena.allocate(extents, ElementType::Int).unwrap();
    arena.raw_alloc().calls()
}

fn assert_fully_rolled_back(arena: &MdArena<FailingAlloc>) {
    let stats = arena.stats();
    assert_eq!(stats.live_grids, 0, "no registry entry may survive");
    assert_eq!(stats.live_blocks, 0, "every block must be released");
    assert_eq!(stats.live_bytes, 0);
    assert_eq!(arena.raw_alloc().outstanding(), 0);
}

#[test]
fn rank_3_call_count_is_outer_flat_and_one_per_row() {
    // outer + flat + 4 second-level
    assert_eq!(calls_for(&[4, 3, 2]), 6);
}

#[test]
fn rank_3_second_level_failure_releases_earlier_levels() {
    // Fail the second-level allocation for outer index 2.
    let mut arena = arena_failing_at(2 + 2);
    let err = arena.alloc_3d(4, 3, 2, ElementType::Double).unwrap_err();
    assert!(matches!(err, AllocError::AllocationFailed { .. }));

    let raw = arena.raw_alloc();
    // outer, flat, levels 0 and 1 were allocated; all four came back.
    assert_eq!(raw.allocated(), 4);
    assert_eq!(raw.released(), 4);
    assert_fully_rolled_back(&arena);
}

#[test]
fn rank_3_every_failure_point_rolls_back() {
    let extents = [4, 3, 2];
    let total = calls_for(&extents);
    for n in 0..total {
        let mut arena = arena_failing_at(n);
        let result = arena.allocate(&extents, ElementType::Float);
        assert!(
            matches!(result, Err(AllocError::AllocationFailed { .. })),
            "call {n} should fail the build"
        );
        assert_fully_rolled_back(&arena);
    }
}

#[test]
fn rank_4_every_failure_point_rolls_back() {
    let extents = [3, 2, 4, 5];
    let total = calls_for(&extents);
    // outer + flat + 3 * (second level + 2 third levels)
    assert_eq!(total, 2 + 3 * (1 + 2));
    for n in 0..total {
        let mut arena = arena_failing_at(n);
        let result = arena.allocate(&extents, ElementType::Long);
        assert!(
            matches!(result, Err(AllocError::AllocationFailed { .. })),
            "call {n} should fail the build"
        );
        assert_fully_rolled_back(&arena);
    }
}

#[test]
fn rank_2_flat_failure_releases_outer_level() {
    let mut arena = arena_failing_at(1);
    let err = arena.alloc_2d(5, 5, ElementType::Int).unwrap_err();
    assert!(matches!(err, AllocError::AllocationFailed { .. }));
    assert_fully_rolled_back(&arena);
}

#[test]
fn failed_requests_still_count_toward_total() {
    let mut arena = arena_failing_at(1);
    let err = arena.alloc_2d(10, 10, ElementType::Double).unwrap_err();
    // The flat buffer request (800 bytes) failed after the outer level.
    match err {
        AllocError::AllocationFailed {
            requested,
            total_requested,
        } => {
            assert_eq!(requested, 800);
            assert_eq!(total_requested, arena.total_requested_bytes());
            assert!(total_requested > 800);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn arena_recovers_after_failure() {
    let mut arena = arena_failing_at(3);
    assert!(arena.alloc_3d(2, 2, 2, ElementType::Int).is_err());
    let h = arena.alloc_3d(2, 2, 2, ElementType::Int).unwrap();
    assert_eq!(arena.stats().live_grids, 1);
    arena.free_3d(h, 2, 2, 2).unwrap();
    assert_fully_rolled_back(&arena);
}
