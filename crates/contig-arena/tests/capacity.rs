//! Integration test: registry capacity enforcement and slot reclamation.

use contig_arena::{ArenaConfig, MdArena, ReleaseError};
use contig_core::{AllocError, ElementType};

const CAPACITY: usize = 3;

fn arena() -> MdArena {
    MdArena::new(ArenaConfig::new(CAPACITY)).unwrap()
}

#[test]
fn full_registry_rejects_before_allocating() {
    let mut arena = arena();
    for _ in 0..CAPACITY {
        arena.alloc_2d(4, 4, ElementType::Int).unwrap();
    }
    let before = arena.stats();

    for result in [
        arena.alloc_2d(1, 1, ElementType::Int),
        arena.alloc_3d(1, 1, 1, ElementType::Int),
        arena.alloc_4d(1, 1, 1, 1, ElementType::Int),
    ] {
        assert_eq!(result, Err(AllocError::RegistryFull { capacity: CAPACITY }));
    }
    // No memory was requested by any rejected call.
    assert_eq!(arena.stats(), before);
}

#[test]
fn rank_1_ignores_registry_capacity() {
    let mut arena = arena();
    for _ in 0..CAPACITY {
        arena.alloc_2d(1, 1, ElementType::Char).unwrap();
    }
    let buffer = arena.alloc_1d(16, ElementType::Char).unwrap();
    assert_eq!(buffer.len(), 16);
    arena.free_1d(Some(buffer));
}

#[test]
fn freed_slots_are_reclaimed() {
    let mut arena = arena();
    // Far more allocations than capacity, never more than one live.
    for _ in 0..(CAPACITY * 50) {
        let h = arena.alloc_3d(2, 2, 2, ElementType::Float).unwrap();
        arena.free_3d(h, 2, 2, 2).unwrap();
    }
    let stats = arena.stats();
    assert_eq!(stats.live_grids, 0);
    assert_eq!(stats.total_grids, (CAPACITY * 50) as u64);
}

#[test]
fn release_makes_room_for_one_more() {
    let mut arena = arena();
    let handles: Vec<_> = (0..CAPACITY)
        .map(|_| arena.alloc_2d(2, 2, ElementType::Int).unwrap())
        .collect();
    assert!(arena.alloc_2d(2, 2, ElementType::Int).is_err());

    arena.free_2d(handles[1], 2, 2).unwrap();
    let reused = arena.alloc_2d(2, 2, ElementType::Int).unwrap();
    assert_eq!(reused.slot(), handles[1].slot());
    assert_ne!(reused.generation(), handles[1].generation());

    // The stale handle cannot release the new occupant.
    assert_eq!(
        arena.free_2d(handles[1], 2, 2),
        Err(ReleaseError::DoubleFreeOrUnknownHandle { handle: handles[1] })
    );
    assert!(arena.contains(reused));
}
