use std::collections::HashSet;

use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rtsopen_core::persistent_id::{
    forward_search, generate_new_id, reverse_search, PersistentIdAllocator, TrackedIds,
};
use rtsopen_data::PersistentId;

#[test]
fn test_thousand_ids_are_unique_and_tracked() {
    let mut tracked = TrackedIds::new();
    let mut allocator = PersistentIdAllocator::from_seed(2024);

    let ids: Vec<PersistentId> = (0..1000)
        .map(|_| allocator.generate_new_id(&mut tracked))
        .collect();
    let unique: HashSet<_> = ids.iter().copied().collect();

    assert_eq!(unique.len(), 1000);
    assert_eq!(tracked.len(), 1000);
    assert!(ids.iter().all(|id| id.is_valid()));
}

#[test]
fn test_existing_ids_are_never_reissued() {
    let mut tracked: TrackedIds = (1..=500).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..200 {
        let id = generate_new_id(&mut tracked, &mut rng);
        assert!(id.get() > 500);
    }
    assert_eq!(tracked.len(), 700);
}

#[test]
fn test_scans_walk_to_nearest_free_value() {
    let tracked: TrackedIds = (100..=110).collect();
    assert_eq!(forward_search(&tracked, 100), Some(111));
    assert_eq!(reverse_search(&tracked, 110), Some(99));
}

#[test]
fn test_scans_never_yield_sentinel() {
    let tracked = TrackedIds::new();
    assert_eq!(forward_search(&tracked, 0), Some(1));
    assert_eq!(reverse_search(&tracked, 0), None);
}

#[test]
fn test_upper_range_exhausted_falls_back() {
    let top = u32::MAX - 5;
    let tracked: TrackedIds = (top..=u32::MAX).collect();
    assert_eq!(forward_search(&tracked, top), None);
    assert_eq!(reverse_search(&tracked, u32::MAX), Some(top - 1));
}

#[test]
fn test_released_ids_leave_the_set() {
    let mut tracked = TrackedIds::new();
    let mut allocator = PersistentIdAllocator::from_seed(5);
    let first = allocator.generate_new_id(&mut tracked);
    let second = allocator.generate_new_id(&mut tracked);

    assert!(tracked.release(first));
    assert!(!tracked.contains(first.get()));
    assert!(tracked.contains(second.get()));
    assert_eq!(tracked.iter().collect::<Vec<_>>(), vec![second]);
}

// StepRng with a zero step yields the same u64 for every draw: its low 32 bits
// pick the start id and its top bit picks the direction (clear = forward).
fn fixed_draw(start: u32, forward_first: bool) -> StepRng {
    let direction = if forward_first { 0 } else { 1u64 << 63 };
    StepRng::new(direction | u64::from(start), 0)
}

#[test]
fn test_forward_exhausted_retries_reverse() {
    let start = u32::MAX - 2;
    let mut tracked: TrackedIds = [start, start + 1].into_iter().collect();
    let id = generate_new_id(&mut tracked, &mut fixed_draw(start, true));
    assert_eq!(id, PersistentId::new(start - 1));
    assert!(tracked.contains(start - 1));
}

#[test]
fn test_reverse_exhausted_retries_forward() {
    let mut tracked: TrackedIds = (1..=5).collect();
    let id = generate_new_id(&mut tracked, &mut fixed_draw(5, false));
    assert_eq!(id, PersistentId::new(6));
    assert_eq!(tracked.len(), 6);
}

#[test]
fn test_controlled_draw_takes_first_direction() {
    let mut tracked = TrackedIds::new();
    assert_eq!(
        generate_new_id(&mut tracked, &mut fixed_draw(42, true)),
        PersistentId::new(42)
    );
    // 42 is taken now; reverse goes down, forward would go up
    assert_eq!(
        generate_new_id(&mut tracked, &mut fixed_draw(42, false)),
        PersistentId::new(41)
    );
    assert_eq!(
        generate_new_id(&mut tracked, &mut fixed_draw(42, true)),
        PersistentId::new(43)
    );
}

#[test]
fn test_zero_start_reverse_first_skips_invalid() {
    let mut tracked = TrackedIds::new();
    // reverse from 0 finds nothing, the forward retry skips the sentinel
    let id = generate_new_id(&mut tracked, &mut fixed_draw(0, false));
    assert_eq!(id, PersistentId::new(1));
}
