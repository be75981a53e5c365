//! Persistent id allocation against an injected set of ids already in use.
//!
//! A random start point spreads ids over the whole `u32` range, so most
//! allocations succeed on the first probe. When the start is taken the
//! allocator walks linearly (forward or backward, picked at random) to the
//! nearest free value, then tries the other direction before giving up.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rtsopen_data::PersistentId;
use serde::{Deserialize, Serialize};

/// Ids currently in use.
///
/// Not synchronized: callers sharing one set across threads wrap it in a lock.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TrackedIds {
    ids: HashSet<u32>,
}

impl TrackedIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Marks `id` as used. Returns false if it already was.
    pub fn insert(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }

    /// Frees `id` for reuse. Returns false if it was not tracked.
    pub fn release(&mut self, id: PersistentId) -> bool {
        self.ids.remove(&id.get())
    }

    pub fn iter(&self) -> impl Iterator<Item = PersistentId> + '_ {
        self.ids.iter().copied().map(PersistentId::new)
    }
}

impl FromIterator<u32> for TrackedIds {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// First free id in `start..u32::MAX`. `u32::MAX` itself is never probed.
#[must_use]
pub fn forward_search(tracked: &TrackedIds, start: u32) -> Option<u32> {
    (start..u32::MAX).find(|&id| id != PersistentId::INVALID.get() && !tracked.contains(id))
}

/// First free id walking down from `start`, stopping before it would wrap.
#[must_use]
pub fn reverse_search(tracked: &TrackedIds, start: u32) -> Option<u32> {
    (1..=start).rev().find(|&id| !tracked.contains(id))
}

/// Allocates a fresh id, records it in `tracked` and returns it.
///
/// Returns [`PersistentId::INVALID`] when every id is taken.
pub fn generate_new_id<R: Rng>(tracked: &mut TrackedIds, rng: &mut R) -> PersistentId {
    if tracked.len() > u32::MAX as usize {
        tracing::warn!(tracked = tracked.len(), "persistent id space exhausted");
        return PersistentId::INVALID;
    }

    let start: u32 = rng.gen_range(0..=u32::MAX);
    let forward_first = rng.gen_bool(0.5);
    let found = if forward_first {
        forward_search(tracked, start).or_else(|| reverse_search(tracked, start))
    } else {
        reverse_search(tracked, start).or_else(|| forward_search(tracked, start))
    };

    match found {
        Some(id) => {
            tracked.insert(id);
            PersistentId::new(id)
        }
        None => {
            tracing::warn!(start, forward_first, "no free persistent id found");
            PersistentId::INVALID
        }
    }
}

/// Owns the random source used by [`generate_new_id`].
#[derive(Debug, Clone)]
pub struct PersistentIdAllocator<R = ChaCha8Rng> {
    rng: R,
}

impl PersistentIdAllocator<ChaCha8Rng> {
    /// Deterministic allocator, useful for replays and tests.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> PersistentIdAllocator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate_new_id(&mut self, tracked: &mut TrackedIds) -> PersistentId {
        generate_new_id(tracked, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousand_distinct_ids() {
        let mut tracked = TrackedIds::new();
        let mut allocator = PersistentIdAllocator::from_seed(7);
        let ids: HashSet<PersistentId> = (0..1000)
            .map(|_| allocator.generate_new_id(&mut tracked))
            .collect();
        assert_eq!(ids.len(), 1000);
        assert_eq!(tracked.len(), 1000);
        assert!(ids.iter().all(|id| id.is_valid() && tracked.contains(id.get())));
    }

    #[test]
    fn test_same_seed_same_ids() {
        let mut a = PersistentIdAllocator::from_seed(99);
        let mut b = PersistentIdAllocator::from_seed(99);
        let (mut ta, mut tb) = (TrackedIds::new(), TrackedIds::new());
        for _ in 0..32 {
            assert_eq!(a.generate_new_id(&mut ta), b.generate_new_id(&mut tb));
        }
    }

    #[test]
    fn test_forward_search_skips_used_and_zero() {
        let tracked: TrackedIds = [1, 2, 3].into_iter().collect();
        assert_eq!(forward_search(&tracked, 0), Some(4));
        assert_eq!(forward_search(&tracked, 10), Some(10));
        assert_eq!(forward_search(&tracked, u32::MAX), None);
    }

    #[test]
    fn test_reverse_search_stops_before_wrap() {
        let tracked: TrackedIds = [1, 2, 5].into_iter().collect();
        assert_eq!(reverse_search(&tracked, 5), Some(4));
        assert_eq!(reverse_search(&tracked, 2), None);
        assert_eq!(reverse_search(&tracked, 0), None);
        assert_eq!(reverse_search(&TrackedIds::new(), u32::MAX), Some(u32::MAX));
    }

    #[test]
    fn test_release_allows_reuse() {
        let mut tracked = TrackedIds::new();
        let id = PersistentIdAllocator::from_seed(1).generate_new_id(&mut tracked);
        assert!(tracked.release(id));
        assert!(!tracked.release(id));
        assert!(tracked.is_empty());
    }

    #[test]
    fn test_tracked_ids_serde() {
        let tracked: TrackedIds = [4, 8].into_iter().collect();
        let json = serde_json::to_string(&tracked).unwrap();
        let back: TrackedIds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tracked);
    }
}
