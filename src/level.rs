//! A single level of the hierarchy: a set of ways plus the timing and
//! geometry parameters that describe it. The memory layer is modeled as
//! a degenerate level with zero ways, which collapses every lookup to a
//! miss without a special case in the reference protocol.

use rand::RngCore;

use crate::bitgeom::{is_pow2, mask_for};
use crate::way::{RawWay, StatusFlags};
use crate::stats::StatsBundle;

pub struct AssociativeLevel {
    ways: Vec<RawWay>,
    pub associativity: u64,
    pub block_size: u64,
    pub hit_time: u64,
    pub lookup_overhead: u64,
    pub split: bool,
    assoc_mask: u64,
    pub stats: StatsBundle,
}

impl AssociativeLevel {
    pub fn new(
        total_blocks: u64,
        block_size: u64,
        hit_time: u64,
        lookup_overhead: u64,
        associativity: u64,
        split: bool,
    ) -> Self {
        debug_assert!(is_pow2(associativity));
        debug_assert_eq!(total_blocks % associativity, 0);
        let slots_per_way = (total_blocks / associativity) as usize;
        debug!(
            "level: {} blocks, {}-byte blocks, {}-way, {} slots/way, hit {} lookup {}",
            total_blocks, block_size, associativity, slots_per_way, hit_time, lookup_overhead
        );
        let ways = (0..associativity)
            .map(|_| RawWay::new(slots_per_way, block_size))
            .collect();
        AssociativeLevel {
            ways,
            associativity,
            block_size,
            hit_time,
            lookup_overhead,
            split,
            assoc_mask: mask_for(associativity),
            stats: StatsBundle::default(),
        }
    }

    pub fn new_memory(hit_time: u64) -> Self {
        AssociativeLevel {
            ways: Vec::new(),
            associativity: 0,
            block_size: 0,
            hit_time,
            lookup_overhead: 0,
            split: false,
            assoc_mask: 0,
            stats: StatsBundle::default(),
        }
    }

    pub fn is_memory(&self) -> bool {
        self.associativity == 0
    }

    pub fn set_index(&self, addr: u64) -> usize {
        self.ways[0].set_index(addr)
    }

    /// Index of the way holding `addr`, or `self.ways.len()` (an
    /// out-of-range sentinel, never a valid way index) on a miss.
    pub fn find_way_with(&self, addr: u64) -> usize {
        self.ways.iter().position(|w| w.hit(addr)).unwrap_or(self.ways.len())
    }

    pub fn find_empty_way(&self, addr: u64) -> usize {
        self.ways
            .iter()
            .position(|w| !w.status(addr).contains(StatusFlags::VALID))
            .unwrap_or(self.ways.len())
    }

    pub fn find_victim_way(&self, rng: &mut impl RngCore) -> usize {
        debug_assert!(!self.ways.is_empty());
        let victim = (rng.next_u64() & self.assoc_mask) as usize;
        trace!("victim way {} chosen out of {}", victim, self.ways.len());
        victim
    }

    /// Marks the block containing `addr` dirty if it is resident. A no-op
    /// at the memory layer, and a no-op if the block isn't cached here —
    /// both match the source's `dowrite`.
    pub fn write_in_level(&mut self, addr: u64) {
        if let Some(way) = self.ways.iter_mut().find(|w| w.hit(addr)) {
            way.set_bits(addr, StatusFlags::MODIFIED);
        }
    }

    pub fn way(&self, idx: usize) -> &RawWay {
        &self.ways[idx]
    }

    pub fn way_mut(&mut self, idx: usize) -> &mut RawWay {
        &mut self.ways[idx]
    }

    pub fn integrity_check(&self) -> bool {
        self.ways.iter().all(|w| w.integrity_check())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn memory_layer_always_misses() {
        let mem = AssociativeLevel::new_memory(100);
        assert!(mem.is_memory());
        assert_eq!(mem.find_way_with(0x1000), 0);
        assert_eq!(mem.find_empty_way(0x1000), 0);
    }

    #[test]
    fn direct_mapped_level_round_trips() {
        let mut level = AssociativeLevel::new(512, 32, 1, 1, 1, false);
        assert_eq!(level.find_way_with(0x40), 1); // miss sentinel == associativity
        level.way_mut(0).insert(0x40);
        assert_eq!(level.find_way_with(0x40), 0);
    }

    #[test]
    fn victim_selection_stays_within_associativity() {
        let level = AssociativeLevel::new(512, 32, 1, 1, 4, false);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(level.find_victim_way(&mut rng) < 4);
        }
    }
}
