//! A single direct-mapped way: a flat array of slots, each holding a status
//! bit-set and the tag of the block presently resident there.

use bitflags::bitflags;

use crate::bitgeom::WayGeometry;

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const VALID     = 0b0001;
        const MODIFIED  = 0b0010;
        const SHARED    = 0b0100;
        const EXCLUSIVE = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    status: StatusFlags,
    stored_tag: u64,
}

pub struct RawWay {
    slots: Vec<Slot>,
    geometry: WayGeometry,
}

impl RawWay {
    pub fn new(slots_per_way: usize, block_size: u64) -> Self {
        let geometry = WayGeometry::new(block_size, slots_per_way as u64);
        RawWay {
            slots: vec![Slot::default(); slots_per_way],
            geometry,
        }
    }

    pub fn set_index(&self, addr: u64) -> usize {
        self.geometry.set_index(addr)
    }

    pub fn hit(&self, addr: u64) -> bool {
        let slot = &self.slots[self.geometry.set_index(addr)];
        slot.status.contains(StatusFlags::VALID) && slot.stored_tag == self.geometry.stored_tag(addr)
    }

    /// Store `addr`'s block into the slot its set index maps to. Matches
    /// the source's `insert`: it does not check whether the slot already
    /// holds a valid block with tag 0 before overwriting it, so a resident
    /// all-zero tag can in principle be clobbered without a writeback
    /// being recorded by the caller. Callers are expected to have already
    /// evicted whatever occupied the slot.
    pub fn insert(&mut self, addr: u64) {
        let idx = self.geometry.set_index(addr);
        let slot = &mut self.slots[idx];
        slot.status = StatusFlags::VALID;
        slot.stored_tag = self.geometry.stored_tag(addr);
    }

    pub fn invalidate(&mut self, addr: u64) {
        let idx = self.geometry.set_index(addr);
        let slot = &mut self.slots[idx];
        slot.status = StatusFlags::empty();
        slot.stored_tag = 0;
    }

    pub fn set_bits(&mut self, addr: u64, bits: StatusFlags) {
        let idx = self.geometry.set_index(addr);
        self.slots[idx].status |= bits;
    }

    pub fn status(&self, addr: u64) -> StatusFlags {
        self.slots[self.geometry.set_index(addr)].status
    }

    pub fn must_writeback(&self, addr: u64) -> bool {
        let status = self.status(addr);
        status.contains(StatusFlags::VALID) && status.contains(StatusFlags::MODIFIED)
    }

    pub fn representative_address(&self, slot_idx: usize) -> u64 {
        self.geometry
            .representative_address(slot_idx, self.slots[slot_idx].stored_tag)
    }

    /// A slot with `VALID` set but a zero stored tag is indistinguishable
    /// from a slot that legitimately holds the block at address 0; this
    /// check flags it as a potential corruption anyway, mirroring the
    /// limitation in `insert`.
    pub fn integrity_check(&self) -> bool {
        self.slots
            .iter()
            .all(|s| !(s.status.contains(StatusFlags::VALID) && s.stored_tag == 0))
    }
}
