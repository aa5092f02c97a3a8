//! Per-level accounting. One counter block per reference kind, each with
//! its own hit/miss counts and cost accumulators — unlike the source's
//! `Stats`, which overloads the same fields as either counts or costs
//! depending on which helper was called.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Fetch,
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KindCounters {
    pub hit_count: u64,
    pub miss_count: u64,
    pub replace_count: u64,
    pub inclusion_count: u64,
    pub hit_cost: u64,
    pub miss_cost: u64,
}

impl KindCounters {
    pub fn total_time(&self) -> u64 {
        self.hit_cost + self.miss_cost
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsBundle {
    pub fetch: KindCounters,
    pub read: KindCounters,
    pub write: KindCounters,
}

impl StatsBundle {
    pub fn kind(&self, k: ReferenceKind) -> &KindCounters {
        match k {
            ReferenceKind::Fetch => &self.fetch,
            ReferenceKind::Read => &self.read,
            ReferenceKind::Write => &self.write,
        }
    }

    pub fn kind_mut(&mut self, k: ReferenceKind) -> &mut KindCounters {
        match k {
            ReferenceKind::Fetch => &mut self.fetch,
            ReferenceKind::Read => &mut self.read,
            ReferenceKind::Write => &mut self.write,
        }
    }

    pub fn hit_count(&self) -> u64 {
        self.fetch.hit_count + self.read.hit_count + self.write.hit_count
    }

    pub fn miss_count(&self) -> u64 {
        self.fetch.miss_count + self.read.miss_count + self.write.miss_count
    }

    pub fn inclusion_count(&self) -> u64 {
        self.fetch.inclusion_count + self.read.inclusion_count + self.write.inclusion_count
    }

    pub fn hit_cost(&self) -> u64 {
        self.fetch.hit_cost + self.read.hit_cost + self.write.hit_cost
    }

    pub fn miss_cost(&self) -> u64 {
        self.fetch.miss_cost + self.read.miss_cost + self.write.miss_cost
    }
}
