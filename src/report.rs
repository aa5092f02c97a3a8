//! Renders the per-process statistics table, matching the source's
//! `reportstats` layout (including its "workoad" header, kept verbatim).

use std::fmt::Write as _;

use crate::hierarchy::Hierarchy;

fn level_label(row: usize, split: bool) -> (u32, &'static str) {
    match (split, row) {
        (true, 0) => (1, "I"),
        (true, 1) => (1, "D"),
        (true, _) => (row as u32, ""),
        (false, _) => ((row + 1) as u32, ""),
    }
}

pub fn render(pid: u64, hierarchy: &Hierarchy) -> String {
    let mut out = String::new();
    let split = hierarchy.is_split();
    let rows = hierarchy.off_edge();
    let _ = writeln!(out, "workoad [{}], {} levels", pid, rows);
    let _ = writeln!(out, "level\tHits\tmisses\tincl.\thit t\tmiss t");

    let mut total_time = 0u64;
    let mut total_hits = 0u64;
    let mut total_misses = 0u64;
    let mut total_inclusions = 0u64;

    for row in 0..rows {
        let stats = hierarchy.level_stats(row);
        let (level, label) = level_label(row, split);
        let hit_count = stats.hit_count();
        let miss_count = stats.miss_count();
        let inclusion_count = stats.inclusion_count();
        let hit_cost = stats.hit_cost();
        let miss_cost = stats.miss_cost();
        let _ = writeln!(
            out,
            "$[L{}{}]\t{}\t{}\t{}\t{}\t{}",
            level, label, hit_count, miss_count, inclusion_count, hit_cost, miss_cost
        );
        total_hits += hit_count;
        total_misses += miss_count;
        total_inclusions += inclusion_count;
        total_time += hit_cost + miss_cost;
    }

    let instructions = hierarchy.level_stats(0).fetch.hit_count + hierarchy.level_stats(0).fetch.miss_count;
    let _ = writeln!(
        out,
        "Total elapsed time {}, total hits {}, total misses {}, evictions for inclusion {}; instructions: {}",
        total_time, total_hits, total_misses, total_inclusions, instructions
    );
    info!(
        "pid {}: {} levels, {} hits, {} misses, {} inclusion evictions, elapsed {}",
        pid, rows, total_hits, total_misses, total_inclusions, total_time
    );
    out
}
