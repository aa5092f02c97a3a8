//! Cache configuration file parsing: one line per level, blocks-total ->
//! block-size -> hit-time -> lookup-overhead -> associativity -> split
//! flag, with the final line describing the memory layer.

use std::fmt::Write as _;

use log::debug;

use crate::bitgeom::is_pow2;
use crate::error::SimError;

#[derive(Debug, Clone, Copy)]
pub struct LevelConfig {
    pub total_blocks: u64,
    pub block_size: u64,
    pub hit_time: u64,
    pub lookup_overhead: u64,
    pub associativity: u64,
    pub split: bool,
}

impl LevelConfig {
    pub fn is_memory_layer(&self) -> bool {
        self.associativity == 0
    }

    fn parse_line(line: &str, line_no: usize) -> Result<Self, SimError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(SimError::ConfigError(format!(
                "line {}: expected 6 whitespace-separated fields, got {}",
                line_no,
                fields.len()
            )));
        }
        let mut nums = [0u64; 6];
        for (slot, field) in nums.iter_mut().zip(fields.iter()) {
            *slot = field.parse::<u64>().map_err(|_| {
                SimError::ConfigError(format!("line {}: not all fields are numbers: {:?}", line_no, line))
            })?;
        }
        let [total_size, block_size, hit_time, lookup_overhead, associativity, split_flag] = nums;
        if split_flag > 1 {
            return Err(SimError::ConfigError(format!(
                "line {}: split flag must be 0 or 1, got {}",
                line_no, split_flag
            )));
        }
        let total_blocks = if block_size == 0 {
            total_size
        } else {
            if total_size % block_size != 0 {
                return Err(SimError::ConfigError(format!(
                    "line {}: total size {} is not a multiple of block size {}",
                    line_no, total_size, block_size
                )));
            }
            total_size / block_size
        };
        Ok(LevelConfig {
            total_blocks,
            block_size,
            hit_time,
            lookup_overhead,
            associativity,
            split: split_flag != 0,
        })
    }

    pub fn parse_all(text: &str) -> Result<Vec<Self>, SimError> {
        let mut out = Vec::new();
        for (i, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            out.push(Self::parse_line(line, i + 1)?);
        }
        Self::validate(&out)?;
        debug!("parsed {} cache levels from configuration", out.len());
        Ok(out)
    }

    fn validate(levels: &[LevelConfig]) -> Result<(), SimError> {
        let (last, rest) = levels
            .split_last()
            .ok_or_else(|| SimError::ConfigError("configuration has no levels".into()))?;
        if !last.is_memory_layer() {
            return Err(SimError::ConfigError(
                "final configuration line must describe the memory layer (associativity 0)".into(),
            ));
        }
        for (i, level) in rest.iter().enumerate() {
            if level.is_memory_layer() {
                return Err(SimError::ConfigError(format!(
                    "level {} has zero associativity but is not the last line",
                    i
                )));
            }
            if level.total_blocks == 0 || level.block_size == 0 {
                return Err(SimError::BadCacheSize(format!("level {}", i)));
            }
            if !is_pow2(level.total_blocks) {
                return Err(SimError::BadBlockCount(format!("level {}", i)));
            }
            if !is_pow2(level.block_size) {
                return Err(SimError::BadCacheSize(format!("level {}", i)));
            }
            if !is_pow2(level.associativity) {
                return Err(SimError::BadAssociativity(format!("level {}", i)));
            }
            if level.total_blocks % level.associativity != 0 {
                return Err(SimError::BadAssociativity(format!(
                    "level {}: {} blocks do not divide evenly across {} ways",
                    i, level.total_blocks, level.associativity
                )));
            }
            if level.split && i != 0 {
                return Err(SimError::BadCacheId(format!(
                    "level {}: only level 0 (L1) may be split",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Renders the same tabular layout as the source's `reportParameters`.
    pub fn report_table(levels: &[LevelConfig]) -> String {
        let mut out = String::new();
        if levels.is_empty() {
            return out;
        }
        let _ = writeln!(out, "\tblks\tblksize\thitT\tlookupT\tassoc\tsplit?\tTotal Bytes");
        let split_l1 = levels[0].split;
        let mut level = 1;
        for (i, cfg) in levels[..levels.len() - 1].iter().enumerate() {
            let label = if split_l1 {
                match i {
                    0 => "I",
                    1 => "D",
                    _ => "",
                }
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "L{}{}:\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                level,
                label,
                cfg.total_blocks,
                cfg.block_size,
                cfg.hit_time,
                cfg.lookup_overhead,
                cfg.associativity,
                cfg.split as u8,
                cfg.total_blocks * cfg.block_size
            );
            if i > 0 || !split_l1 {
                level += 1;
            }
        }
        let _ = writeln!(out, "DRAM:\t\t\t{}", levels[levels.len() - 1].hit_time);
        out
    }
}
