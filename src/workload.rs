//! Workload list: one trace file path per line, read from standard input,
//! each describing a separate process. A path may carry a trailing
//! `*<tag>` suffix recording the process's type for diagnostics; the tag
//! never affects simulation and is not included in the stats table, to
//! keep reported totals independent of workload bookkeeping.

use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use log::warn;

use crate::error::SimError;

#[derive(Debug, Clone)]
pub struct WorkloadEntry {
    pub path: PathBuf,
    pub process_type: Option<char>,
}

/// Parses every non-empty line of `r` into a workload entry whose trace
/// file can actually be opened; unreadable paths are logged and skipped,
/// matching the source's "at least one bad file path, carrying on".
pub fn read_workload<R: BufRead>(r: R) -> Result<Vec<WorkloadEntry>, SimError> {
    let mut entries = Vec::new();
    let mut saw_bad = false;
    for line in r.lines() {
        let line = line.map_err(|e| SimError::WorkloadError(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (path_part, process_type) = match line.rsplit_once('*') {
            Some((p, tag)) if tag.chars().count() <= 1 => (p, tag.chars().next()),
            _ => (line, None),
        };
        let path = PathBuf::from(path_part);
        if File::open(&path).is_err() {
            warn!("workload entry `{}' can't be opened, skipping", path.display());
            saw_bad = true;
            continue;
        }
        entries.push(WorkloadEntry { path, process_type });
    }
    if entries.is_empty() {
        return Err(SimError::WorkloadError("no usable trace files in workload".into()));
    }
    if saw_bad {
        warn!("at least one bad file path in workload, carrying on");
    }
    Ok(entries)
}

impl WorkloadEntry {
    pub fn open_trace(&self) -> anyhow::Result<File> {
        File::open(&self.path).with_context(|| format!("opening trace file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn strips_type_suffix() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "I 0x1").unwrap();
        let path = f.path().to_str().unwrap();
        let input = format!("{}*C\n", path);
        let entries = read_workload(Cursor::new(input)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].process_type, Some('C'));
        assert_eq!(entries[0].path, f.path());
    }

    #[test]
    fn skips_unreadable_paths_but_keeps_good_ones() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "I 0x1").unwrap();
        let input = format!("/no/such/file\n{}\n", f.path().display());
        let entries = read_workload(Cursor::new(input)).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn empty_workload_is_an_error() {
        let err = read_workload(Cursor::new("/no/such/file\n")).unwrap_err();
        assert!(matches!(err, SimError::WorkloadError(_)));
    }
}
