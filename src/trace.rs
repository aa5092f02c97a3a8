//! Trace file reader. Lines are `<kind> <address>` where `<kind>` is one
//! of `I` (instruction fetch), `R` (data read), `W` (data write) or `X`
//! (exception: the number is a wait time in instructions, not an
//! address). Reading stops at a `#`-prefixed line or end of file.

use std::io::BufRead;

use crate::stats::ReferenceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Fetch(u64),
    Read(u64),
    Write(u64),
    Exception(u64),
}

impl Reference {
    pub fn kind(&self) -> Option<ReferenceKind> {
        match self {
            Reference::Fetch(_) => Some(ReferenceKind::Fetch),
            Reference::Read(_) => Some(ReferenceKind::Read),
            Reference::Write(_) => Some(ReferenceKind::Write),
            Reference::Exception(_) => None,
        }
    }
}

fn parse_number(token: &str) -> Option<u64> {
    let stripped = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"));
    u64::from_str_radix(stripped.unwrap_or(token), 16).ok()
}

fn parse_line(line: &str) -> Option<Reference> {
    let mut parts = line.split_whitespace();
    let kind = parts.next()?;
    let value = parse_number(parts.next()?)?;
    match kind {
        "I" => Some(Reference::Fetch(value)),
        "R" => Some(Reference::Read(value)),
        "W" => Some(Reference::Write(value)),
        "X" => Some(Reference::Exception(value)),
        _ => None,
    }
}

pub struct TraceReader<R> {
    lines: std::io::Lines<R>,
    done: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        TraceReader {
            lines: reader.lines(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Reference;

    fn next(&mut self) -> Option<Reference> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(l)) => l,
                _ => {
                    self.done = true;
                    return None;
                }
            };
            let trimmed = line.trim();
            if trimmed.starts_with('#') {
                self.done = true;
                return None;
            }
            if trimmed.is_empty() {
                continue;
            }
            return match parse_line(trimmed) {
                Some(r) => Some(r),
                None => {
                    self.done = true;
                    None
                }
            };
        }
    }
}
