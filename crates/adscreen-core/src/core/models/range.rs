use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A closed, 1-indexed interval `[start, end]` over a sequence's positions.
///
/// Ranges produced by exemplar matching carry the family of the exemplar that
/// produced them; ranges coming from external feature lists or annotation files
/// carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRange {
    pub start: usize,
    pub end: usize,
    pub family: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRangeError {
    #[error("Range '{0}' is not of the form 'start-end'")]
    Format(String),
    #[error("Range bound '{0}' is not a positive integer")]
    Bound(String),
    #[error("Range start {start} is greater than end {end}")]
    Inverted { start: usize, end: usize },
}

impl DomainRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            family: None,
        }
    }

    pub fn with_family(start: usize, end: usize, family: &str) -> Self {
        Self {
            start,
            end,
            family: Some(family.to_string()),
        }
    }

    /// Number of positions covered by the range.
    pub fn span(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// True when the range covers an entire sequence of length `sequence_len`.
    pub fn is_full_length(&self, sequence_len: usize) -> bool {
        self.start == 1 && self.end == sequence_len
    }

    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

impl fmt::Display for DomainRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for DomainRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start_str, end_str) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ParseRangeError::Format(s.to_string()))?;
        let parse_bound = |b: &str| -> Result<usize, ParseRangeError> {
            b.trim()
                .parse::<usize>()
                .map_err(|_| ParseRangeError::Bound(b.trim().to_string()))
        };
        let start = parse_bound(start_str)?;
        let end = parse_bound(end_str)?;
        if start > end {
            return Err(ParseRangeError::Inverted { start, end });
        }
        Ok(Self::new(start, end))
    }
}

/// Merges overlapping or adjacent ranges.
///
/// Ranges are sorted by start (stable, so equal starts keep their input order) and a
/// range is folded into the previous merged range when its start is at most one
/// position past that range's end. The merged range keeps the family of the first
/// range folded into it.
pub fn merge_ranges(ranges: &[DomainRange]) -> Vec<DomainRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.start);

    let mut merged: Vec<DomainRange> = Vec::with_capacity(sorted.len());
    for current in sorted {
        match merged.last_mut() {
            Some(last) if current.start <= last.end + 1 => {
                last.end = last.end.max(current.end);
            }
            _ => merged.push(current),
        }
    }
    merged
}
