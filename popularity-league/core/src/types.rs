// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::sync::Arc;

/// Identifier of a page in the link graph
pub type PageId = u64;

/// Final popularity score of one page: how often it was referenced as a link target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountEntry {
    pub id: PageId,
    pub count: u64,
}

impl CountEntry {
    pub fn new(id: PageId, count: u64) -> Self {
        Self { id, count }
    }
}

/// League member together with its score
///
/// Field order matters: the derived ordering is `(score, id)` ascending,
/// which gives the total order the rank assigner relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScoredCandidate {
    pub score: u64,
    pub id: PageId,
}

impl ScoredCandidate {
    pub fn new(score: u64, id: PageId) -> Self {
        Self { score, id }
    }
}

impl From<CountEntry> for ScoredCandidate {
    fn from(entry: CountEntry) -> Self {
        Self::new(entry.count, entry.id)
    }
}

/// Terminal artifact of a run: one per league member seen in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry {
    pub id: PageId,
    pub rank: usize,
}

/// Where a record came from, used to point at the offending line on failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    pub source: Arc<str>,
    pub line: usize,
}

impl RecordLocation {
    pub fn new(source: impl Into<Arc<str>>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
        }
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

/// The parallel phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Parse corpus splits and shuffle partial counts
    Map,
    /// Fold partial counts per partition into the count table
    Reduce,
    /// Restrict count table partitions to league members
    Filter,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => write!(f, "map"),
            Phase::Reduce => write!(f, "reduce"),
            Phase::Filter => write!(f, "filter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_order_by_score_then_id() {
        let mut candidates = vec![
            ScoredCandidate::new(3, 7),
            ScoredCandidate::new(1, 9),
            ScoredCandidate::new(3, 5),
        ];
        candidates.sort();
        assert_eq!(
            candidates,
            vec![
                ScoredCandidate::new(1, 9),
                ScoredCandidate::new(3, 5),
                ScoredCandidate::new(3, 7),
            ]
        );
    }

    #[test]
    fn test_location_display() {
        assert_eq!(RecordLocation::new("links.txt", 12).to_string(), "links.txt:12");
    }
}
