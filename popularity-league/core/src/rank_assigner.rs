// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::types::{RankedEntry, ScoredCandidate};

/// Direction in which scores are ranked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankOrder {
    /// Rank 0 goes to the least referenced league member
    #[default]
    Ascending,
    /// Rank 0 goes to the most referenced league member
    Descending,
}

impl RankOrder {
    fn compare(self, a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
        match self {
            RankOrder::Ascending => a.cmp(b),
            RankOrder::Descending => b.score.cmp(&a.score).then(a.id.cmp(&b.id)),
        }
    }
}

impl FromStr for RankOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(RankOrder::Ascending),
            "descending" => Ok(RankOrder::Descending),
            other => Err(format!(
                "unknown rank order '{}', expected 'ascending' or 'descending'",
                other
            )),
        }
    }
}

impl fmt::Display for RankOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankOrder::Ascending => write!(f, "ascending"),
            RankOrder::Descending => write!(f, "descending"),
        }
    }
}

/// Merges every filter worker's candidates and assigns competition ranks
///
/// Needs the complete candidate set: a rank is the position of the first
/// candidate of its score group in the global order, so tied candidates share
/// a rank and the next distinct score skips the positions they used.
pub fn assign_ranks(lists: Vec<Vec<ScoredCandidate>>, order: RankOrder) -> Vec<RankedEntry> {
    let mut candidates: Vec<ScoredCandidate> = lists.into_iter().flatten().collect();
    candidates.sort_unstable_by(|a, b| order.compare(a, b));

    let mut ranked: Vec<RankedEntry> = Vec::with_capacity(candidates.len());
    for (index, candidate) in candidates.iter().enumerate() {
        let rank = match ranked.last() {
            Some(last) if candidates[index - 1].score == candidate.score => last.rank,
            _ => index,
        };
        ranked.push(RankedEntry {
            id: candidate.id,
            rank,
        });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(entries: &[RankedEntry]) -> Vec<(u64, usize)> {
        entries.iter().map(|entry| (entry.id, entry.rank)).collect()
    }

    #[test]
    fn test_distinct_scores_rank_by_position() {
        let lists = vec![
            vec![ScoredCandidate::new(2, 3)],
            vec![ScoredCandidate::new(0, 1), ScoredCandidate::new(1, 2)],
        ];
        assert_eq!(
            ranks(&assign_ranks(lists, RankOrder::Ascending)),
            vec![(1, 0), (2, 1), (3, 2)]
        );
    }

    #[test]
    fn test_ties_share_rank() {
        let lists = vec![
            vec![ScoredCandidate::new(3, 7)],
            vec![ScoredCandidate::new(1, 9), ScoredCandidate::new(3, 5)],
        ];
        assert_eq!(
            ranks(&assign_ranks(lists, RankOrder::Ascending)),
            vec![(9, 0), (5, 1), (7, 1)]
        );
    }

    #[test]
    fn test_tied_group_leaves_gap() {
        let lists = vec![vec![
            ScoredCandidate::new(1, 1),
            ScoredCandidate::new(1, 2),
            ScoredCandidate::new(1, 3),
            ScoredCandidate::new(4, 4),
            ScoredCandidate::new(4, 5),
            ScoredCandidate::new(6, 6),
        ]];
        assert_eq!(
            ranks(&assign_ranks(lists, RankOrder::Ascending)),
            vec![(1, 0), (2, 0), (3, 0), (4, 3), (5, 3), (6, 5)]
        );
    }

    #[test]
    fn test_edge_cases() {
        assert!(assign_ranks(Vec::new(), RankOrder::Ascending).is_empty());
        assert!(assign_ranks(vec![Vec::new(), Vec::new()], RankOrder::Ascending).is_empty());
        assert_eq!(
            ranks(&assign_ranks(
                vec![vec![ScoredCandidate::new(42, 8)]],
                RankOrder::Ascending
            )),
            vec![(8, 0)]
        );

        let all_tied = vec![
            vec![ScoredCandidate::new(5, 3)],
            vec![ScoredCandidate::new(5, 1), ScoredCandidate::new(5, 2)],
        ];
        assert_eq!(
            ranks(&assign_ranks(all_tied, RankOrder::Ascending)),
            vec![(1, 0), (2, 0), (3, 0)]
        );
    }

    #[test]
    fn test_descending_puts_most_referenced_first() {
        let lists = vec![vec![
            ScoredCandidate::new(1, 9),
            ScoredCandidate::new(3, 5),
            ScoredCandidate::new(3, 7),
        ]];
        assert_eq!(
            ranks(&assign_ranks(lists, RankOrder::Descending)),
            vec![(5, 0), (7, 0), (9, 2)]
        );
    }

    #[test]
    fn test_rank_laws_hold() {
        let lists = vec![
            (0..50)
                .map(|id| ScoredCandidate::new(id % 7, id))
                .collect::<Vec<_>>(),
            (50..80)
                .map(|id| ScoredCandidate::new(id % 3, id))
                .collect::<Vec<_>>(),
        ];
        let mut scores: Vec<ScoredCandidate> = lists.iter().flatten().copied().collect();
        scores.sort();

        let ranked = assign_ranks(lists, RankOrder::Ascending);

        assert_eq!(ranked.len(), scores.len());
        for i in 0..ranked.len() {
            assert_eq!(ranked[i].id, scores[i].id);
            assert!(ranked[i].rank <= i);
            if i > 0 {
                assert!(ranked[i].rank >= ranked[i - 1].rank);
                assert_eq!(
                    scores[i].score == scores[i - 1].score,
                    ranked[i].rank == ranked[i - 1].rank
                );
            }
        }
    }

    #[test]
    fn test_order_parses_from_text() {
        assert_eq!("descending".parse::<RankOrder>(), Ok(RankOrder::Descending));
        assert!("upside-down".parse::<RankOrder>().is_err());
    }
}
