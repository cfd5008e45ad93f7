// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{LeagueError, Result};
use crate::record_parser::parse_id;
use crate::types::{CountEntry, RecordLocation};

const PARTITION_PREFIX: &str = "part-r-";

/// Trait for the durable hand-off table between counting and ranking
///
/// The table is written one partition at a time by reducers and only read
/// afterwards. A committed partition is never modified.
pub trait CountTable: Clone + Send + Sync + 'static {
    /// Remove every partition left over from a previous run
    fn reset(&self) -> Result<()>;

    /// Persist the final counts of one partition
    /// Committing the same partition twice is an error
    fn commit(&self, partition: usize, entries: &[CountEntry]) -> Result<()>;

    /// Committed partitions in ascending order
    fn partitions(&self) -> Result<Vec<usize>>;

    /// All entries of a committed partition
    fn scan(&self, partition: usize) -> Result<Vec<CountEntry>>;
}

pub fn partition_name(partition: usize) -> String {
    format!("{}{:05}", PARTITION_PREFIX, partition)
}

pub fn parse_partition_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(PARTITION_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub(crate) fn already_committed(partition: usize) -> LeagueError {
    LeagueError::CountTable(format!(
        "partition {} was already committed",
        partition_name(partition)
    ))
}

/// Parses one textual `id`/`count` pair of the hand-off table
pub(crate) fn parse_entry(id: &str, count: &str, location: &RecordLocation) -> Result<CountEntry> {
    let id = parse_id(id, location)?;
    let count = count
        .parse::<u64>()
        .map_err(|_| LeagueError::parse(location.clone(), count))?;
    Ok(CountEntry::new(id, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_names_round_trip() {
        assert_eq!(partition_name(7), "part-r-00007");
        assert_eq!(parse_partition_name("part-r-00007"), Some(7));
        assert_eq!(parse_partition_name("part-r-"), None);
        assert_eq!(parse_partition_name(".part-r-00007.partial"), None);
        assert_eq!(parse_partition_name("_SUCCESS"), None);
    }
}
