// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::error::{LeagueError, Result};
use crate::record_parser::{decode_line, parse_id};
use crate::types::{PageId, RecordLocation};

/// The pages that take part in the ranking
/// Loaded once per run and only ever read afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueSet {
    members: HashSet<PageId>,
}

impl LeagueSet {
    /// Reads a league file: one identifier per line
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| LeagueError::missing("league", path, e))?;
        let source: Arc<str> = path.display().to_string().into();

        let mut league = Self::default();
        for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let raw = raw.map_err(|e| LeagueError::missing("league", path, e))?;
            let location = RecordLocation::new(source.clone(), index + 1);
            league.add_line(&decode_line(raw, &location)?, &location)?;
        }
        Ok(league)
    }

    /// Parses league text, skipping blank lines and surrounding whitespace
    pub fn parse(text: &str, source: &str) -> Result<Self> {
        let source: Arc<str> = source.into();
        let mut league = Self::default();
        for (index, line) in text.lines().enumerate() {
            league.add_line(line, &RecordLocation::new(source.clone(), index + 1))?;
        }
        Ok(league)
    }

    fn add_line(&mut self, line: &str, location: &RecordLocation) -> Result<()> {
        let token = line.trim();
        if !token.is_empty() {
            self.members.insert(parse_id(token, location)?);
        }
        Ok(())
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<PageId> for LeagueSet {
    fn from_iter<I: IntoIterator<Item = PageId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let league = LeagueSet::parse("5\r\n 7 \n\n9\n", "league.txt").unwrap();
        assert_eq!(league, [5, 7, 9].into_iter().collect::<LeagueSet>());
    }

    #[test]
    fn test_parse_rejects_non_integer_line() {
        match LeagueSet::parse("5\nseven\n", "league.txt").unwrap_err() {
            LeagueError::Parse { location, token } => {
                assert_eq!(location.to_string(), "league.txt:2");
                assert_eq!(token, "seven");
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = LeagueSet::load(&dir.path().join("league.txt")).unwrap_err();
        assert!(matches!(
            err,
            LeagueError::MissingResource { role: "league", .. }
        ));
    }

    #[test]
    fn test_load_reports_invalid_utf8_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("league.txt");
        fs::write(&path, b"1\n2\n\xfe9\n").unwrap();

        match LeagueSet::load(&path).unwrap_err() {
            LeagueError::Parse { location, .. } => assert_eq!(location.line, 3),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("league.txt");
        fs::write(&path, "1\n2\n99\n").unwrap();

        let league = LeagueSet::load(&path).unwrap();

        assert_eq!(league.len(), 3);
        assert!(league.contains(99));
        assert!(!league.contains(3));
    }
}
