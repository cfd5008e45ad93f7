// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::error::{LeagueError, Result};
use crate::record_parser::decode_line;
use crate::types::RecordLocation;

/// Work assignment for a mapper: a run of consecutive lines of one corpus file
#[derive(Debug, Clone)]
pub struct CorpusSplit {
    pub split_id: usize,
    pub source: Arc<str>,
    /// 1-based line number of `lines[0]` within `source`
    pub first_line: usize,
    pub lines: Vec<String>,
}

impl CorpusSplit {
    /// Lines paired with their location in the corpus
    pub fn located_lines(&self) -> impl Iterator<Item = (RecordLocation, &str)> + '_ {
        self.lines.iter().enumerate().map(move |(offset, line)| {
            (
                RecordLocation::new(self.source.clone(), self.first_line + offset),
                line.as_str(),
            )
        })
    }
}

/// Reads the corpus at `path` into splits of at most `split_size` lines
///
/// `path` is either a single file or a directory; in a directory every
/// regular file whose name does not start with `.` or `_` is read, in name
/// order.
pub fn read_corpus(path: &Path, split_size: usize) -> Result<Vec<CorpusSplit>> {
    if split_size == 0 {
        return Err(LeagueError::Configuration(
            "split size must be at least 1".to_string(),
        ));
    }

    let mut splits = Vec::new();
    for file in corpus_files(path)? {
        read_file_splits(&file, split_size, &mut splits)?;
    }

    debug!(
        "Read {} splits from corpus at {}",
        splits.len(),
        path.display()
    );
    Ok(splits)
}

fn corpus_files(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path).map_err(|e| LeagueError::missing("corpus", path, e))?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(path).map_err(|e| LeagueError::missing("corpus", path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LeagueError::missing("corpus", path, e))?;
        let name = entry.file_name();
        let hidden = name
            .to_str()
            .is_some_and(|n| n.starts_with('.') || n.starts_with('_'));
        let is_file = entry
            .file_type()
            .map_err(|e| LeagueError::missing("corpus", entry.path(), e))?
            .is_file();
        if is_file && !hidden {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn read_file_splits(file: &Path, split_size: usize, splits: &mut Vec<CorpusSplit>) -> Result<()> {
    let handle = File::open(file).map_err(|e| LeagueError::missing("corpus", file, e))?;
    let source: Arc<str> = file.display().to_string().into();

    let mut lines = Vec::with_capacity(split_size);
    let mut first_line = 1;
    for (index, raw) in BufReader::new(handle).split(b'\n').enumerate() {
        let raw = raw.map_err(|e| LeagueError::missing("corpus", file, e))?;
        let line = decode_line(raw, &RecordLocation::new(source.clone(), index + 1))?;
        if lines.is_empty() {
            first_line = index + 1;
        }
        lines.push(line);

        if lines.len() == split_size {
            splits.push(CorpusSplit {
                split_id: splits.len(),
                source: source.clone(),
                first_line,
                lines: std::mem::replace(&mut lines, Vec::with_capacity(split_size)),
            });
        }
    }

    if !lines.is_empty() {
        splits.push(CorpusSplit {
            split_id: splits.len(),
            source,
            first_line,
            lines,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_single_file_is_split_by_line_count() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("links.txt");
        fs::write(&file, "1 2\n2 3\n3 1\n4\n5 1\n").unwrap();

        let splits = read_corpus(&file, 2).unwrap();

        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0].lines, vec!["1 2", "2 3"]);
        assert_eq!(splits[1].first_line, 3);
        assert_eq!(splits[2].lines, vec!["5 1"]);
        assert_eq!(splits[2].split_id, 2);
    }

    #[test]
    fn test_directory_skips_hidden_files_and_keeps_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "2 1\n").unwrap();
        fs::write(dir.path().join("a.txt"), "1 2\n").unwrap();
        fs::write(dir.path().join("_SUCCESS"), "").unwrap();
        fs::write(dir.path().join(".a.txt.crc"), "garbage\n").unwrap();

        let splits = read_corpus(dir.path(), 100).unwrap();

        assert_eq!(splits.len(), 2);
        assert!(splits[0].source.ends_with("a.txt"));
        assert!(splits[1].source.ends_with("b.txt"));
        assert_eq!(splits[1].split_id, 1);
    }

    #[test]
    fn test_located_lines_count_from_first_line() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("links.txt");
        fs::write(&file, "1\n2\n3\n").unwrap();

        let splits = read_corpus(&file, 2).unwrap();
        let lines: Vec<_> = splits[1]
            .located_lines()
            .map(|(location, line)| (location.line, line.to_string()))
            .collect();

        assert_eq!(lines, vec![(3, "3".to_string())]);
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error_at_its_line() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("links.txt");
        fs::write(&file, b"1 2\n3 \xff4\n").unwrap();

        match read_corpus(&file, 10).unwrap_err() {
            LeagueError::Parse { location, .. } => {
                assert!(location.source.ends_with("links.txt"));
                assert_eq!(location.line, 2);
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_corpus_is_reported() {
        let dir = tempdir().unwrap();
        let err = read_corpus(&dir.path().join("nope"), 10).unwrap_err();
        assert!(matches!(
            err,
            LeagueError::MissingResource { role: "corpus", .. }
        ));
    }
}
