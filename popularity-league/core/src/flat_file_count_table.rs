// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::count_table::{
    already_committed, parse_entry, parse_partition_name, partition_name, CountTable,
};
use crate::error::{LeagueError, Result};
use crate::types::{CountEntry, RecordLocation};

/// Count table stored as one text file per partition, `id<TAB>count` per line
#[derive(Clone, Debug)]
pub struct FlatFileCountTable {
    dir: PathBuf,
}

impl FlatFileCountTable {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn partition_path(&self, partition: usize) -> PathBuf {
        self.dir.join(partition_name(partition))
    }

    fn write_partition(&self, path: &Path, entries: &[CountEntry]) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in entries {
            writeln!(writer, "{}\t{}", entry.id, entry.count)?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()
    }
}

impl CountTable for FlatFileCountTable {
    fn reset(&self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)
                .map_err(|e| LeagueError::missing("count table", &self.dir, e))?;
        }
        fs::create_dir_all(&self.dir).map_err(|e| LeagueError::missing("count table", &self.dir, e))
    }

    fn commit(&self, partition: usize, entries: &[CountEntry]) -> Result<()> {
        let path = self.partition_path(partition);
        if path.exists() {
            return Err(already_committed(partition));
        }

        // Written under a hidden name first so a partition is either complete or absent
        let partial = self
            .dir
            .join(format!(".{}.partial", partition_name(partition)));
        self.write_partition(&partial, entries)
            .map_err(|e| LeagueError::missing("count table", &partial, e))?;
        fs::rename(&partial, &path).map_err(|e| LeagueError::missing("count table", &path, e))?;

        debug!(
            "Committed {} entries to {}",
            entries.len(),
            path.display()
        );
        Ok(())
    }

    fn partitions(&self) -> Result<Vec<usize>> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| LeagueError::missing("count table", &self.dir, e))?;

        let mut partitions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LeagueError::missing("count table", &self.dir, e))?;
            if let Some(partition) = entry.file_name().to_str().and_then(parse_partition_name) {
                partitions.push(partition);
            }
        }
        partitions.sort_unstable();
        Ok(partitions)
    }

    fn scan(&self, partition: usize) -> Result<Vec<CountEntry>> {
        let path = self.partition_path(partition);
        let file = File::open(&path).map_err(|e| LeagueError::missing("count table", &path, e))?;
        let source: std::sync::Arc<str> = path.display().to_string().into();

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| LeagueError::missing("count table", &path, e))?;
            let location = RecordLocation::new(source.clone(), index + 1);
            let (id, count) = line
                .split_once('\t')
                .ok_or_else(|| LeagueError::parse(location.clone(), line.as_str()))?;
            entries.push(parse_entry(id, count, &location)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_committed_partition_scans_back_exactly() {
        let dir = tempdir().unwrap();
        let table = FlatFileCountTable::new(dir.path().join("counts"));
        table.reset().unwrap();

        let entries = vec![
            CountEntry::new(1, 0),
            CountEntry::new(7, 3),
            CountEntry::new(u64::MAX, u64::MAX),
        ];
        table.commit(2, &entries).unwrap();
        table.commit(0, &[]).unwrap();

        assert_eq!(table.partitions().unwrap(), vec![0, 2]);
        assert_eq!(table.scan(2).unwrap(), entries);
        assert!(table.scan(0).unwrap().is_empty());

        let text = fs::read_to_string(dir.path().join("counts/part-r-00002")).unwrap();
        assert!(text.starts_with("1\t0\n7\t3\n"));
    }

    #[test]
    fn test_partition_cannot_be_committed_twice() {
        let dir = tempdir().unwrap();
        let table = FlatFileCountTable::new(dir.path());
        table.reset().unwrap();
        table.commit(0, &[CountEntry::new(1, 1)]).unwrap();

        let err = table.commit(0, &[CountEntry::new(1, 2)]).unwrap_err();
        assert!(matches!(err, LeagueError::CountTable(_)));
        assert_eq!(table.scan(0).unwrap(), vec![CountEntry::new(1, 1)]);
    }

    #[test]
    fn test_reset_drops_previous_run() {
        let dir = tempdir().unwrap();
        let table = FlatFileCountTable::new(dir.path().join("counts"));
        table.reset().unwrap();
        table.commit(3, &[CountEntry::new(3, 1)]).unwrap();

        table.reset().unwrap();

        assert!(table.partitions().unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_line_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let table = FlatFileCountTable::new(dir.path());
        table.reset().unwrap();
        fs::write(dir.path().join("part-r-00000"), "1\t2\n3 4\n").unwrap();

        match table.scan(0).unwrap_err() {
            LeagueError::Parse { location, .. } => assert_eq!(location.line, 2),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }
}
