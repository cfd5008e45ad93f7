// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::Path;
use std::sync::Arc;

use sled::{Batch, Db};

use crate::count_table::{
    already_committed, parse_entry, parse_partition_name, partition_name, CountTable,
};
use crate::error::{LeagueError, Result};
use crate::types::{CountEntry, RecordLocation};

/// Count table stored in a sled database, one tree per partition
/// Keys and values are textual integers
#[derive(Clone)]
pub struct SledCountTable {
    db: Arc<Db>,
}

impl SledCountTable {
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path).map_err(|e| {
            LeagueError::CountTable(format!("cannot open {}: {}", path.display(), e))
        })?;
        Ok(Self { db: Arc::new(db) })
    }

    fn partition_names(&self) -> Vec<(usize, String)> {
        self.db
            .tree_names()
            .into_iter()
            .filter_map(|name| {
                let name = std::str::from_utf8(&name).ok()?.to_string();
                parse_partition_name(&name).map(|partition| (partition, name))
            })
            .collect()
    }
}

impl CountTable for SledCountTable {
    fn reset(&self) -> Result<()> {
        for (_, name) in self.partition_names() {
            self.db.drop_tree(name.as_bytes())?;
        }
        self.db.flush()?;
        Ok(())
    }

    fn commit(&self, partition: usize, entries: &[CountEntry]) -> Result<()> {
        if self
            .partition_names()
            .iter()
            .any(|(committed, _)| *committed == partition)
        {
            return Err(already_committed(partition));
        }

        let mut batch = Batch::default();
        for entry in entries {
            batch.insert(
                entry.id.to_string().as_bytes(),
                entry.count.to_string().as_bytes(),
            );
        }

        let tree = self.db.open_tree(partition_name(partition))?;
        tree.apply_batch(batch)?;
        tree.flush()?;
        Ok(())
    }

    fn partitions(&self) -> Result<Vec<usize>> {
        let mut partitions: Vec<usize> = self
            .partition_names()
            .into_iter()
            .map(|(partition, _)| partition)
            .collect();
        partitions.sort_unstable();
        Ok(partitions)
    }

    fn scan(&self, partition: usize) -> Result<Vec<CountEntry>> {
        let name = partition_name(partition);
        let tree = self.db.open_tree(&name)?;
        let source: Arc<str> = name.into();

        let mut entries = Vec::with_capacity(tree.len());
        for (index, item) in tree.iter().enumerate() {
            let (key, value) = item?;
            let location = RecordLocation::new(source.clone(), index + 1);
            let id = std::str::from_utf8(&key)
                .map_err(|_| LeagueError::parse(location.clone(), String::from_utf8_lossy(&key)))?;
            let count = std::str::from_utf8(&value).map_err(|_| {
                LeagueError::parse(location.clone(), String::from_utf8_lossy(&value))
            })?;
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
        let table = SledCountTable::open(&dir.path().join("counts.sled")).unwrap();
        table.reset().unwrap();

        table
            .commit(1, &[CountEntry::new(9, 1), CountEntry::new(5, u64::MAX)])
            .unwrap();
        table.commit(0, &[]).unwrap();

        assert_eq!(table.partitions().unwrap(), vec![0, 1]);
        let mut entries = table.scan(1).unwrap();
        entries.sort_by_key(|entry| entry.id);
        assert_eq!(
            entries,
            vec![CountEntry::new(5, u64::MAX), CountEntry::new(9, 1)]
        );
    }

    #[test]
    fn test_reset_and_double_commit() {
        let dir = tempdir().unwrap();
        let table = SledCountTable::open(&dir.path().join("counts.sled")).unwrap();
        table.reset().unwrap();
        table.commit(4, &[CountEntry::new(4, 0)]).unwrap();

        assert!(matches!(
            table.commit(4, &[]).unwrap_err(),
            LeagueError::CountTable(_)
        ));

        table.reset().unwrap();
        assert!(table.partitions().unwrap().is_empty());
        table.commit(4, &[CountEntry::new(4, 2)]).unwrap();
        assert_eq!(table.scan(4).unwrap(), vec![CountEntry::new(4, 2)]);
    }
}
