// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{LeagueError, Result};
use crate::rank_assigner::RankOrder;

/// Where the hand-off count table is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountTableBackend {
    /// One text file per partition
    #[default]
    FlatFile,
    /// One sled tree per partition
    Sled,
}

impl FromStr for CountTableBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flat-file" => Ok(CountTableBackend::FlatFile),
            "sled" => Ok(CountTableBackend::Sled),
            other => Err(format!(
                "unknown count table backend '{}', expected 'flat-file' or 'sled'",
                other
            )),
        }
    }
}

impl fmt::Display for CountTableBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountTableBackend::FlatFile => write!(f, "flat-file"),
            CountTableBackend::Sled => write!(f, "sled"),
        }
    }
}

/// Run configuration, read from a JSON file; every field has a default
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// League file, one identifier per line
    pub league_path: Option<PathBuf>,
    /// Directory holding the hand-off count table
    /// Defaults to a directory private to this process under the temp dir
    pub work_dir: PathBuf,
    /// Corpus lines per map assignment
    pub split_size: usize,
    pub num_mappers: usize,
    pub num_reducers: usize,
    /// Shuffle partitions, i.e. count table partitions
    pub num_partitions: usize,
    pub num_filters: usize,
    pub count_table: CountTableBackend,
    pub rank_order: RankOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            league_path: None,
            work_dir: std::env::temp_dir()
                .join(format!("popularity-league-{}", std::process::id())),
            split_size: 10_000,
            num_mappers: parallelism,
            num_reducers: parallelism,
            num_partitions: 10,
            num_filters: parallelism,
            count_table: CountTableBackend::default(),
            rank_order: RankOrder::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|e| LeagueError::missing("config", path, e))?;
        serde_json::from_str(&contents)
            .map_err(|e| LeagueError::Configuration(format!("{}: {}", path.display(), e)))
    }

    /// Rejects configurations no run can succeed with
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("split_size", self.split_size),
            ("num_mappers", self.num_mappers),
            ("num_reducers", self.num_reducers),
            ("num_partitions", self.num_partitions),
            ("num_filters", self.num_filters),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(LeagueError::Configuration(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        self.league_path().map(|_| ())
    }

    pub fn league_path(&self) -> Result<&Path> {
        self.league_path.as_deref().ok_or_else(|| {
            LeagueError::Configuration("no league file configured (league_path)".to_string())
        })
    }

    /// Location of the count table for the configured backend
    pub fn count_table_path(&self) -> PathBuf {
        match self.count_table {
            CountTableBackend::FlatFile => self.work_dir.join("counts"),
            CountTableBackend::Sled => self.work_dir.join("counts.sled"),
        }
    }
}
