// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{LeagueError, Result};
use crate::types::PageId;

/// Assigns every page id to one of a fixed number of shuffle partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashPartitioner {
    partitions: usize,
}

impl HashPartitioner {
    pub fn new(partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(LeagueError::Configuration(
                "partition count must be at least 1".to_string(),
            ));
        }
        Ok(Self { partitions })
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions
    }

    pub fn partition(&self, id: PageId) -> usize {
        (id % self.partitions as u64) as usize
    }
}
