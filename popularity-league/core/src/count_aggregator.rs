// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::corpus::CorpusSplit;
use crate::count_table::CountTable;
use crate::error::{LeagueError, Result};
use crate::partitioner::HashPartitioner;
use crate::phase_task::PhaseTask;
use crate::record_parser::LinkRecord;
use crate::shuffle::ShuffleStore;
use crate::shutdown_signal::ShutdownSignal;
use crate::types::{CountEntry, PageId};

/// Adds `increment` to a running sum, failing loudly on overflow
fn add_count(sum: &mut u64, id: PageId, increment: u64) -> Result<()> {
    *sum = sum
        .checked_add(increment)
        .ok_or(LeagueError::Overflow { id })?;
    Ok(())
}

/// Map task: parses a corpus split and shuffles per-partition partial sums
///
/// Increments are combined locally before they are handed over, so each
/// mapper deposits at most one partial per partition and split. The split is
/// abandoned with `Cancelled` as soon as shutdown is signalled.
#[derive(Clone)]
pub struct LinkCountMapTask<S: ShuffleStore, SD: ShutdownSignal> {
    partitioner: HashPartitioner,
    shuffle: S,
    shutdown: SD,
}

impl<S: ShuffleStore, SD: ShutdownSignal> LinkCountMapTask<S, SD> {
    pub fn new(partitioner: HashPartitioner, shuffle: S, shutdown: SD) -> Self {
        Self {
            partitioner,
            shuffle,
            shutdown,
        }
    }
}

impl<S: ShuffleStore, SD: ShutdownSignal> PhaseTask for LinkCountMapTask<S, SD> {
    type Assignment = CorpusSplit;

    fn run(&self, worker_id: usize, split: CorpusSplit) -> Result<()> {
        let mut partials: Vec<HashMap<PageId, u64>> =
            vec![HashMap::new(); self.partitioner.num_partitions()];

        for (location, line) in split.located_lines() {
            if self.shutdown.is_cancelled() {
                debug!(
                    "Mapper {} abandoned split {} at {}",
                    worker_id, split.split_id, location
                );
                return Err(LeagueError::Cancelled);
            }
            let Some(record) = LinkRecord::parse(line, &location)? else {
                continue;
            };
            for (id, increment) in record.increments() {
                let partial = &mut partials[self.partitioner.partition(id)];
                add_count(partial.entry(id).or_insert(0), id, increment)?;
            }
        }

        // Nothing is shuffled unless the whole split parsed
        for (partition, partial) in partials.into_iter().enumerate() {
            if !partial.is_empty() {
                self.shuffle.deposit(partition, partial.into_iter().collect());
            }
        }

        debug!(
            "Mapper {} finished split {} ({} lines from {})",
            worker_id,
            split.split_id,
            split.lines.len(),
            split.source
        );
        Ok(())
    }
}

/// Work assignment for reducers and filters: one partition of the count table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionAssignment {
    pub partition: usize,
}

/// Reduce task: folds every partial sum of one partition and commits the
/// partition's final counts to the count table
#[derive(Clone)]
pub struct LinkCountReduceTask<S: ShuffleStore, T: CountTable> {
    shuffle: S,
    table: T,
}

impl<S: ShuffleStore, T: CountTable> LinkCountReduceTask<S, T> {
    pub fn new(shuffle: S, table: T) -> Self {
        Self { shuffle, table }
    }
}

impl<S: ShuffleStore, T: CountTable> PhaseTask for LinkCountReduceTask<S, T> {
    type Assignment = PartitionAssignment;

    fn run(&self, worker_id: usize, assignment: PartitionAssignment) -> Result<()> {
        let mut counts: BTreeMap<PageId, u64> = BTreeMap::new();
        for partial in self.shuffle.drain(assignment.partition) {
            for (id, sum) in partial {
                add_count(counts.entry(id).or_insert(0), id, sum)?;
            }
        }

        let entries: Vec<CountEntry> = counts
            .into_iter()
            .map(|(id, count)| CountEntry::new(id, count))
            .collect();
        self.table.commit(assignment.partition, &entries)?;

        debug!(
            "Reducer {} committed partition {} with {} pages",
            worker_id,
            assignment.partition,
            entries.len()
        );
        Ok(())
    }
}
