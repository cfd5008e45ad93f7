// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::count_aggregator::PartitionAssignment;
use crate::count_table::CountTable;
use crate::error::Result;
use crate::league::LeagueSet;
use crate::phase_task::PhaseTask;
use crate::shuffle::CandidateSink;
use crate::types::{CountEntry, ScoredCandidate};

/// Keeps the entries of league members, sorted by `(score, id)`
pub fn filter_partition(entries: &[CountEntry], league: &LeagueSet) -> Vec<ScoredCandidate> {
    entries
        .iter()
        .filter(|entry| league.contains(entry.id))
        .map(|&entry| ScoredCandidate::from(entry))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filter task: restricts one count table partition to league members
#[derive(Clone)]
pub struct LeagueFilterTask<T: CountTable, C: CandidateSink> {
    table: T,
    league: Arc<LeagueSet>,
    sink: C,
}

impl<T: CountTable, C: CandidateSink> LeagueFilterTask<T, C> {
    pub fn new(table: T, league: Arc<LeagueSet>, sink: C) -> Self {
        Self {
            table,
            league,
            sink,
        }
    }
}

impl<T: CountTable, C: CandidateSink> PhaseTask for LeagueFilterTask<T, C> {
    type Assignment = PartitionAssignment;

    fn run(&self, worker_id: usize, assignment: PartitionAssignment) -> Result<()> {
        let entries = self.table.scan(assignment.partition)?;
        let candidates = filter_partition(&entries, &self.league);

        debug!(
            "Filter {} kept {} of {} pages in partition {}",
            worker_id,
            candidates.len(),
            entries.len(),
            assignment.partition
        );
        self.sink.deposit(candidates);
        Ok(())
    }
}
