// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{PageId, ScoredCandidate};

/// Partial sums produced by one mapper for one partition
pub type PartialCounts = Vec<(PageId, u64)>;

/// Trait for the key-based shuffle between mappers and reducers
/// Mappers deposit owned partials, the reducer of a partition drains them
pub trait ShuffleStore: Clone + Send + Sync + 'static {
    /// Hand over a mapper's partial sums for `partition`
    fn deposit(&self, partition: usize, partial: PartialCounts);

    /// Take every partial deposited for `partition` so far
    fn drain(&self, partition: usize) -> Vec<PartialCounts>;
}

/// Shuffle store kept in the orchestrator's memory
#[derive(Clone, Default)]
pub struct LocalShuffleStore {
    partitions: Arc<Mutex<HashMap<usize, Vec<PartialCounts>>>>,
}

impl LocalShuffleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShuffleStore for LocalShuffleStore {
    fn deposit(&self, partition: usize, partial: PartialCounts) {
        let mut partitions = self
            .partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        partitions.entry(partition).or_default().push(partial);
    }

    fn drain(&self, partition: usize) -> Vec<PartialCounts> {
        let mut partitions = self
            .partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        partitions.remove(&partition).unwrap_or_default()
    }
}

/// Trait for gathering the locally sorted candidate lists of filter workers
/// in front of the single rank assignment step
pub trait CandidateSink: Clone + Send + Sync + 'static {
    fn deposit(&self, candidates: Vec<ScoredCandidate>);
}

/// Collects every filter worker's candidate list until ranking takes them all
#[derive(Clone, Default)]
pub struct CandidateCollector {
    lists: Arc<Mutex<Vec<Vec<ScoredCandidate>>>>,
}

impl CandidateCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every list deposited so far
    pub fn take_all(&self) -> Vec<Vec<ScoredCandidate>> {
        let mut lists = self.lists.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *lists)
    }
}

impl CandidateSink for CandidateCollector {
    fn deposit(&self, candidates: Vec<ScoredCandidate>) {
        self.lists
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(candidates);
    }
}
