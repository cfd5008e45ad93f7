// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use log::info;

use crate::config::PipelineConfig;
use crate::corpus::CorpusSplit;
use crate::count_aggregator::{LinkCountMapTask, LinkCountReduceTask, PartitionAssignment};
use crate::count_table::CountTable;
use crate::error::Result;
use crate::league::LeagueSet;
use crate::league_filter::LeagueFilterTask;
use crate::partitioner::HashPartitioner;
use crate::phase_executor::PhaseExecutor;
use crate::phase_task::PhaseTask;
use crate::rank_assigner::assign_ranks;
use crate::shuffle::{CandidateCollector, LocalShuffleStore};
use crate::shutdown_signal::ShutdownSignal;
use crate::types::{Phase, RankedEntry};
use crate::worker_factory::WorkerFactory;

/// Orchestrator coordinates the two stages of a run
/// Generic over the worker transport, the phase executor and the shutdown
/// signal handed to long-running tasks
pub struct Orchestrator<F, E, SD>
where
    F: WorkerFactory,
    E: PhaseExecutor<Token = F::Token>,
    SD: ShutdownSignal,
{
    factory: F,
    executor: E,
    shutdown: SD,
}

impl<F, E, SD> Orchestrator<F, E, SD>
where
    F: WorkerFactory,
    E: PhaseExecutor<Token = F::Token>,
    SD: ShutdownSignal,
{
    pub fn new(factory: F, executor: E, shutdown: SD) -> Self {
        Self {
            factory,
            executor,
            shutdown,
        }
    }

    /// Runs both stages: counting into `table`, then ranking the league
    pub async fn run<T: CountTable>(
        &mut self,
        config: &PipelineConfig,
        splits: Vec<CorpusSplit>,
        table: T,
    ) -> Result<Vec<RankedEntry>> {
        info!("=== ORCHESTRATOR STARTED ===");

        self.count_links(config, splits, &table).await?;
        let ranking = self.rank_league(config, &table).await?;

        info!("=== ORCHESTRATOR FINISHED ===");
        Ok(ranking)
    }

    /// Stage 1: counts how often every page is linked to and commits the
    /// counts to `table`, replacing whatever a previous run left there
    pub async fn count_links<T: CountTable>(
        &mut self,
        config: &PipelineConfig,
        splits: Vec<CorpusSplit>,
        table: &T,
    ) -> Result<()> {
        let partitioner = HashPartitioner::new(config.num_partitions)?;
        table.reset()?;
        let shuffle = LocalShuffleStore::new();

        // MAP PHASE - Parse splits and shuffle partial counts by partition
        info!("=== MAP PHASE ===");
        let mappers = self.create_workers(
            config.num_mappers,
            LinkCountMapTask::new(partitioner, shuffle.clone(), self.shutdown.clone()),
        );
        self.executor.execute(Phase::Map, mappers, splits).await?;

        // REDUCE PHASE - Fold each partition into the count table
        info!("=== REDUCE PHASE ===");
        let reducers = self.create_workers(
            config.num_reducers,
            LinkCountReduceTask::new(shuffle, table.clone()),
        );
        let assignments = (0..config.num_partitions)
            .map(|partition| PartitionAssignment { partition })
            .collect();
        self.executor
            .execute(Phase::Reduce, reducers, assignments)
            .await
    }

    /// Stage 2: ranks the league members found in `table`
    pub async fn rank_league<T: CountTable>(
        &mut self,
        config: &PipelineConfig,
        table: &T,
    ) -> Result<Vec<RankedEntry>> {
        let league = Arc::new(LeagueSet::load(config.league_path()?)?);
        info!("Loaded {} league members", league.len());

        // FILTER PHASE - Keep league members of every partition
        info!("=== FILTER PHASE ===");
        let collector = CandidateCollector::new();
        let filters = self.create_workers(
            config.num_filters,
            LeagueFilterTask::new(table.clone(), league, collector.clone()),
        );
        let assignments = table
            .partitions()?
            .into_iter()
            .map(|partition| PartitionAssignment { partition })
            .collect();
        self.executor
            .execute(Phase::Filter, filters, assignments)
            .await?;

        // RANK - Single global merge once every candidate is known
        info!("=== RANK PHASE ===");
        let ranking = assign_ranks(collector.take_all(), config.rank_order);
        info!(
            "Ranked {} league members ({} order)",
            ranking.len(),
            config.rank_order
        );
        Ok(ranking)
    }

    fn create_workers<T: PhaseTask>(&mut self, count: usize, task: T) -> Vec<F::Spawned<T>> {
        (0..count)
            .map(|id| self.factory.create_worker(id, task.clone()))
            .collect()
    }
}
