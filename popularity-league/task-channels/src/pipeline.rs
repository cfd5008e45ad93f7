// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::Path;

use log::info;
use popularity_league_core::config::{CountTableBackend, PipelineConfig};
use popularity_league_core::corpus::read_corpus;
use popularity_league_core::dynamic_phase_executor::DynamicPhaseExecutor;
use popularity_league_core::error::Result;
use popularity_league_core::flat_file_count_table::FlatFileCountTable;
use popularity_league_core::orchestrator::Orchestrator;
use popularity_league_core::output::{clear_output, write_ranking};
use popularity_league_core::sled_count_table::SledCountTable;

use crate::channel_completion_signaling::ChannelCompletionSignaling;
use crate::channel_worker_factory::ChannelWorkerFactory;
use crate::tokio_runtime::TokenShutdownSignal;

pub type ChannelOrchestrator = Orchestrator<
    ChannelWorkerFactory,
    DynamicPhaseExecutor<ChannelCompletionSignaling, TokenShutdownSignal>,
    TokenShutdownSignal,
>;

/// What a successful run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub splits: usize,
    pub ranked: usize,
}

/// Runs both stages on tokio tasks and writes the ranking to `output`
///
/// Any ranking already at `output` is removed first; a new one is written
/// only if both stages succeed.
pub async fn run_pipeline(
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    shutdown: TokenShutdownSignal,
) -> Result<RunSummary> {
    clear_output(output)?;
    config.validate()?;

    let splits = read_corpus(input, config.split_size)?;
    let num_splits = splits.len();
    info!(
        "Partitioned corpus {} into {} splits for {} mappers",
        input.display(),
        num_splits,
        config.num_mappers
    );

    let mut orchestrator: ChannelOrchestrator = Orchestrator::new(
        ChannelWorkerFactory::new(shutdown.clone()),
        DynamicPhaseExecutor::new(shutdown.clone()),
        shutdown,
    );

    let table_path = config.count_table_path();
    let ranking = match config.count_table {
        CountTableBackend::FlatFile => {
            let table = FlatFileCountTable::new(table_path);
            orchestrator.run(config, splits, table).await?
        }
        CountTableBackend::Sled => {
            let table = SledCountTable::open(&table_path)?;
            orchestrator.run(config, splits, table).await?
        }
    };

    write_ranking(output, &ranking)?;
    info!(
        "Wrote {} ranked league members to {}",
        ranking.len(),
        output.display()
    );

    Ok(RunSummary {
        splits: num_splits,
        ranked: ranking.len(),
    })
}
