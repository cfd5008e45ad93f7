// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};
use popularity_league_core::{CountTableBackend, PipelineConfig, RankOrder, Result};
use popularity_league_task_channels::{run_pipeline, RunSummary, TokenShutdownSignal};
use tokio_util::sync::CancellationToken;

const DEFAULT_CONFIG: &str = "config.json";

/// Ranks the pages of a league by how often a link corpus references them
#[derive(Parser, Debug)]
#[command(name = "popularity-league", version)]
struct Cli {
    /// Corpus file, or directory of corpus files
    input: PathBuf,

    /// Where the ranking is written
    output: PathBuf,

    /// JSON configuration file [default: config.json when present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// League file, one page identifier per line
    #[arg(long)]
    league: Option<PathBuf>,

    /// Directory holding the intermediate count table
    #[arg(long)]
    work_dir: Option<PathBuf>,

    #[arg(long)]
    mappers: Option<usize>,

    #[arg(long)]
    reducers: Option<usize>,

    #[arg(long)]
    partitions: Option<usize>,

    #[arg(long)]
    filters: Option<usize>,

    /// Corpus lines per map assignment
    #[arg(long)]
    split_size: Option<usize>,

    /// ascending or descending
    #[arg(long)]
    order: Option<RankOrder>,

    /// flat-file or sled
    #[arg(long)]
    count_table: Option<CountTableBackend>,
}

impl Cli {
    fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG).exists() => {
                PipelineConfig::load(Path::new(DEFAULT_CONFIG))?
            }
            None => {
                warn!("No {} found, using default configuration", DEFAULT_CONFIG);
                PipelineConfig::default()
            }
        };

        if let Some(league) = &self.league {
            config.league_path = Some(league.clone());
        }
        if let Some(work_dir) = &self.work_dir {
            config.work_dir = work_dir.clone();
        }
        if let Some(mappers) = self.mappers {
            config.num_mappers = mappers;
        }
        if let Some(reducers) = self.reducers {
            config.num_reducers = reducers;
        }
        if let Some(partitions) = self.partitions {
            config.num_partitions = partitions;
        }
        if let Some(filters) = self.filters {
            config.num_filters = filters;
        }
        if let Some(split_size) = self.split_size {
            config.split_size = split_size;
        }
        if let Some(order) = self.order {
            config.rank_order = order;
        }
        if let Some(count_table) = self.count_table {
            config.count_table = count_table;
        }
        Ok(config)
    }
}

fn log_config(config: &PipelineConfig) {
    info!("=== POPULARITY LEAGUE ===");
    info!("Configuration:");
    if let Some(league) = &config.league_path {
        info!("  - League: {}", league.display());
    }
    info!("  - Work dir: {}", config.work_dir.display());
    info!("  - Split size: {}", config.split_size);
    info!("  - Mappers: {}", config.num_mappers);
    info!("  - Reducers: {}", config.num_reducers);
    info!("  - Partitions: {}", config.num_partitions);
    info!("  - Filters: {}", config.num_filters);
    info!("  - Count table: {}", config.count_table);
    info!("  - Rank order: {}", config.rank_order);
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let config = cli.load_config()?;
    log_config(&config);

    let cancel_token = CancellationToken::new();
    let shutdown = TokenShutdownSignal::new(cancel_token.clone());

    // Setup Ctrl+C handler
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("=== Ctrl+C received, initiating shutdown ===");
                cancel_token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    run_pipeline(&config, &cli.input, &cli.output, shutdown).await
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start_time = Instant::now();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(summary) => {
            info!("=== PROGRAM COMPLETE ===");
            info!(
                "Ranked {} league members from {} splits in {:.2?}",
                summary.ranked,
                summary.splits,
                start_time.elapsed()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
