// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod completion_signaling;
pub mod config;
pub mod corpus;
pub mod count_aggregator;
pub mod count_table;
pub mod dynamic_phase_executor;
pub mod error;
pub mod flat_file_count_table;
pub mod league;
pub mod league_filter;
pub mod orchestrator;
pub mod output;
pub mod partitioner;
pub mod phase_executor;
pub mod phase_task;
pub mod rank_assigner;
pub mod record_parser;
pub mod shuffle;
pub mod shutdown_signal;
pub mod sled_count_table;
pub mod standard_worker;
pub mod types;
pub mod work_channel;
pub mod worker;
pub mod worker_factory;
pub mod worker_io;
pub mod worker_runtime;

pub use config::{CountTableBackend, PipelineConfig};
pub use error::{LeagueError, Result, WorkerFailure};
pub use rank_assigner::RankOrder;
pub use types::{CountEntry, PageId, Phase, RankedEntry, RecordLocation, ScoredCandidate};
