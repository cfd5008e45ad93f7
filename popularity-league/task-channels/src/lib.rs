// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod channel_completion_signaling;
pub mod channel_worker_factory;
pub mod channel_wrappers;
pub mod pipeline;
pub mod tokio_runtime;

pub use pipeline::{run_pipeline, RunSummary};
pub use tokio_runtime::TokenShutdownSignal;
