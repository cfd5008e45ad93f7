// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;

use crate::error::WorkerFailure;

/// Trait for abstracting completion signaling mechanisms
pub trait CompletionSignaling: Send {
    /// The token type passed to workers for signaling completion
    type Token: Clone + Send;

    /// Setup completion signaling for N workers
    fn setup(num_workers: usize) -> Self;

    /// Get the completion token for a specific worker
    fn get_token(&self, worker_id: usize) -> Self::Token;

    /// Wait for the next worker to complete or fail
    /// Returns Ok(worker_id) on success, Err(failure) on failure
    /// Returns None if no worker can signal anymore
    fn wait_next(&mut self) -> impl Future<Output = Option<Result<usize, WorkerFailure>>> + Send;
}
