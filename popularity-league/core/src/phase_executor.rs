// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;

use crate::error::Result;
use crate::types::Phase;
use crate::worker::Worker;

/// Trait for executing a phase (map, reduce or filter)
/// This abstracts the entire work distribution pattern:
/// - Setting up completion signaling
/// - Initial work assignment
/// - Dynamic reassignment as workers complete
/// - Aborting the phase on the first failure
/// - Worker shutdown
pub trait PhaseExecutor {
    /// Completion token type the executor hands to workers
    type Token: Clone + Send;

    /// Execute a phase by distributing assignments to workers
    /// Returns only after every worker has been shut down
    fn execute<W>(
        &mut self,
        phase: Phase,
        workers: Vec<W>,
        assignments: Vec<W::Assignment>,
    ) -> impl Future<Output = Result<()>>
    where
        W: Worker<Completion = Self::Token>;
}
