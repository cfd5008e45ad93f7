// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Result;

/// Trait for the unit of work a worker runs for every assignment of a phase
/// Tasks are cloned into every worker, so any shared state must be shared by handle
pub trait PhaseTask: Clone + Send + Sync + 'static {
    type Assignment: Send + 'static;

    fn run(&self, worker_id: usize, assignment: Self::Assignment) -> Result<()>;
}
