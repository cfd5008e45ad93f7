// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::phase_task::PhaseTask;
use crate::worker::Worker;

/// Trait for creating workers that run a phase task over a concrete transport
pub trait WorkerFactory: Send {
    /// Completion token type of every worker this factory creates
    type Token: Clone + Send;

    type Spawned<T: PhaseTask>: Worker<Assignment = T::Assignment, Completion = Self::Token>;

    fn create_worker<T: PhaseTask>(&mut self, id: usize, task: T) -> Self::Spawned<T>;
}
