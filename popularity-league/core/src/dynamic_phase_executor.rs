// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::marker::PhantomData;

use log::{debug, error, info, warn};

use crate::completion_signaling::CompletionSignaling;
use crate::error::{LeagueError, Result};
use crate::phase_executor::PhaseExecutor;
use crate::shutdown_signal::ShutdownSignal;
use crate::types::Phase;
use crate::worker::Worker;

/// Hands one assignment to every idle worker and a new one whenever a worker
/// completes, until the assignments run out
///
/// The first failure stops all further assignment and triggers the shutdown
/// signal; the phase still waits for in-flight work before returning the error.
pub struct DynamicPhaseExecutor<CS, SD> {
    shutdown: SD,
    _signaling: PhantomData<fn() -> CS>,
}

impl<CS, SD> DynamicPhaseExecutor<CS, SD>
where
    CS: CompletionSignaling,
    SD: ShutdownSignal,
{
    pub fn new(shutdown: SD) -> Self {
        Self {
            shutdown,
            _signaling: PhantomData,
        }
    }
}

fn unreachable_worker(worker_id: usize) -> LeagueError {
    LeagueError::WorkerPanicked(format!("worker {} stopped accepting work", worker_id))
}

impl<CS, SD> PhaseExecutor for DynamicPhaseExecutor<CS, SD>
where
    CS: CompletionSignaling,
    SD: ShutdownSignal,
{
    type Token = CS::Token;

    async fn execute<W>(
        &mut self,
        phase: Phase,
        workers: Vec<W>,
        assignments: Vec<W::Assignment>,
    ) -> Result<()>
    where
        W: Worker<Completion = Self::Token>,
    {
        let total = assignments.len();
        if total > 0 && workers.is_empty() {
            return Err(LeagueError::Configuration(format!(
                "no workers available for the {} phase",
                phase
            )));
        }

        info!(
            "Distributing {} {} assignments to {} workers...",
            total,
            phase,
            workers.len()
        );

        let mut signaling = CS::setup(workers.len());
        let mut pending = assignments.into_iter();
        let mut active = 0;
        let mut completed = 0;
        let mut failure: Option<LeagueError> = None;

        if self.shutdown.is_cancelled() {
            failure = Some(LeagueError::Cancelled);
        } else {
            // Assign initial work to all workers
            for (worker_id, worker) in workers.iter().enumerate() {
                let Some(assignment) = pending.next() else {
                    break;
                };
                if !worker.send_work(assignment, signaling.get_token(worker_id)) {
                    failure = Some(unreachable_worker(worker_id));
                    break;
                }
                active += 1;
            }
        }

        // As workers complete, assign them more work
        while active > 0 {
            match signaling.wait_next().await {
                Some(Ok(worker_id)) => {
                    active -= 1;
                    completed += 1;
                    debug!(
                        "Worker {} completed a {} assignment ({}/{})",
                        worker_id, phase, completed, total
                    );

                    if failure.is_some() {
                        continue;
                    }
                    if self.shutdown.is_cancelled() {
                        failure = Some(LeagueError::Cancelled);
                        continue;
                    }
                    let Some(assignment) = pending.next() else {
                        continue;
                    };
                    let sent = workers.get(worker_id).is_some_and(|worker| {
                        worker.send_work(assignment, signaling.get_token(worker_id))
                    });
                    if sent {
                        active += 1;
                    } else {
                        failure = Some(unreachable_worker(worker_id));
                    }
                }
                Some(Err(worker_failure)) => {
                    active -= 1;
                    if failure.is_some() {
                        continue;
                    }
                    self.shutdown.shutdown();
                    failure = Some(if matches!(worker_failure.error, LeagueError::Cancelled) {
                        LeagueError::Cancelled
                    } else {
                        error!(
                            "Worker {} failed during the {} phase: {}",
                            worker_failure.worker_id, phase, worker_failure.error
                        );
                        worker_failure.into_phase_error(phase)
                    });
                }
                None => {
                    failure.get_or_insert_with(|| {
                        LeagueError::WorkerPanicked(format!(
                            "completion signaling closed during the {} phase",
                            phase
                        ))
                    });
                    break;
                }
            }
        }

        // Wait for all workers to fully shut down
        for worker in workers {
            if let Err(e) = worker.shutdown().await {
                warn!("Worker shutdown failed during the {} phase: {}", phase, e);
                failure.get_or_insert(e);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => {
                info!("All {} {} assignments completed", completed, phase);
                Ok(())
            }
        }
    }
}
