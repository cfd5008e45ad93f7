// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};

use crate::error::{LeagueError, Result, WorkerFailure};
use crate::phase_task::PhaseTask;
use crate::shutdown_signal::ShutdownSignal;
use crate::work_channel::WorkChannel;
use crate::worker::Worker;
use crate::worker_io::{AsyncCompletionSender, AsyncWorkReceiver};
use crate::worker_runtime::WorkerRuntime;

/// Worker that runs a phase task for every assignment it receives
/// Generic over the task, the work channel, the runtime and the completion sender
pub struct StandardWorker<T, W, R, C>
where
    R: WorkerRuntime,
{
    id: usize,
    channel: W,
    handle: R::Handle,
    _marker: PhantomData<fn() -> (T, C)>,
}

impl<T, W, R, C> StandardWorker<T, W, R, C>
where
    T: PhaseTask,
    W: WorkChannel<T::Assignment, C>,
    R: WorkerRuntime,
    C: AsyncCompletionSender + 'static,
{
    /// Spawns the worker loop on the runtime
    /// `channel` and `receiver` are the two ends of this worker's work channel
    pub fn spawn<Rx, SD>(id: usize, task: T, channel: W, receiver: Rx, shutdown: SD) -> Self
    where
        Rx: AsyncWorkReceiver<T::Assignment, C> + 'static,
        SD: ShutdownSignal,
    {
        let handle = R::spawn(move || run_worker(id, task, receiver, shutdown));
        Self {
            id,
            channel,
            handle,
            _marker: PhantomData,
        }
    }
}

impl<T, W, R, C> Worker for StandardWorker<T, W, R, C>
where
    T: PhaseTask,
    W: WorkChannel<T::Assignment, C>,
    R: WorkerRuntime,
    C: AsyncCompletionSender + 'static,
{
    type Assignment = T::Assignment;
    type Completion = C;

    fn send_work(&self, assignment: Self::Assignment, completion: Self::Completion) -> bool {
        self.channel.send_work(assignment, completion)
    }

    fn shutdown(self) -> impl Future<Output = Result<()>> + Send {
        let Self {
            id, channel, handle, ..
        } = self;
        // Closing the work channel ends the worker loop
        drop(channel);
        async move {
            R::join(handle)
                .await
                .map_err(|e| LeagueError::WorkerPanicked(format!("worker {}: {}", id, e)))
        }
    }
}

async fn run_worker<T, Rx, C, SD>(id: usize, task: T, mut receiver: Rx, shutdown: SD)
where
    T: PhaseTask,
    Rx: AsyncWorkReceiver<T::Assignment, C>,
    C: AsyncCompletionSender,
    SD: ShutdownSignal,
{
    debug!("Worker {} started", id);

    while let Some((assignment, completion)) = receiver.recv().await {
        let result = if shutdown.is_cancelled() {
            Err(LeagueError::Cancelled)
        } else {
            run_task(&task, id, assignment)
        };

        let report = result
            .map(|()| id)
            .map_err(|error| WorkerFailure::new(id, error));
        if !completion.send(report).await {
            warn!("Worker {} could not report completion, stopping", id);
            break;
        }
    }

    debug!("Worker {} stopped", id);
}

/// A panicking task must still produce a report, or the executor would wait forever
fn run_task<T: PhaseTask>(task: &T, id: usize, assignment: T::Assignment) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(|| task.run(id, assignment)))
        .unwrap_or_else(|payload| Err(LeagueError::WorkerPanicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
