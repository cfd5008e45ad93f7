// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use popularity_league_core::phase_task::PhaseTask;
use popularity_league_core::standard_worker::StandardWorker;
use popularity_league_core::worker_factory::WorkerFactory;

use crate::channel_wrappers::{work_channel, ChannelCompletionSender, ChannelWorkChannel};
use crate::tokio_runtime::{TokenShutdownSignal, TokioRuntime};

pub type ChannelWorker<T> = StandardWorker<
    T,
    ChannelWorkChannel<<T as PhaseTask>::Assignment, ChannelCompletionSender>,
    TokioRuntime,
    ChannelCompletionSender,
>;

/// Creates tokio task workers fed through their own mpsc work channel
#[derive(Clone)]
pub struct ChannelWorkerFactory {
    shutdown: TokenShutdownSignal,
}

impl ChannelWorkerFactory {
    pub fn new(shutdown: TokenShutdownSignal) -> Self {
        Self { shutdown }
    }
}

impl WorkerFactory for ChannelWorkerFactory {
    type Token = ChannelCompletionSender;
    type Spawned<T: PhaseTask> = ChannelWorker<T>;

    fn create_worker<T: PhaseTask>(&mut self, id: usize, task: T) -> Self::Spawned<T> {
        let (channel, receiver) = work_channel();
        StandardWorker::spawn(id, task, channel, receiver, self.shutdown.clone())
    }
}
