// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use popularity_league_core::completion_signaling::CompletionSignaling;
use popularity_league_core::error::WorkerFailure;
use tokio::sync::mpsc;

use crate::channel_wrappers::ChannelCompletionSender;

/// mpsc-based completion signaling: every worker reports on one shared channel
pub struct ChannelCompletionSignaling {
    tx: mpsc::Sender<Result<usize, WorkerFailure>>,
    rx: mpsc::Receiver<Result<usize, WorkerFailure>>,
}

impl CompletionSignaling for ChannelCompletionSignaling {
    type Token = ChannelCompletionSender;

    fn setup(num_workers: usize) -> Self {
        let (tx, rx) = mpsc::channel(num_workers.max(1));
        Self { tx, rx }
    }

    fn get_token(&self, _worker_id: usize) -> Self::Token {
        ChannelCompletionSender {
            tx: self.tx.clone(),
        }
    }

    async fn wait_next(&mut self) -> Option<Result<usize, WorkerFailure>> {
        self.rx.recv().await
    }
}
