// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use popularity_league_core::error::WorkerFailure;
use popularity_league_core::work_channel::WorkChannel;
use popularity_league_core::worker_io::{AsyncCompletionSender, AsyncWorkReceiver};
use tokio::sync::mpsc;

/// Receiving end of a worker's work channel
pub struct ChannelWorkReceiver<A, C> {
    pub rx: mpsc::UnboundedReceiver<(A, C)>,
}

#[async_trait]
impl<A, C> AsyncWorkReceiver<A, C> for ChannelWorkReceiver<A, C>
where
    A: Send,
    C: Send,
{
    async fn recv(&mut self) -> Option<(A, C)> {
        self.rx.recv().await
    }
}

/// Sending end of a worker's work channel, kept by the worker handle
pub struct ChannelWorkChannel<A, C> {
    tx: mpsc::UnboundedSender<(A, C)>,
}

impl<A, C> ChannelWorkChannel<A, C> {
    pub fn new(tx: mpsc::UnboundedSender<(A, C)>) -> Self {
        Self { tx }
    }
}

impl<A, C> WorkChannel<A, C> for ChannelWorkChannel<A, C>
where
    A: Send + 'static,
    C: Send + 'static,
{
    fn send_work(&self, assignment: A, completion: C) -> bool {
        self.tx.send((assignment, completion)).is_ok()
    }
}

/// Both ends of a fresh work channel
pub fn work_channel<A, C>() -> (ChannelWorkChannel<A, C>, ChannelWorkReceiver<A, C>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelWorkChannel::new(tx), ChannelWorkReceiver { rx })
}

#[derive(Clone)]
pub struct ChannelCompletionSender {
    pub tx: mpsc::Sender<Result<usize, WorkerFailure>>,
}

#[async_trait]
impl AsyncCompletionSender for ChannelCompletionSender {
    async fn send(&self, result: Result<usize, WorkerFailure>) -> bool {
        self.tx.send(result).await.is_ok()
    }
}
