// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;

use popularity_league_core::shutdown_signal::ShutdownSignal;
use popularity_league_core::worker_runtime::WorkerRuntime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Tokio task-based runtime
pub struct TokioRuntime;

impl WorkerRuntime for TokioRuntime {
    type Handle = JoinHandle<()>;
    type Error = tokio::task::JoinError;

    fn spawn<F, Fut>(f: F) -> Self::Handle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(f())
    }

    fn join(handle: Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send {
        handle
    }
}

/// Tokio CancellationToken-based shutdown signal
#[derive(Clone, Default)]
pub struct TokenShutdownSignal {
    token: CancellationToken,
}

impl TokenShutdownSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl ShutdownSignal for TokenShutdownSignal {
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn shutdown(&self) {
        self.token.cancel();
    }
}
