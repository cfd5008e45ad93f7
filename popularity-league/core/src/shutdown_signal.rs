// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for shutdown signaling shared by the executor and every worker
pub trait ShutdownSignal: Clone + Send + Sync + 'static {
    fn is_cancelled(&self) -> bool;

    /// Ask every holder of the signal to stop taking work
    fn shutdown(&self);
}

/// Shutdown signal backed by a shared atomic flag
#[derive(Clone, Default)]
pub struct FlagShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl FlagShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShutdownSignal for FlagShutdownSignal {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}
