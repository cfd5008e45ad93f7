// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;

use crate::error::Result;

/// Trait for a long-lived worker the executor hands assignments to
pub trait Worker: Send {
    type Assignment: Send + 'static;
    type Completion: Clone + Send;

    /// Queue one assignment; the worker reports through `completion` when done
    /// Returns false if the worker is gone
    fn send_work(&self, assignment: Self::Assignment, completion: Self::Completion) -> bool;

    /// Stop accepting work and wait for the worker to exit
    fn shutdown(self) -> impl Future<Output = Result<()>> + Send;
}
