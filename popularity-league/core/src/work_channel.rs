// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Trait for abstracting work assignment channels
pub trait WorkChannel<A, C>: Send + 'static {
    /// Send work assignment with completion token
    /// Returns false if the worker is no longer listening
    fn send_work(&self, assignment: A, completion: C) -> bool;
}
