// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{PageId, Phase, RecordLocation};

pub type Result<T> = std::result::Result<T, LeagueError>;

/// Every way a run can fail. None of them is retried: the whole run aborts.
#[derive(Debug, Error)]
pub enum LeagueError {
    /// A token where an integer was expected
    #[error("{location}: malformed integer {token:?}")]
    Parse {
        location: RecordLocation,
        token: String,
    },

    /// Corpus, league, work directory or output could not be read or written
    #[error("cannot access {role} at {}: {source}", path.display())]
    MissingResource {
        role: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A popularity count no longer fits the score width
    #[error("popularity count of page {id} overflowed")]
    Overflow { id: PageId },

    /// Count table backend failure
    #[error("count table error: {0}")]
    CountTable(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("run cancelled")]
    Cancelled,

    /// A worker failed while processing an assignment of the given phase
    #[error("{phase} phase failed on worker {worker_id}: {source}")]
    PhaseFailed {
        phase: Phase,
        worker_id: usize,
        #[source]
        source: Box<LeagueError>,
    },
}

impl LeagueError {
    pub fn missing(role: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LeagueError::MissingResource {
            role,
            path: path.into(),
            source,
        }
    }

    pub fn parse(location: RecordLocation, token: impl Into<String>) -> Self {
        LeagueError::Parse {
            location,
            token: token.into(),
        }
    }
}

impl From<sled::Error> for LeagueError {
    fn from(err: sled::Error) -> Self {
        LeagueError::CountTable(err.to_string())
    }
}

/// Failure report a worker sends back instead of a completion
#[derive(Debug)]
pub struct WorkerFailure {
    pub worker_id: usize,
    pub error: LeagueError,
}

impl WorkerFailure {
    pub fn new(worker_id: usize, error: LeagueError) -> Self {
        Self { worker_id, error }
    }

    pub fn into_phase_error(self, phase: Phase) -> LeagueError {
        LeagueError::PhaseFailed {
            phase,
            worker_id: self.worker_id,
            source: Box::new(self.error),
        }
    }
}
