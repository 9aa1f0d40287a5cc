//! Error taxonomy for the simulation library.

use std::collections::TryReserveError;

/// Everything that can stop a simulation from being built or advanced.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("failed to allocate {what} for {count} bodies")]
    Allocation {
        what: &'static str,
        count: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn worker {worker}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("worker {worker} failed on bodies [{start}, {end}): {message}")]
    WorkerFailed {
        worker: usize,
        start: usize,
        end: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SimError>;
