//! Simulation constants and the runtime configuration built from them.
//!
//! The physical parameters are fixed for a run of the binary; only the
//! worker count, the parallel backend, the failure policy and the seed are
//! meant to be chosen by the caller.

use crate::error::{Result, SimError};

pub const N_STEPS: usize = 1000;
pub const DT: f64 = 0.01;
pub const G: f64 = 1.0;
pub const SOFTENING: f64 = 1e-3;

// Initial state ranges
pub const POS_RANGE: (f64, f64) = (-1.0, 1.0);
pub const VEL_RANGE: (f64, f64) = (-0.1, 0.1);
pub const MASS_RANGE: (f64, f64) = (0.5, 5.0);

/// How a step's workers are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// One task per partition on a rayon pool sized to the worker count.
    #[default]
    Rayon,
    /// One fresh OS thread per partition, spawned and joined every step.
    Threads,
}

/// What the driver does when a worker panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerFailure {
    /// Log the failure and integrate with that slice's forces reset to zero.
    #[default]
    Ignore,
    /// Stop the run with `SimError::WorkerFailed`.
    Fatal,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub steps: usize,
    pub dt: f64,
    pub g: f64,
    pub softening: f64,
    pub workers: usize,
    pub backend: Backend,
    pub worker_failure: WorkerFailure,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            steps: N_STEPS,
            dt: DT,
            g: G,
            softening: SOFTENING,
            workers: default_workers(),
            backend: Backend::default(),
            worker_failure: WorkerFailure::default(),
            seed: None,
        }
    }
}

/// Host parallelism, never less than one.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

impl SimConfig {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_worker_failure(mut self, policy: WorkerFailure) -> Self {
        self.worker_failure = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Worker count for `n` bodies, clamped to `[1, n]`.
    pub fn effective_workers(&self, n: usize) -> usize {
        self.workers.clamp(1, n.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() {
            return Err(SimError::InvalidConfig(format!("dt must be finite, got {}", self.dt)));
        }
        if !self.g.is_finite() {
            return Err(SimError::InvalidConfig(format!("G must be finite, got {}", self.g)));
        }
        if !self.softening.is_finite() || self.softening < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "softening must be finite and non-negative, got {}",
                self.softening
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.steps, 1000);
        assert_eq!(cfg.dt, 0.01);
        assert_eq!(cfg.g, 1.0);
        assert_eq!(cfg.softening, 1e-3);
        assert!(cfg.workers >= 1);
        assert_eq!(cfg.backend, Backend::Rayon);
        assert_eq!(cfg.worker_failure, WorkerFailure::Ignore);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn workers_clamped_to_body_count() {
        let cfg = SimConfig::default().with_workers(16);
        assert_eq!(cfg.effective_workers(3), 3);
        assert_eq!(cfg.effective_workers(100), 16);
        let cfg = cfg.with_workers(0);
        assert_eq!(cfg.effective_workers(10), 1);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(SimConfig::default().with_dt(f64::NAN).validate().is_err());
        assert!(SimConfig::default().with_g(f64::INFINITY).validate().is_err());
        assert!(SimConfig::default().with_softening(-1.0).validate().is_err());
    }
}
