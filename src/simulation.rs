//! The step loop: clear forces, partition, dispatch and join the workers,
//! then integrate. Steps run strictly one after another.

use std::time::{Duration, Instant};

use log::{info, trace};

use crate::array_body::{fill_random, Body};
use crate::buffers::SimBuffers;
use crate::config::SimConfig;
use crate::dispatch::{check_outcomes, Dispatcher};
use crate::error::{Result, SimError};
use crate::force::{evaluate, ForceParams};
use crate::integrator::integrate;
use crate::partition::partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Initializing,
    Stepping(usize),
    Finalizing,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub n: usize,
    pub steps: usize,
    pub workers: usize,
    pub elapsed: Duration,
    /// Body state after the last step.
    pub bodies: Vec<Body>,
}

pub struct Simulation {
    config: SimConfig,
    buffers: SimBuffers,
    dispatcher: Dispatcher,
    state: SimState,
    steps_done: usize,
}

fn check_bodies(bodies: &[Body]) -> Result<()> {
    for (i, b) in bodies.iter().enumerate() {
        if !(b.mass.is_finite() && b.mass > 0.0) {
            return Err(SimError::InvalidConfig(format!("body {} has mass {}, must be finite and positive", i, b.mass)));
        }
        if ![b.x, b.y, b.vx, b.vy].iter().all(|v| v.is_finite()) {
            return Err(SimError::InvalidConfig(format!("body {} has a non-finite position or velocity", i)));
        }
    }
    Ok(())
}

impl Simulation {
    /// Builds a simulation over the given initial state. Every body needs a
    /// finite position and velocity and a finite mass above zero.
    pub fn new(bodies: Vec<Body>, config: SimConfig) -> Result<Self> {
        config.validate()?;
        check_bodies(&bodies)?;
        let buffers = SimBuffers::from_bodies(bodies)?;
        Self::with_buffers(buffers, config)
    }

    /// Allocates `n` bodies and fills them from `config.seed`, or from
    /// entropy when no seed is set.
    pub fn random(n: usize, config: SimConfig) -> Result<Self> {
        if n == 0 {
            return Err(SimError::InvalidConfig("particle count must be positive".to_string()));
        }
        config.validate()?;
        let mut buffers = SimBuffers::allocate(n)?;
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        fill_random(buffers.bodies_mut(), &mut rng);
        Self::with_buffers(buffers, config)
    }

    fn with_buffers(buffers: SimBuffers, config: SimConfig) -> Result<Self> {
        let workers = config.effective_workers(buffers.len());
        let dispatcher = Dispatcher::new(config.backend, workers)?;
        Ok(Simulation {
            config,
            buffers,
            dispatcher,
            state: SimState::Initializing,
            steps_done: 0,
        })
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    pub fn bodies(&self) -> &[Body] {
        self.buffers.bodies()
    }

    pub fn workers(&self) -> usize {
        self.config.effective_workers(self.buffers.len())
    }

    /// Advances one step. Integration only starts after every worker of
    /// this step has joined.
    pub fn step(&mut self) -> Result<()> {
        self.state = SimState::Stepping(self.steps_done);
        self.buffers.clear_forces();

        let n = self.buffers.len();
        let ranges = partition(n, self.workers());
        let params = ForceParams {
            g: self.config.g,
            softening: self.config.softening,
        };

        let (bodies, forces) = self.buffers.force_phase();
        let outcomes = self.dispatcher.run(&ranges, forces, |range, out| {
            evaluate(range, bodies, out, params)
        })?;
        check_outcomes(&outcomes, self.config.worker_failure)?;

        let (bodies, forces) = self.buffers.integrate_phase();
        integrate(bodies, forces, self.config.dt);

        self.steps_done += 1;
        trace!("step {} done", self.steps_done);
        Ok(())
    }

    /// Runs the configured number of steps, timing only the step loop, then
    /// releases the force buffer and hands back the final bodies.
    pub fn run(mut self) -> Result<RunReport> {
        let n = self.buffers.len();
        let workers = self.workers();
        info!(
            "running {} bodies for {} steps on {} workers ({:?})",
            n,
            self.config.steps,
            workers,
            self.dispatcher.backend()
        );

        let start = Instant::now();
        for _ in 0..self.config.steps {
            self.step()?;
        }
        let elapsed = start.elapsed();

        self.state = SimState::Finalizing;
        info!("finished {} steps in {:.6} s", self.steps_done, elapsed.as_secs_f64());

        let steps = self.steps_done;
        let bodies = self.buffers.into_bodies();
        Ok(RunReport { n, steps, workers, elapsed, bodies })
    }
}
