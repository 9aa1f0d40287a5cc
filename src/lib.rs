pub mod array_body;
pub mod buffers;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod force;
pub mod integrator;
pub mod partition;
pub mod simulation;

pub use array_body::{Body, Force};
pub use config::{Backend, SimConfig, WorkerFailure};
pub use error::{Result, SimError};
pub use simulation::{RunReport, SimState, Simulation};
