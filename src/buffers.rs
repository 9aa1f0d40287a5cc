//! The Body Store and Force Buffer, allocated together once per run.
//!
//! `SimBuffers` is the single owner of both arrays. During the parallel
//! phase it hands out a shared `&[Body]` and a `&mut [Force]` that the
//! dispatcher splits into per-worker slices; during integration it hands out
//! the reverse. Both arrays have exactly `n` slots for the whole run and are
//! freed when the arena is dropped, on the success and the error path alike.

use std::mem::size_of;

use log::debug;

use crate::array_body::{Body, Force};
use crate::error::{Result, SimError};

pub struct SimBuffers {
    bodies: Vec<Body>,
    forces: Vec<Force>,
}

fn reserve<T: Clone + Default>(what: &'static str, n: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|source| SimError::Allocation { what, count: n, source })?;
    v.resize(n, T::default());
    Ok(v)
}

impl SimBuffers {
    /// Reserves `n` zeroed bodies and `n` zeroed forces.
    pub fn allocate(n: usize) -> Result<Self> {
        let bodies = reserve::<Body>("body store", n)?;
        let forces = reserve::<Force>("force buffer", n)?;
        debug!(
            "allocated buffers for {} bodies ({} + {} bytes)",
            n,
            n * size_of::<Body>(),
            n * size_of::<Force>()
        );
        Ok(SimBuffers { bodies, forces })
    }

    /// Takes ownership of an initial state and allocates a matching force buffer.
    pub fn from_bodies(bodies: Vec<Body>) -> Result<Self> {
        let forces = reserve::<Force>("force buffer", bodies.len())?;
        debug!("allocated force buffer for {} bodies", bodies.len());
        Ok(SimBuffers { bodies, forces })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    pub fn clear_forces(&mut self) {
        self.forces.fill(Force::default());
    }

    /// View for the parallel phase: bodies read-only, forces writable.
    pub fn force_phase(&mut self) -> (&[Body], &mut [Force]) {
        (&self.bodies, &mut self.forces)
    }

    /// View for integration: bodies writable, forces read-only.
    pub fn integrate_phase(&mut self) -> (&mut [Body], &[Force]) {
        (&mut self.bodies, &self.forces)
    }

    pub fn into_bodies(mut self) -> Vec<Body> {
        std::mem::take(&mut self.bodies)
    }

    fn release_summary(&self) -> String {
        if self.bodies.is_empty() && !self.forces.is_empty() {
            format!("released force buffer ({} slots), body store handed off", self.forces.len())
        } else {
            format!(
                "released buffers ({} body slots, {} force slots)",
                self.bodies.len(),
                self.forces.len()
            )
        }
    }
}

impl Drop for SimBuffers {
    fn drop(&mut self) {
        debug!("{}", self.release_summary());
    }
}
