use crate::array_body::{Body, Force};

/// Semi-implicit Euler: the velocity is kicked with this step's force, then
/// the position drifts with the new velocity.
pub fn integrate(bodies: &mut [Body], forces: &[Force], dt: f64) {
    assert_eq!(bodies.len(), forces.len());
    for (b, f) in bodies.iter_mut().zip(forces.iter()) {
        let ax = f.fx / b.mass;
        let ay = f.fy / b.mass;

        // Update velocity first (using old position)
        b.vx += ax * dt;
        b.vy += ay * dt;

        // Then update position (using new velocity)
        b.x += b.vx * dt;
        b.y += b.vy * dt;
    }
}
