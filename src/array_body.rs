use crate::config::{MASS_RANGE, POS_RANGE, VEL_RANGE};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
  pub x: f64,
  pub y: f64,
  pub vx: f64,
  pub vy: f64,
  pub mass: f64
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Force {
  pub fx: f64,
  pub fy: f64
}

impl Body {
  pub fn new(x: f64, y: f64, vx: f64, vy: f64, mass: f64) -> Self {
    Body { x, y, vx, vy, mass }
  }
}

fn uniform(rng: &mut fastrand::Rng, (min, max): (f64, f64)) -> f64 {
  min + (max - min) * rng.f64()
}

/// Overwrites every slot with a random body: position in [-1,1]^2,
/// velocity in [-0.1,0.1]^2, mass in [0.5,5.0].
pub fn fill_random(bodies: &mut [Body], rng: &mut fastrand::Rng) {
  for b in bodies.iter_mut() {
    b.x = uniform(rng, POS_RANGE);
    b.y = uniform(rng, POS_RANGE);
    b.vx = uniform(rng, VEL_RANGE);
    b.vy = uniform(rng, VEL_RANGE);
    b.mass = uniform(rng, MASS_RANGE);
  }
}

pub fn random_bodies(n: usize, seed: u64) -> Vec<Body> {
  let mut rng = fastrand::Rng::with_seed(seed);
  let mut bodies = vec![Body::default(); n];
  fill_random(&mut bodies, &mut rng);
  bodies
}

/// Two bodies at rest on the x axis, `d` apart, the first at the origin.
pub fn two_bodies(d: f64, m1: f64, m2: f64) -> Vec<Body> {
  vec![
    Body::new(0.0, 0.0, 0.0, 0.0, m1),
    Body::new(d, 0.0, 0.0, 0.0, m2),
  ]
}

pub fn distance_sqr(b1: &Body, b2: &Body) -> f64 {
  let dx = b1.x - b2.x;
  let dy = b1.y - b2.y;
  dx*dx + dy*dy
}

pub fn calc_kinetic_energy(bodies: &[Body]) -> f64 {
  bodies.iter().fold(0.0, |ke, b| {
    ke + 0.5 * b.mass * (b.vx * b.vx + b.vy * b.vy)
  })
}

// Softened the same way as the force law so the pair sums stay consistent.
pub fn calc_potential_energy(bodies: &[Body], g: f64, softening: f64) -> f64 {
  let eps2 = softening * softening;
  let mut pe = 0.0;
  for i in 0..bodies.len() {
    for j in (i + 1)..bodies.len() {
      let dist = f64::sqrt(distance_sqr(&bodies[i], &bodies[j]) + eps2);
      pe -= g * bodies[i].mass * bodies[j].mass / dist;
    }
  }
  pe
}

pub fn calc_total_energy(bodies: &[Body], g: f64, softening: f64) -> f64 {
  calc_kinetic_energy(bodies) + calc_potential_energy(bodies, g, softening)
}

pub fn calc_total_momentum(bodies: &[Body]) -> [f64; 2] {
  bodies.iter().fold([0.0, 0.0], |p, b| {
    [p[0] + b.mass * b.vx, p[1] + b.mass * b.vy]
  })
}

pub fn calc_center_of_mass(bodies: &[Body]) -> [f64; 2] {
  let mut m = 0.0;
  let mut cm = [0.0, 0.0];
  for b in bodies {
    m += b.mass;
    cm[0] += b.mass * b.x;
    cm[1] += b.mass * b.y;
  }
  if m > 0.0 {
    cm[0] /= m;
    cm[1] /= m;
  }
  cm
}
