use approx::assert_relative_eq;

use nbody_simulation_brute::array_body::{self, calc_total_energy, calc_total_momentum, two_bodies, Body};
use nbody_simulation_brute::{Backend, SimConfig, Simulation};

/// Default physics parameters with a short run for tests
fn test_config(steps: usize, workers: usize) -> SimConfig {
    SimConfig::default().with_steps(steps).with_workers(workers)
}

fn run(bodies: Vec<Body>, config: SimConfig) -> Vec<Body> {
    Simulation::new(bodies, config).unwrap().run().unwrap().bodies
}

// ==================================================================================
// Conservation tests
// ==================================================================================

#[test]
fn two_body_momentum_conserved_over_one_step() {
    let mut bodies = two_bodies(0.8, 1.5, 4.0);
    bodies[0].vy = 0.05;
    bodies[1].vy = -0.05 * 1.5 / 4.0;
    let before = calc_total_momentum(&bodies);

    let after = calc_total_momentum(&run(bodies, test_config(1, 2)));

    assert!((after[0] - before[0]).abs() < 1e-12, "px drifted: {:?} -> {:?}", before, after);
    assert!((after[1] - before[1]).abs() < 1e-12, "py drifted: {:?} -> {:?}", before, after);
}

#[test]
fn many_body_momentum_conserved() {
    let bodies = array_body::random_bodies(64, 5);
    let before = calc_total_momentum(&bodies);
    let after = calc_total_momentum(&run(bodies, test_config(20, 4)));
    assert!((after[0] - before[0]).abs() < 1e-6);
    assert!((after[1] - before[1]).abs() < 1e-6);
}

#[test]
fn circular_orbit_energy_bounded() {
    // Equal masses 1 apart: each circles the center at v^2 = G m / (2 d)
    let v = f64::sqrt(0.5);
    let bodies = vec![
        Body::new(-0.5, 0.0, 0.0, -v, 1.0),
        Body::new(0.5, 0.0, 0.0, v, 1.0),
    ];
    let config = test_config(1000, 2);
    let e0 = calc_total_energy(&bodies, config.g, config.softening);

    let end = run(bodies, config.clone());
    let e1 = calc_total_energy(&end, config.g, config.softening);

    assert!(((e1 - e0) / e0).abs() < 3e-2, "energy drift {} -> {}", e0, e1);
    let sep = f64::sqrt(array_body::distance_sqr(&end[0], &end[1]));
    assert!(sep > 0.8 && sep < 1.2, "orbit separation {}", sep);
}

// ==================================================================================
// Single body tests
// ==================================================================================

#[test]
fn lone_body_drifts_linearly() {
    let start = Body::new(0.25, -0.5, 0.03, -0.07, 2.5);
    let steps = 250;
    let config = test_config(steps, 8);
    let dt = config.dt;

    let end = run(vec![start], config)[0];

    assert_eq!(end.vx, start.vx);
    assert_eq!(end.vy, start.vy);
    assert_relative_eq!(end.x, start.x + start.vx * dt * steps as f64, epsilon = 1e-12);
    assert_relative_eq!(end.y, start.y + start.vy * dt * steps as f64, epsilon = 1e-12);
}

// ==================================================================================
// Parallel consistency tests
// ==================================================================================

#[test]
fn worker_count_does_not_change_results() {
    let bodies = array_body::random_bodies(37, 2024);
    let reference = run(bodies.clone(), test_config(15, 1));
    for workers in [2, 3, 5, 37, 100] {
        for backend in [Backend::Rayon, Backend::Threads] {
            let out = run(bodies.clone(), test_config(15, workers).with_backend(backend));
            assert_eq!(out, reference, "{:?} with {} workers diverged", backend, workers);
        }
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let config = test_config(3, 4).with_seed(77);
    let a = Simulation::random(50, config.clone()).unwrap();
    let b = Simulation::random(50, config).unwrap();
    assert_eq!(a.bodies(), b.bodies());
    assert_eq!(a.run().unwrap().bodies, b.run().unwrap().bodies);
}
