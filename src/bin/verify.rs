use nbody_simulation_brute::array_body::{self, Body};
use nbody_simulation_brute::config::{default_workers, G, SOFTENING};
use nbody_simulation_brute::{Backend, SimConfig, Simulation};
use std::process::ExitCode;

// Function to compare positions between reference and parallel versions
fn verify_positions(reference: &[Body], parallel: &[Body], tolerance: f64) -> bool {
    if reference.len() != parallel.len() {
        println!("ERROR: Body count mismatch: {} vs {}", reference.len(), parallel.len());
        return false;
    }

    let mut max_diff = 0.0;
    let mut avg_diff = 0.0;
    let mut diff_count = 0;

    for (i, (r, p)) in reference.iter().zip(parallel.iter()).enumerate() {
        for (d, diff) in [(r.x - p.x).abs(), (r.y - p.y).abs()].into_iter().enumerate() {
            max_diff = f64::max(max_diff, diff);
            avg_diff += diff;

            if diff > tolerance {
                diff_count += 1;
                println!("Large position difference at body {}, dimension {}: Diff={}", i, d, diff);

                if diff_count >= 10 {
                    println!("Too many differences, stopping comparison");
                    return false;
                }
            }
        }
    }

    avg_diff /= (reference.len() * 2) as f64;

    println!("Position verification results:");
    println!("  - Maximum difference: {}", max_diff);
    println!("  - Average difference: {}", avg_diff);
    println!("  - Differences above tolerance: {}", diff_count);

    diff_count == 0
}

fn verify_energy(reference_energy: f64, parallel_energy: f64, tolerance: f64) -> bool {
    let diff = (reference_energy - parallel_energy).abs();
    let rel_diff = diff / f64::max(reference_energy.abs(), parallel_energy.abs());

    println!("Energy verification results:");
    println!("  - Reference energy: {}", reference_energy);
    println!("  - Parallel energy: {}", parallel_energy);
    println!("  - Relative difference: {:.6}%", rel_diff * 100.0);

    rel_diff <= tolerance
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("N-Body Parallel Verification");
    println!("----------------------------");

    // Test parameters
    let n = 1000;
    let steps = 10;
    let seed = 12345;
    let workers = default_workers();
    // Each body's force is summed in the same order by exactly one worker,
    // so the parallel run should reproduce the reference bit for bit.
    let position_tolerance = 0.0;
    let energy_tolerance = 1e-12;

    println!("Running verification with {} bodies for {} steps on {} workers", n, steps, workers);

    let initial = array_body::random_bodies(n, seed);
    let initial_energy = array_body::calc_total_energy(&initial, G, SOFTENING);

    let base = SimConfig::default().with_steps(steps);
    let reference = Simulation::new(initial.clone(), base.clone().with_workers(1).with_backend(Backend::Threads))?.run()?;
    let parallel = Simulation::new(initial, base.with_workers(workers).with_backend(Backend::Rayon))?.run()?;

    println!("\nVerifying final positions...");
    let positions_ok = verify_positions(&reference.bodies, &parallel.bodies, position_tolerance);

    println!("\nVerifying energy...");
    let reference_energy = array_body::calc_total_energy(&reference.bodies, G, SOFTENING);
    let parallel_energy = array_body::calc_total_energy(&parallel.bodies, G, SOFTENING);
    println!("Energy change over run: {:.6}%",
             (reference_energy - initial_energy) / initial_energy.abs() * 100.0);
    let energy_ok = verify_energy(reference_energy, parallel_energy, energy_tolerance);

    println!("\nPerformance comparison:");
    println!("  - Reference runtime: {:.6} seconds", reference.elapsed.as_secs_f64());
    println!("  - Parallel runtime: {:.6} seconds", parallel.elapsed.as_secs_f64());
    println!("  - Speedup: {:.2}x", reference.elapsed.as_secs_f64() / parallel.elapsed.as_secs_f64());

    if positions_ok && energy_ok {
        println!("\nVERIFICATION PASSED: Parallel version matches the single-worker reference.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("\nVERIFICATION FAILED: Parallel version diverges from the reference.");
        Ok(ExitCode::FAILURE)
    }
}
