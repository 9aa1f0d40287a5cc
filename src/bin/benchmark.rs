use nbody_simulation_brute::config::default_workers;
use nbody_simulation_brute::{Backend, SimConfig, Simulation};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("N-Body Brute Force Benchmark");
    println!("----------------------------");

    // Test parameters
    let particle_counts = [100, 1000, 4000];
    let steps = 10;
    let max_workers = default_workers();
    let mut worker_counts = vec![1, 2, 4, max_workers];
    worker_counts.sort_unstable();
    worker_counts.dedup();
    worker_counts.retain(|&w| w <= max_workers);

    println!("Running {} steps per configuration, up to {} workers", steps, max_workers);
    println!("\nParticle Count | Backend | Workers | Runtime (s) | Avg Step Time (s) | Speedup");
    println!("---------------|---------|---------|-------------|-------------------|--------");

    for &n in &particle_counts {
        for backend in [Backend::Rayon, Backend::Threads] {
            let mut baseline = None;
            for &w in &worker_counts {
                let config = SimConfig::default()
                    .with_steps(steps)
                    .with_workers(w)
                    .with_backend(backend)
                    .with_seed(12345);
                let report = Simulation::random(n, config)?.run()?;
                let runtime = report.elapsed.as_secs_f64();
                let base = *baseline.get_or_insert(runtime);

                println!("{:14} | {:7} | {:7} | {:11.4} | {:17.6} | {:6.2}x",
                         n, format!("{:?}", backend), report.workers, runtime,
                         runtime / steps as f64, base / runtime);
            }
        }
        println!("---------------|---------|---------|-------------|-------------------|--------");
    }
    Ok(())
}
