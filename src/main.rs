use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;

use nbody_simulation_brute::{Backend, SimConfig, Simulation, WorkerFailure};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of particles to simulate.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    number: u64,

    /// Number of force workers per step [default: available cores].
    #[arg(short, long)]
    workers: Option<usize>,

    /// Seed for the initial state, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// How each step's workers are run.
    #[arg(long, value_enum, default_value_t = Backend::Rayon)]
    backend: Backend,

    /// Abort the run if any worker fails instead of logging it.
    #[arg(long, default_value_t = false)]
    strict_workers: bool,
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let rendered = e.to_string();
            eprint!("{rendered}");
            if !rendered.contains("Usage:") {
                eprintln!("{}", Args::command().render_usage());
            }
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let n = usize::try_from(args.number).context("particle count does not fit in memory")?;

    let mut config = SimConfig::default().with_backend(args.backend);
    if let Some(w) = args.workers {
        config = config.with_workers(w);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.strict_workers {
        config = config.with_worker_failure(WorkerFailure::Fatal);
    }

    let sim = Simulation::random(n, config).context("failed to initialize simulation")?;
    let report = sim.run().context("simulation failed")?;

    println!("Elapsed time: {:.6} seconds", report.elapsed.as_secs_f64());
    Ok(())
}
