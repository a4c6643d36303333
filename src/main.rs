//! boid-evolution - CLI entry point

use boid_evolution::{benchmark, Config, World};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "boid-evolution")]
#[command(version)]
#[command(about = "Predator-prey boid flocking with genetic replacement of caught prey")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "5000")]
        ticks: u64,

        /// Output directory for stats history and final snapshot
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Prey population size
        #[arg(short, long, default_value = "500")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            output,
            seed,
            quiet,
        } => run_simulation(config, ticks, output, seed, quiet),

        Commands::Benchmark { ticks, population } => {
            init_logging("warn");
            run_benchmark(ticks, population)
        }

        Commands::Init { output } => generate_config(output),
    }
}

/// Initialize logging; RUST_LOG overrides the configured level
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run_simulation(
    config_path: PathBuf,
    ticks: u64,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };

    let level = if quiet { "warn" } else { config.logging.log_level.as_str() };
    init_logging(level);

    if config_path.exists() {
        log::info!("Loaded config from {:?}", config_path);
    } else {
        log::info!("Using default configuration");
    }

    std::fs::create_dir_all(&output)?;

    let mut world = match seed {
        Some(s) => World::new_with_seed(config.clone(), s)?,
        None => World::new(config.clone())?,
    };

    log::info!(
        "Starting simulation: {} prey, {} predators, {} ticks, seed {}",
        world.prey_population(),
        world.predator_population(),
        ticks,
        world.seed()
    );

    let start = Instant::now();
    let result = world.run(ticks);
    let elapsed = start.elapsed();

    if let Err(e) = &result {
        log::error!("Simulation stopped at tick {}: {}", world.tick, e);
    }

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Ticks: {}", world.tick);
    println!("Speed: {:.1} ticks/s", world.tick as f64 / elapsed.as_secs_f64());
    println!("Prey: {}", world.prey_population());
    println!("Total catches: {}", world.stats.total_catches);

    let stats_path = output.join("stats_history.json");
    world.stats_history.save(&stats_path.to_string_lossy())?;
    println!("Stats history: {:?}", stats_path);

    let snapshot_path = output.join("final_snapshot.json");
    std::fs::write(&snapshot_path, world.snapshot().to_json()?)?;
    println!("Final snapshot: {:?}", snapshot_path);

    result?;
    Ok(())
}

fn run_benchmark(ticks: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== boid-evolution Benchmark ===");
    println!("Ticks: {}", ticks);
    println!("Prey: {}", population);
    println!();

    let result = benchmark(ticks, population)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
