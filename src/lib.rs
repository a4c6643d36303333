//! # boid-evolution
//!
//! Predator-prey boid simulation where killed prey are replaced by offspring
//! bred with a genetic algorithm.
//!
//! ## Features
//!
//! - **Flocking**: separation, cohesion, alignment and predator avoidance per prey genome
//! - **Pursuit**: predators chase the nearest prey
//! - **Evolution**: roulette selection, bit-mask crossover, whole-genome mutation
//! - **Parallel**: per-boid motion computed across all CPU cores via Rayon
//! - **Reproducible**: seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boid_evolution::{Config, World};
//!
//! let mut world = World::new(Config::default()).unwrap();
//! world.run(1000).unwrap();
//!
//! println!("Prey: {}", world.prey_population());
//! println!("Caught so far: {}", world.stats.total_catches);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use boid_evolution::Config;
//!
//! let mut config = Config::default();
//! config.prey.population = 200;
//! config.evolution.mutation_rate = 0.1;
//! assert!(config.validate().is_ok());
//! ```

pub mod boid;
pub mod config;
pub mod error;
pub mod evolution;
pub mod genetics;
pub mod genome;
pub mod grid;
pub mod kinematics;
pub mod predation;
pub mod snapshot;
pub mod stats;
pub mod world;

// Re-export main types
pub use boid::{Boid, BoidId, Motion};
pub use config::{Config, WorldConfig};
pub use error::{ConfigError, SimulationError};
pub use genome::{Genome, PredatorGenome, PreyGenome, Species};
pub use snapshot::WorldSnapshot;
pub use world::{TickReport, World};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(ticks: u64, prey_population: usize) -> Result<BenchmarkResult, Box<dyn std::error::Error>> {
    use std::time::Instant;

    let mut config = Config::default();
    config.prey.population = prey_population;

    let mut world = World::new_with_seed(config, 42)?;

    let start = Instant::now();
    world.run(ticks)?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        ticks,
        prey_population,
        predator_population: world.predator_population(),
        total_catches: world.stats.total_catches,
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub prey_population: usize,
    pub predator_population: usize,
    pub total_catches: u64,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Population: {} prey, {} predators", self.prey_population, self.predator_population)?;
        writeln!(f, "Catches: {}", self.total_catches)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}
