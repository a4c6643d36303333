//! Configuration system for the boid simulation.
//!
//! Supports YAML configuration files with sensible defaults. Everything here is
//! validated once, when a [`World`](crate::World) is constructed.

use crate::error::ConfigError;
use crate::genome::{Genome, PredatorGenome, PreyGenome, Species};
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldSettings,
    pub prey: PreyConfig,
    pub predator: PredatorConfig,
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World bounds and spatial grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// Edge length of a spatial index cell
    pub cell_size: f64,
    /// Per-axis range for initial velocity components
    pub initial_velocity: [f64; 2],
}

/// Prey population settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreyConfig {
    pub population: usize,
    /// Species-wide speed cap
    pub max_speed: f64,
    pub genome: PreyGenome,
}

/// Predator population settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredatorConfig {
    pub population: usize,
    /// Species-wide speed cap
    pub max_speed: f64,
    pub genome: PredatorGenome,
}

/// Parent selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Fitness-proportional selection
    #[default]
    Roulette,
}

/// Genome recombination strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossoverStrategy {
    /// One fair coin per gene, no blending
    #[default]
    BitMask,
}

/// Genetic algorithm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Probability that an offspring is mutated; also the per-gene scale bound
    pub mutation_rate: f64,
    /// Scale bound applied to default genomes when seeding the population
    pub startup_variance: f64,
    #[serde(default)]
    pub selection: SelectionStrategy,
    #[serde(default)]
    pub crossover: CrossoverStrategy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between stats logging
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            xmin: -150.0,
            xmax: 150.0,
            ymin: -150.0,
            ymax: 150.0,
            cell_size: 20.0,
            initial_velocity: [2.0, 4.0],
        }
    }
}

impl Default for PreyConfig {
    fn default() -> Self {
        Self {
            population: 100,
            max_speed: 10.0,
            genome: PreyGenome::default(),
        }
    }
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            population: 3,
            max_speed: 15.0,
            genome: PredatorGenome::default(),
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.05,
            startup_variance: 0.1,
            selection: SelectionStrategy::Roulette,
            crossover: CrossoverStrategy::BitMask,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 50,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if [w.xmin, w.xmax, w.ymin, w.ymax].iter().any(|v| !v.is_finite()) {
            return Err(invalid("world bounds must be finite"));
        }
        if !(w.xmax > w.xmin) || !(w.ymax > w.ymin) {
            return Err(invalid("world bounds must have positive extent"));
        }
        if !(w.cell_size > 0.0) || !w.cell_size.is_finite() {
            return Err(invalid("cell_size must be positive"));
        }
        let [v_min, v_max] = w.initial_velocity;
        if !v_min.is_finite() || !v_max.is_finite() || !(v_min <= v_max) {
            return Err(invalid("initial_velocity must be finite [min, max]"));
        }
        if self.prey.population == 0 {
            return Err(invalid("prey population must be > 0"));
        }
        if !(self.prey.max_speed > 0.0)
            || !(self.predator.max_speed > 0.0)
            || !self.prey.max_speed.is_finite()
            || !self.predator.max_speed.is_finite()
        {
            return Err(invalid("species max_speed must be positive"));
        }
        if !(0.0..=1.0).contains(&self.evolution.mutation_rate) {
            return Err(invalid("mutation_rate must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.evolution.startup_variance) {
            return Err(invalid("startup_variance must be between 0 and 1"));
        }

        let genomes = [Genome::Prey(self.prey.genome), Genome::Predator(self.predator.genome)];
        for genome in &genomes {
            if let Some((name, _)) = genome.fields().into_iter().find(|(_, v)| !v.is_finite()) {
                return Err(invalid(&format!("{:?} {} must be finite", genome.species(), name)));
            }
        }

        let prey = &self.prey.genome;
        for (name, value) in [
            ("visual_range", prey.visual_range),
            ("screen_margin", prey.screen_margin),
            ("protected_range", prey.protected_range),
            ("predator_detection_range", prey.predator_detection_range),
            ("speed_limit", prey.speed_limit),
            ("speed_pref", prey.speed_pref),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(&format!("prey {} must be >= 0", name)));
            }
        }

        let pred = &self.predator.genome;
        for (name, value) in [
            ("vision_radius", pred.vision_radius),
            ("catch_radius", pred.catch_radius),
            ("speed_limit", pred.speed_limit),
            ("speed_pref", pred.speed_pref),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(&format!("predator {} must be >= 0", name)));
            }
        }

        Ok(())
    }
}

/// Immutable world parameters shared by every boid during a run.
///
/// Built once from a validated [`Config`]; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub min: DVec2,
    pub max: DVec2,
    pub cell_size: f64,
    pub prey_max_speed: f64,
    pub predator_max_speed: f64,
}

impl WorldConfig {
    pub fn from_config(config: &Config) -> Self {
        let w = &config.world;
        Self {
            min: DVec2::new(w.xmin, w.ymin),
            max: DVec2::new(w.xmax, w.ymax),
            cell_size: w.cell_size,
            prey_max_speed: config.prey.max_speed,
            predator_max_speed: config.predator.max_speed,
        }
    }

    /// Species-wide speed cap
    pub fn max_speed(&self, species: Species) -> f64 {
        match species {
            Species::Prey => self.prey_max_speed,
            Species::Predator => self.predator_max_speed,
        }
    }

    /// Uniform position inside the bounds, independent per axis
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            rng.gen_range(self.min.x..self.max.x),
            rng.gen_range(self.min.y..self.max.y),
        )
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.cell_size, loaded.world.cell_size);
        assert_eq!(config.prey.genome, loaded.prey.genome);
        assert_eq!(loaded.evolution.crossover, CrossoverStrategy::BitMask);
    }

    #[test]
    fn test_strategy_identifiers() {
        let yaml = serde_yaml::to_string(&EvolutionConfig::default()).unwrap();
        assert!(yaml.contains("roulette"));
        assert!(yaml.contains("bit-mask"));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        config.world.cell_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.evolution.mutation_rate = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.prey.genome.protected_range = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.xmax = config.world.xmin;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        let mut config = Config::default();
        config.world.xmax = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.ymin = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_initial_velocity() {
        let mut config = Config::default();
        config.world.initial_velocity = [f64::NAN, f64::NAN];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.initial_velocity = [0.0, f64::INFINITY];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.initial_velocity = [3.0, 3.0];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_genes() {
        let mut config = Config::default();
        config.prey.genome.visual_range = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.prey.genome.matching_factor = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.predator.genome.group_follow_size = f64::NEG_INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_speed_cap() {
        let mut config = Config::default();
        config.predator.max_speed = f64::INFINITY;
        assert!(config.validate().is_err());
    }
}
