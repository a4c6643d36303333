//! Error types for configuration and simulation.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while advancing the simulation.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Selection or crossover was asked to work on a pool it cannot draw from
    /// (empty pool, zero total fitness, mixed species).
    #[error("invalid population state: {0}")]
    InvalidPopulationState(String),

    /// The prey population is empty; no further tick can replenish it.
    #[error("prey population exhausted at tick {tick}")]
    PopulationExhausted { tick: u64 },

    /// An agent was committed without a staged next state.
    #[error("boid {id} committed without a staged motion")]
    PhaseViolation { id: u64 },
}
