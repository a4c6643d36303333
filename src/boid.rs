//! Boid structure and its committed/pending state.

use crate::error::SimulationError;
use crate::genome::{Genome, Species};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Unique boid identifier, stable for the lifetime of the agent
pub type BoidId = u64;

/// Position and velocity of a boid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Motion {
    pub position: DVec2,
    pub velocity: DVec2,
}

impl Motion {
    pub fn new(position: DVec2, velocity: DVec2) -> Self {
        Self { position, velocity }
    }
}

/// A single agent in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boid {
    pub id: BoidId,
    /// Committed state; the only state other agents may observe
    state: Motion,
    /// Next state staged during the compute phase
    #[serde(skip)]
    pending: Option<Motion>,
    /// Ticks survived
    pub age: u64,
    /// Prey caught (always 0 for prey)
    pub kills: u64,
    pub genome: Genome,
}

impl Boid {
    pub fn new(id: BoidId, position: DVec2, velocity: DVec2, genome: Genome) -> Self {
        Self {
            id,
            state: Motion::new(position, velocity),
            pending: None,
            age: 0,
            kills: 0,
            genome,
        }
    }

    #[inline]
    pub fn species(&self) -> Species {
        self.genome.species()
    }

    #[inline]
    pub fn motion(&self) -> Motion {
        self.state
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.state.position
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.state.velocity
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.state.velocity.length()
    }

    pub fn pending(&self) -> Option<Motion> {
        self.pending
    }

    /// Stage the next state. Overwrites any earlier staged state.
    pub fn stage(&mut self, next: Motion) {
        self.pending = Some(next);
    }

    /// Apply the staged state and age the boid by one tick.
    pub fn commit(&mut self) -> Result<(), SimulationError> {
        let next = self
            .pending
            .take()
            .ok_or(SimulationError::PhaseViolation { id: self.id })?;
        self.state = next;
        self.age += 1;
        Ok(())
    }

    /// Breeding weight: age for prey, kills per tick for predators
    pub fn fitness(&self) -> f64 {
        match self.species() {
            Species::Prey => self.age as f64,
            Species::Predator => {
                if self.age == 0 {
                    0.0
                } else {
                    self.kills as f64 / self.age as f64
                }
            }
        }
    }
}
