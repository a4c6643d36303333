//! Breeding replacement boids.

use crate::boid::{Boid, BoidId};
use crate::config::{Config, CrossoverStrategy, SelectionStrategy, WorldConfig};
use crate::error::SimulationError;
use crate::genetics;
use crate::genome::Genome;
use glam::DVec2;
use rand::Rng;

/// Genetic algorithm producing one offspring per call
#[derive(Debug, Clone)]
pub struct Breeder {
    pub mutation_rate: f64,
    pub selection: SelectionStrategy,
    pub crossover: CrossoverStrategy,
}

/// A bred child that has not yet been given an id
#[derive(Debug, Clone, PartialEq)]
pub struct Offspring {
    pub genome: Genome,
    pub position: DVec2,
    pub velocity: DVec2,
    pub parents: (BoidId, BoidId),
    pub mutated: bool,
}

impl Offspring {
    /// Fresh boid: age 0, no kills
    pub fn into_boid(self, id: BoidId) -> Boid {
        Boid::new(id, self.position, self.velocity, self.genome)
    }
}

impl Breeder {
    /// Create breeder from config
    pub fn from_config(config: &Config) -> Self {
        Self {
            mutation_rate: config.evolution.mutation_rate,
            selection: config.evolution.selection,
            crossover: config.evolution.crossover,
        }
    }

    /// Pick two parents from `pool` by fitness
    pub fn select_parents<'a, R: Rng + ?Sized>(
        &self,
        pool: &'a [Boid],
        rng: &mut R,
    ) -> Result<(&'a Boid, &'a Boid), SimulationError> {
        let fitness: Vec<f64> = pool.iter().map(Boid::fitness).collect();
        let (a, b) = match self.selection {
            SelectionStrategy::Roulette => genetics::roulette(&fitness, rng)?,
        };
        Ok((&pool[a], &pool[b]))
    }

    /// Combine the parents' genomes
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        a: &Boid,
        b: &Boid,
        rng: &mut R,
    ) -> Result<Genome, SimulationError> {
        match self.crossover {
            CrossoverStrategy::BitMask => genetics::bit_mask(&a.genome, &b.genome, rng),
        }
    }

    /// Breed one offspring from `pool`.
    ///
    /// The child starts at a uniform random position inside the world and
    /// takes the first parent's velocity unchanged.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        pool: &[Boid],
        world: &WorldConfig,
        rng: &mut R,
    ) -> Result<Offspring, SimulationError> {
        let (a, b) = self.select_parents(pool, rng)?;
        let genome = self.crossover(a, b, rng)?;
        let position = world.random_position(rng);
        let (genome, mutated) = genetics::mutate(&genome, self.mutation_rate, rng);

        Ok(Offspring {
            genome,
            position,
            velocity: a.velocity(),
            parents: (a.id, b.id),
            mutated,
        })
    }
}
