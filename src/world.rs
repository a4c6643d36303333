//! World simulation engine - main simulation loop.

use crate::boid::{Boid, BoidId, Motion};
use crate::config::{Config, WorldConfig};
use crate::error::{ConfigError, SimulationError};
use crate::evolution::Breeder;
use crate::genome::Genome;
use crate::grid::SpatialIndex;
use crate::kinematics;
use crate::predation::{self, Catch};
use crate::snapshot::WorldSnapshot;
use crate::stats::{Stats, StatsHistory};
use glam::DVec2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Outcome of a single tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Tick number just completed (1-based)
    pub tick: u64,
    pub catches: Vec<Catch>,
    pub births: usize,
    pub mutations: usize,
}

/// The simulation world
pub struct World {
    // Populations, each kept in ascending id order
    pub prey: Vec<Boid>,
    pub predators: Vec<Boid>,

    // Spatial indices, rebuilt at the start of every tick
    prey_index: SpatialIndex,
    predator_index: SpatialIndex,

    // State
    pub tick: u64,

    // Configuration
    pub config: Config,
    bounds: WorldConfig,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,

    // Evolution
    pub breeder: Breeder,

    // ID generation
    next_boid_id: BoidId,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let bounds = WorldConfig::from_config(&config);
        let variance = config.evolution.startup_variance;
        let [v_min, v_max] = config.world.initial_velocity;

        let mut next_boid_id = 0;
        let mut spawn = |genome: Genome, rng: &mut ChaCha8Rng| {
            let position = bounds.random_position(rng);
            let velocity = DVec2::new(rng.gen_range(v_min..=v_max), rng.gen_range(v_min..=v_max));
            let boid = Boid::new(next_boid_id, position, velocity, genome.vary(variance, rng));
            next_boid_id += 1;
            boid
        };

        let prey_default = Genome::Prey(config.prey.genome);
        let prey: Vec<Boid> = (0..config.prey.population)
            .map(|_| spawn(prey_default, &mut rng))
            .collect();

        let predator_default = Genome::Predator(config.predator.genome);
        let predators: Vec<Boid> = (0..config.predator.population)
            .map(|_| spawn(predator_default, &mut rng))
            .collect();

        let world = Self::assemble(config, bounds, prey, predators, next_boid_id, rng, seed)?;

        log::info!(
            "World created: seed={} prey={} predators={}",
            seed,
            world.prey.len(),
            world.predators.len()
        );

        Ok(world)
    }

    /// Create a world from hand-placed populations.
    ///
    /// Boids must have unique ids and finite genes; new offspring get ids
    /// above the largest one.
    /// The prey population may be empty, in which case the first tick fails.
    pub fn from_populations(
        config: Config,
        prey: Vec<Boid>,
        predators: Vec<Boid>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut check = config.clone();
        check.prey.population = check.prey.population.max(1);
        check.validate()?;

        if prey.iter().any(|b| b.genome.as_prey().is_none())
            || predators.iter().any(|b| b.genome.as_predator().is_none())
        {
            return Err(ConfigError::Invalid(
                "population contains a boid of the wrong species".to_string(),
            ));
        }

        if let Some(b) = prey
            .iter()
            .chain(predators.iter())
            .find(|b| b.genome.genes().iter().any(|g| !g.is_finite()))
        {
            return Err(ConfigError::Invalid(format!("boid {} has a non-finite gene", b.id)));
        }

        let mut prey = prey;
        let mut predators = predators;
        prey.sort_by_key(|b| b.id);
        predators.sort_by_key(|b| b.id);

        let mut ids: Vec<BoidId> = prey.iter().chain(predators.iter()).map(|b| b.id).collect();
        ids.sort_unstable();
        if let Some(w) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid(format!("duplicate boid id {}", w[0])));
        }

        let next_boid_id = prey
            .iter()
            .chain(predators.iter())
            .map(|b| b.id + 1)
            .max()
            .unwrap_or(0);
        let bounds = WorldConfig::from_config(&config);
        let rng = ChaCha8Rng::seed_from_u64(seed);

        Self::assemble(config, bounds, prey, predators, next_boid_id, rng, seed)
    }

    fn assemble(
        config: Config,
        bounds: WorldConfig,
        prey: Vec<Boid>,
        predators: Vec<Boid>,
        next_boid_id: BoidId,
        rng: ChaCha8Rng,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut world = Self {
            prey_index: SpatialIndex::new(bounds.cell_size, bounds.min)?,
            predator_index: SpatialIndex::new(bounds.cell_size, bounds.min)?,
            prey,
            predators,
            tick: 0,
            stats: Stats::new(),
            stats_history: StatsHistory::new(config.logging.stats_interval),
            breeder: Breeder::from_config(&config),
            config,
            bounds,
            next_boid_id,
            rng,
            seed,
        };

        world.stats.update(&world.prey, &world.predators);
        Ok(world)
    }

    /// Advance the simulation by one tick.
    ///
    /// After an error the world is left mid-tick and should not be stepped again.
    pub fn step(&mut self) -> Result<TickReport, SimulationError> {
        if self.prey.is_empty() {
            return Err(SimulationError::PopulationExhausted { tick: self.tick });
        }

        // Phase 1: Rebuild spatial indices from committed state
        self.rebuild_indices();

        // Phase 2: Compute next motion for every boid in parallel
        self.compute_phase();

        // Phase 3: Commit staged motion
        self.commit_phase()?;

        // Phase 4: Catch detection over committed state
        let catches = predation::detect_catches(&self.predators, &self.prey);

        // Phase 5: Cull caught prey and breed replacements
        let (births, mutations) = self.replenish(&catches)?;

        self.tick += 1;
        self.update_stats(catches.len(), births, mutations);

        if !catches.is_empty() {
            log::debug!(
                "Tick {}: {} caught, {} bred ({} mutated)",
                self.tick,
                catches.len(),
                births,
                mutations
            );
        }

        Ok(TickReport {
            tick: self.tick,
            catches,
            births,
            mutations,
        })
    }

    fn rebuild_indices(&mut self) {
        self.prey_index.build(&self.prey);
        self.predator_index.build(&self.predators);
    }

    /// Every boid reads committed state only and writes only its own slot
    fn compute_phase(&mut self) {
        let bounds = &self.bounds;
        let prey = &self.prey;
        let predators = &self.predators;
        let prey_index = &self.prey_index;
        let predator_index = &self.predator_index;

        let prey_next: Vec<Motion> = prey
            .par_iter()
            .map(|boid| {
                let flock: Vec<&Boid> = prey_index
                    .query_boid(boid)
                    .into_iter()
                    .map(|i| &prey[i])
                    .collect();
                let detection = boid
                    .genome
                    .as_prey()
                    .map(|g| g.predator_detection_range)
                    .unwrap_or(0.0);
                let threats: Vec<&Boid> = predator_index
                    .query(boid.position(), detection)
                    .into_iter()
                    .map(|i| &predators[i])
                    .collect();
                kinematics::next_motion(boid, &flock, &threats, prey, bounds)
            })
            .collect();

        let predator_next: Vec<Motion> = predators
            .par_iter()
            .map(|boid| kinematics::next_motion(boid, &[], &[], prey, bounds))
            .collect();

        for (boid, next) in self.prey.iter_mut().zip(prey_next) {
            boid.stage(next);
        }
        for (boid, next) in self.predators.iter_mut().zip(predator_next) {
            boid.stage(next);
        }
    }

    fn commit_phase(&mut self) -> Result<(), SimulationError> {
        for boid in self.prey.iter_mut().chain(self.predators.iter_mut()) {
            boid.commit()?;
        }
        Ok(())
    }

    /// Remove caught prey and append one bred offspring per catch.
    ///
    /// Parents are drawn from the prey population as committed this tick,
    /// caught prey included.
    fn replenish(&mut self, catches: &[Catch]) -> Result<(usize, usize), SimulationError> {
        if catches.is_empty() {
            return Ok((0, 0));
        }

        let pool = self.prey.clone();
        predation::cull(&mut self.predators, &mut self.prey, catches);

        let mut mutations = 0;
        for _ in catches {
            let child = self.breeder.breed(&pool, &self.bounds, &mut self.rng)?;
            if child.mutated {
                mutations += 1;
            }
            let id = self.next_boid_id;
            self.next_boid_id += 1;
            self.prey.push(child.into_boid(id));
        }

        Ok((catches.len(), mutations))
    }

    fn update_stats(&mut self, catches: usize, births: usize, mutations: usize) {
        self.stats.tick = self.tick;
        self.stats.catches = catches;
        self.stats.births = births;
        self.stats.mutations = mutations;
        self.stats.total_catches += catches as u64;
        self.stats.update(&self.prey, &self.predators);

        let interval = self.stats_history.interval;
        if interval > 0 && self.tick % interval == 0 {
            self.stats_history.record(self.stats.clone());
            log::info!("{}", self.stats.summary());
        }
    }

    /// Run simulation for the given number of ticks, stopping at the first error
    pub fn run(&mut self, ticks: u64) -> Result<(), SimulationError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Run simulation with callback after every tick
    pub fn run_with_callback<F>(&mut self, ticks: u64, mut callback: F) -> Result<(), SimulationError>
    where
        F: FnMut(&World, &TickReport),
    {
        for _ in 0..ticks {
            let report = self.step()?;
            callback(self, &report);
        }
        Ok(())
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.tick, &self.prey, &self.predators)
    }

    /// Immutable world parameters
    pub fn bounds(&self) -> &WorldConfig {
        &self.bounds
    }

    pub fn prey_population(&self) -> usize {
        self.prey.len()
    }

    pub fn predator_population(&self) -> usize {
        self.predators.len()
    }

    /// Check if the prey population is gone
    pub fn is_extinct(&self) -> bool {
        self.prey.is_empty()
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
