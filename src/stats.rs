//! Statistics tracking for the simulation.

use crate::boid::Boid;
use serde::{Deserialize, Serialize};

/// Statistics snapshot for a simulation tick
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Ticks completed
    pub tick: u64,
    pub prey_population: usize,
    pub predator_population: usize,
    /// Prey caught this tick
    pub catches: usize,
    /// Offspring bred this tick
    pub births: usize,
    /// Offspring whose genome mutated this tick
    pub mutations: usize,
    /// Prey caught since the start of the run
    pub total_catches: u64,
    pub prey_fitness_mean: f64,
    pub predator_fitness_mean: f64,
    pub prey_speed_mean: f64,
    pub prey_age_max: u64,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update population-derived stats from the committed populations
    pub fn update(&mut self, prey: &[Boid], predators: &[Boid]) {
        self.prey_population = prey.len();
        self.predator_population = predators.len();

        self.prey_fitness_mean = mean(prey.iter().map(Boid::fitness));
        self.predator_fitness_mean = mean(predators.iter().map(Boid::fitness));
        self.prey_speed_mean = mean(prey.iter().map(Boid::speed));
        self.prey_age_max = prey.iter().map(|b| b.age).max().unwrap_or(0);
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Prey:{:5} | Pred:{:3} | Caught:{:2} (total {}) | Fit:{:.1}/{:.3} | Speed:{:.2}",
            self.tick,
            self.prey_population,
            self.predator_population,
            self.catches,
            self.total_catches,
            self.prey_fitness_mean,
            self.predator_fitness_mean,
            self.prey_speed_mean,
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Prey population over time
    pub fn prey_series(&self) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.tick, s.prey_population))
            .collect()
    }

    /// Cumulative catches over time
    pub fn catch_series(&self) -> Vec<(u64, u64)> {
        self.snapshots
            .iter()
            .map(|s| (s.tick, s.total_catches))
            .collect()
    }

    /// Mean prey fitness over time
    pub fn fitness_series(&self) -> Vec<(u64, f64)> {
        self.snapshots
            .iter()
            .map(|s| (s.tick, s.prey_fitness_mean))
            .collect()
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Genome, PredatorGenome, PreyGenome};
    use glam::DVec2;

    #[test]
    fn test_stats_update() {
        let mut prey: Vec<Boid> = (0..3)
            .map(|i| {
                Boid::new(i, DVec2::ZERO, DVec2::new(3.0, 4.0), Genome::Prey(PreyGenome::default()))
            })
            .collect();
        prey[0].age = 2;
        prey[1].age = 4;
        let predators = vec![Boid::new(
            9,
            DVec2::ZERO,
            DVec2::ZERO,
            Genome::Predator(PredatorGenome::default()),
        )];

        let mut stats = Stats::new();
        stats.update(&prey, &predators);

        assert_eq!(stats.prey_population, 3);
        assert_eq!(stats.predator_population, 1);
        assert!((stats.prey_fitness_mean - 2.0).abs() < 1e-12);
        assert!((stats.prey_speed_mean - 5.0).abs() < 1e-12);
        assert_eq!(stats.prey_age_max, 4);
        assert_eq!(stats.predator_fitness_mean, 0.0);
    }

    #[test]
    fn test_empty_populations() {
        let mut stats = Stats::new();
        stats.update(&[], &[]);
        assert_eq!(stats.prey_fitness_mean, 0.0);
        assert_eq!(stats.prey_age_max, 0);
    }

    #[test]
    fn test_stats_history() {
        let mut history = StatsHistory::new(10);

        for i in 0..5 {
            let mut stats = Stats::new();
            stats.tick = i * 10;
            stats.prey_population = (i + 1) as usize * 100;
            history.record(stats);
        }

        let series = history.prey_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (0, 100));
        assert_eq!(series[4], (40, 500));
    }

    #[test]
    fn test_history_file_roundtrip() {
        let mut history = StatsHistory::new(5);
        let mut stats = Stats::new();
        stats.total_catches = 7;
        history.record(stats);

        let path = std::env::temp_dir().join("boid_evolution_stats_test.json");
        let path = path.to_str().unwrap();
        history.save(path).unwrap();
        let loaded = StatsHistory::load(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded.catch_series(), vec![(0, 7)]);
    }
}
