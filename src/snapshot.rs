//! Read-only per-tick view of the world.
//!
//! These are owned copies of simulation state, handed to renderers and
//! telemetry consumers; mutating them has no effect on the world.

use crate::boid::{Boid, BoidId};
use crate::genome::Genome;
use glam::DVec2;
use serde::Serialize;

/// Lightweight view of a prey boid
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoidView {
    pub id: BoidId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub age: u64,
    pub genome: Genome,
}

/// View of a predator, including its hunting record
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredatorView {
    pub id: BoidId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub age: u64,
    pub kills: u64,
    pub genome: Genome,
}

/// Complete world snapshot after a tick
#[derive(Clone, Debug, Default, Serialize)]
pub struct WorldSnapshot {
    /// Ticks completed so far
    pub tick: u64,
    pub prey: Vec<BoidView>,
    pub predators: Vec<PredatorView>,
}

impl From<&Boid> for BoidView {
    fn from(b: &Boid) -> Self {
        Self {
            id: b.id,
            position: b.position(),
            velocity: b.velocity(),
            age: b.age,
            genome: b.genome,
        }
    }
}

impl From<&Boid> for PredatorView {
    fn from(b: &Boid) -> Self {
        Self {
            id: b.id,
            position: b.position(),
            velocity: b.velocity(),
            age: b.age,
            kills: b.kills,
            genome: b.genome,
        }
    }
}

impl WorldSnapshot {
    pub fn capture(tick: u64, prey: &[Boid], predators: &[Boid]) -> Self {
        Self {
            tick,
            prey: prey.iter().map(BoidView::from).collect(),
            predators: predators.iter().map(PredatorView::from).collect(),
        }
    }

    /// Serialize as JSON for external consumers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{PredatorGenome, PreyGenome};

    #[test]
    fn test_capture_copies_state() {
        let prey = vec![Boid::new(
            1,
            DVec2::new(1.0, 2.0),
            DVec2::new(0.5, 0.0),
            Genome::Prey(PreyGenome::default()),
        )];
        let mut pred = Boid::new(
            2,
            DVec2::ZERO,
            DVec2::ZERO,
            Genome::Predator(PredatorGenome::default()),
        );
        pred.kills = 4;
        pred.age = 9;

        let snap = WorldSnapshot::capture(9, &prey, &[pred]);

        assert_eq!(snap.tick, 9);
        assert_eq!(snap.prey[0].position, DVec2::new(1.0, 2.0));
        assert_eq!(snap.predators[0].kills, 4);
        assert_eq!(snap.predators[0].age, 9);
    }

    #[test]
    fn test_json_includes_genome_fields() {
        let prey = vec![Boid::new(
            1,
            DVec2::ZERO,
            DVec2::ZERO,
            Genome::Prey(PreyGenome::default()),
        )];
        let json = WorldSnapshot::capture(0, &prey, &[]).to_json().unwrap();

        assert!(json.contains("\"predator_turn_factor\""));
        assert!(json.contains("\"species\":\"prey\""));
    }
}
