//! Predation system - catch detection and culling.

use crate::boid::{Boid, BoidId};
use serde::{Deserialize, Serialize};

/// A predator catching a prey during the catch phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catch {
    /// Index into the predator population
    pub predator: usize,
    /// Index into the prey population
    pub prey: usize,
    pub predator_id: BoidId,
    pub prey_id: BoidId,
}

/// Check if `prey` is strictly inside `predator`'s catch radius
#[inline]
pub fn is_in_range(predator: &Boid, prey: &Boid) -> bool {
    let radius = predator
        .genome
        .as_predator()
        .map(|g| g.catch_radius)
        .unwrap_or(0.0);
    predator.position().distance(prey.position()) < radius
}

/// Scan predators in order; each takes the first unclaimed prey in range.
///
/// Every predator catches at most one prey and every prey is caught at most
/// once. Nothing is removed here.
pub fn detect_catches(predators: &[Boid], prey: &[Boid]) -> Vec<Catch> {
    let mut claimed = vec![false; prey.len()];
    let mut catches = Vec::new();

    for (pi, predator) in predators.iter().enumerate() {
        let target = prey
            .iter()
            .enumerate()
            .find(|&(qi, p)| !claimed[qi] && is_in_range(predator, p));

        if let Some((qi, p)) = target {
            claimed[qi] = true;
            catches.push(Catch {
                predator: pi,
                prey: qi,
                predator_id: predator.id,
                prey_id: p.id,
            });
        }
    }

    catches
}

/// Credit kills and remove every caught prey in a single pass.
///
/// Returns the number of prey removed.
pub fn cull(predators: &mut [Boid], prey: &mut Vec<Boid>, catches: &[Catch]) -> usize {
    let mut caught = vec![false; prey.len()];
    for c in catches {
        predators[c.predator].kills += 1;
        caught[c.prey] = true;
    }

    let before = prey.len();
    let mut idx = 0;
    prey.retain(|_| {
        let keep = !caught[idx];
        idx += 1;
        keep
    });
    before - prey.len()
}
