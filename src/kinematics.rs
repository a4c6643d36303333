//! Per-species movement rules.
//!
//! Every function here is pure: it reads committed state only and returns the
//! next [`Motion`] for one boid. Neighbour contributions are folded in ascending
//! id order so the result does not depend on how the candidates were gathered.

use crate::boid::{Boid, Motion};
use crate::config::WorldConfig;
use crate::genome::{Genome, PredatorGenome, PreyGenome};
use glam::DVec2;

/// Next motion of a prey boid.
///
/// `flock` and `predators` are candidate sets (e.g. from a spatial query);
/// they are filtered by exact distance here. `boid` itself may appear in
/// `flock` and is skipped.
pub fn prey_motion(
    boid: &Boid,
    genome: &PreyGenome,
    flock: &[&Boid],
    predators: &[&Boid],
    world: &WorldConfig,
) -> Motion {
    let pos = boid.position();
    let vel = boid.velocity();
    let mut v = vel;

    let mut close = DVec2::ZERO;
    let mut pos_sum = DVec2::ZERO;
    let mut vel_sum = DVec2::ZERO;
    let mut neighbours = 0usize;

    for other in canonical(flock) {
        if other.id == boid.id {
            continue;
        }
        let d = pos.distance(other.position());
        if d >= genome.visual_range {
            continue;
        }
        if d > genome.protected_range {
            pos_sum += other.position();
            vel_sum += other.velocity();
            neighbours += 1;
        } else {
            close += pos - other.position();
        }
    }

    // Separation
    v += close * genome.avoid_factor;

    // Predator avoidance
    for pred in canonical(predators) {
        let away = pos - pred.position();
        let d = away.length();
        if d > 0.0 && d < genome.predator_detection_range {
            let magnitude = genome.predator_turn_factor * (1.0 - d / genome.predator_detection_range);
            v += away / d * magnitude;
        }
    }

    // Cohesion and alignment
    if neighbours > 0 {
        let n = neighbours as f64;
        let avg_pos = pos_sum / n;
        let avg_vel = vel_sum / n;
        v += (avg_pos - pos) * genome.centering_factor + (avg_vel - vel) * genome.matching_factor;
    }

    // Boundary turning
    let margin = genome.screen_margin;
    if pos.x < world.min.x + margin {
        v.x += genome.turning_factor;
    } else if pos.x > world.max.x - margin {
        v.x -= genome.turning_factor;
    }
    if pos.y < world.min.y + margin {
        v.y += genome.turning_factor;
    } else if pos.y > world.max.y - margin {
        v.y -= genome.turning_factor;
    }

    // Directional bias
    let theta = genome.bias_direction.to_radians();
    let bias = DVec2::new(theta.cos(), theta.sin());
    v = (1.0 - genome.bias_val) * v + genome.bias_val * bias;

    // Speed preference
    let speed = v.length();
    if speed > 0.0 {
        v += genome.propulsion * (genome.speed_pref - speed) * (v / speed);
    }

    let cap = world.prey_max_speed.min(genome.speed_limit);
    let v = clamp_speed(v, cap);

    Motion::new(pos + v, v)
}

/// Next motion of a predator: head straight for the nearest prey at `speed_pref`.
///
/// Ties go to the prey that comes first in `prey`. Without prey, or when the
/// nearest prey shares the predator's position, the predator stops.
pub fn predator_motion(
    boid: &Boid,
    genome: &PredatorGenome,
    prey: &[Boid],
    world: &WorldConfig,
) -> Motion {
    let pos = boid.position();

    let v = match nearest(pos, prey) {
        Some((target, d)) if d > 0.0 => (target - pos) / d * genome.speed_pref,
        _ => DVec2::ZERO,
    };
    let v = clamp_speed(v, world.predator_max_speed.min(genome.speed_limit));

    Motion::new(pos + v, v)
}

/// Next motion for any boid.
///
/// `flock` holds same-species candidates and `predators` predator candidates
/// (prey only); `prey` is the full prey population (predators only).
pub fn next_motion(
    boid: &Boid,
    flock: &[&Boid],
    predators: &[&Boid],
    prey: &[Boid],
    world: &WorldConfig,
) -> Motion {
    match &boid.genome {
        Genome::Prey(g) => prey_motion(boid, g, flock, predators, world),
        Genome::Predator(g) => predator_motion(boid, g, prey, world),
    }
}

/// Speed cap that [`next_motion`] enforces for `boid`
pub fn speed_cap(boid: &Boid, world: &WorldConfig) -> f64 {
    world.max_speed(boid.species()).min(boid.genome.speed_limit())
}

/// Rescale `v` to `cap` if it is faster. Zero vectors pass through.
#[inline]
pub fn clamp_speed(v: DVec2, cap: f64) -> DVec2 {
    let speed = v.length();
    if speed > cap && speed > 0.0 {
        v / speed * cap
    } else {
        v
    }
}

fn nearest(pos: DVec2, prey: &[Boid]) -> Option<(DVec2, f64)> {
    let mut best: Option<(DVec2, f64)> = None;
    for p in prey {
        let d = pos.distance(p.position());
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((p.position(), d));
        }
    }
    best
}

fn canonical<'a>(boids: &[&'a Boid]) -> Vec<&'a Boid> {
    let mut ordered = boids.to_vec();
    ordered.sort_by_key(|b| b.id);
    ordered
}
