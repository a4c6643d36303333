//! Fitness-proportional parent selection.

use crate::error::SimulationError;
use rand::Rng;

/// Draw two parent indices by roulette wheel.
///
/// The draws are independent, so both may land on the same individual.
/// Fails when the pool is empty, a weight is negative or non-finite, or the
/// total fitness is zero.
pub fn roulette<R: Rng + ?Sized>(
    fitness: &[f64],
    rng: &mut R,
) -> Result<(usize, usize), SimulationError> {
    let weights = normalize(fitness)?;
    let first = spin(&weights, rng.gen::<f64>());
    let second = spin(&weights, rng.gen::<f64>());
    Ok((first, second))
}

/// Scale fitness values to probabilities summing to 1
pub fn normalize(fitness: &[f64]) -> Result<Vec<f64>, SimulationError> {
    if fitness.is_empty() {
        return Err(SimulationError::InvalidPopulationState(
            "selection pool is empty".to_string(),
        ));
    }
    if let Some(bad) = fitness.iter().find(|f| !f.is_finite() || **f < 0.0) {
        return Err(SimulationError::InvalidPopulationState(format!(
            "fitness {} is not a finite non-negative value",
            bad
        )));
    }

    let total: f64 = fitness.iter().sum();
    if total <= 0.0 {
        return Err(SimulationError::InvalidPopulationState(
            "total fitness is zero".to_string(),
        ));
    }

    Ok(fitness.iter().map(|f| f / total).collect())
}

/// First index whose cumulative weight meets or exceeds `sample`.
///
/// If rounding leaves the cumulative sum just below `sample`, the last
/// individual with non-zero weight is returned.
pub fn spin(weights: &[f64], sample: f64) -> usize {
    let mut cumulative = 0.0;
    for (idx, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= sample {
            return idx;
        }
    }
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}
