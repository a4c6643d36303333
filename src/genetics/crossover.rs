//! Uniform (bit-mask) crossover.

use crate::error::SimulationError;
use crate::genome::Genome;
use rand::Rng;

/// Build one child genome taking each gene from `a` or `b` on a fair coin.
///
/// Genes are copied, never blended. Both parents must be the same species.
pub fn bit_mask<R: Rng + ?Sized>(
    a: &Genome,
    b: &Genome,
    rng: &mut R,
) -> Result<Genome, SimulationError> {
    if a.species() != b.species() {
        return Err(SimulationError::InvalidPopulationState(format!(
            "cannot cross {:?} with {:?}",
            a.species(),
            b.species()
        )));
    }

    let genes: Vec<f64> = a
        .genes()
        .into_iter()
        .zip(b.genes())
        .map(|(ga, gb)| if rng.gen::<bool>() { ga } else { gb })
        .collect();

    a.with_genes(&genes).ok_or_else(|| {
        SimulationError::InvalidPopulationState("gene count does not match species".to_string())
    })
}
