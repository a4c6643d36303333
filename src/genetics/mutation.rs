//! Whole-genome mutation.

use crate::genome::Genome;
use rand::Rng;

/// Mutate the whole genome with probability `rate`.
///
/// One coin flip decides for the entire genome; when it lands, every gene is
/// scaled by `1 + U(-rate, rate)`. Returns the genome and whether it mutated.
pub fn mutate<R: Rng + ?Sized>(genome: &Genome, rate: f64, rng: &mut R) -> (Genome, bool) {
    if rng.gen::<f64>() < rate {
        (genome.vary(rate, rng), true)
    } else {
        (*genome, false)
    }
}
