//! Genetics module - parent selection, crossover, and mutation.

pub mod crossover;
pub mod mutation;
pub mod selection;

pub use crossover::bit_mask;
pub use mutation::mutate;
pub use selection::roulette;
