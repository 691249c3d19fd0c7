//! Input handling: CSV loading, typed normalization, and the date join.

mod joiner;
mod loader;
mod normalizer;

pub use joiner::join;
pub use loader::Table;
pub use normalizer::Normalizer;
