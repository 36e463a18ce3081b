//! Domain models for the weather forecast pipeline

pub mod feature_row;
pub mod prediction;
pub mod series;

pub use feature_row::*;
pub use prediction::*;
pub use series::*;
