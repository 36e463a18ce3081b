//! Shared types and models for the weather forecast service
//!
//! This crate holds the computational core: the daily weather series and its
//! cleaning rules, ridge regression, and the sequential next-day predictor.
//! It performs no I/O; fetching, persistence and rendering live in the
//! backend.

pub mod error;
pub mod models;
pub mod predictor;
pub mod ridge;
pub mod types;

pub use error::*;
pub use models::*;
pub use predictor::*;
pub use ridge::Ridge;
pub use types::*;
