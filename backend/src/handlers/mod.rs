//! HTTP handlers

pub mod health;
pub mod index;

pub use health::health_check;
pub use index::index;
