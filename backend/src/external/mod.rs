//! External API integrations

pub mod meteostat;

pub use meteostat::MeteostatClient;
