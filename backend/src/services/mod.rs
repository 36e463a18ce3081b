//! Pipeline services for the weather forecast server

pub mod chart;
pub mod forecast;
pub mod storage;

pub use chart::ChartService;
pub use forecast::{ForecastReport, ForecastService, ForecastSettings};
pub use storage::CsvStore;
