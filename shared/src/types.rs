//! Common types used across the workspace

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// GPS coordinates of the forecast location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// The three regression targets, in prediction order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Tmax,
    Tmin,
    Prcp,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Tmax, Target::Tmin, Target::Prcp];

    /// Column name of the target in a series
    pub fn column(&self) -> &'static str {
        match self {
            Target::Tmax => "tmax",
            Target::Tmin => "tmin",
            Target::Prcp => "prcp",
        }
    }

    pub fn is_target(column: &str) -> bool {
        Self::ALL.iter().any(|t| t.column() == column)
    }
}
