//! Next-day predictions and the data handed to the chart renderer

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ForecastResult;
use crate::models::Series;
use crate::types::Target;

/// Number of trailing observations shown next to the prediction
pub const DEFAULT_HISTORY_DAYS: usize = 30;

/// Round to two decimal places.
///
/// Goes through the exact decimal expansion of the float, so halfway cases
/// resolve to even the same way decimal formatting does.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Predicted values for the day after the last observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub tmax: f64,
    pub tmin: f64,
    pub prcp: f64,
}

impl Prediction {
    pub fn rounded(&self) -> Prediction {
        Prediction {
            tmax: round2(self.tmax),
            tmin: round2(self.tmin),
            prcp: round2(self.prcp),
        }
    }

    pub fn get(&self, target: Target) -> f64 {
        match target {
            Target::Tmax => self.tmax,
            Target::Tmin => self.tmin,
            Target::Prcp => self.prcp,
        }
    }
}

/// One observed day inside the chart window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub tmax: f64,
    pub tmin: f64,
    pub prcp: f64,
}

impl ChartPoint {
    pub fn get(&self, target: Target) -> f64 {
        match target {
            Target::Tmax => self.tmax,
            Target::Tmin => self.tmin,
            Target::Prcp => self.prcp,
        }
    }
}

/// Recent history plus the predicted next day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartWindow {
    pub history: Vec<ChartPoint>,
    pub last_date: NaiveDate,
    pub next_date: NaiveDate,
    pub prediction: Prediction,
}

impl ChartWindow {
    pub fn build(
        series: &Series,
        prediction: Prediction,
        history_days: usize,
    ) -> ForecastResult<Self> {
        let last_date = series.last_date()?;
        let recent = series.tail(history_days);
        let tmax = recent.column(Target::Tmax.column())?;
        let tmin = recent.column(Target::Tmin.column())?;
        let prcp = recent.column(Target::Prcp.column())?;

        let history = recent
            .dates()
            .iter()
            .enumerate()
            .map(|(i, &date)| ChartPoint {
                date,
                tmax: tmax[i],
                tmin: tmin[i],
                prcp: prcp[i],
            })
            .collect();

        Ok(Self {
            history,
            last_date,
            next_date: last_date + Duration::days(1),
            prediction,
        })
    }

    /// Most recent observation; the predicted segment starts here
    pub fn last_point(&self) -> Option<&ChartPoint> {
        self.history.last()
    }
}
