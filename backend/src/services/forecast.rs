//! Per-request forecast pipeline
//!
//! fetch → persist → reload/clean → derive predictors → train → predict →
//! chart. Every request starts from scratch; nothing is cached.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    ChartWindow, DateRange, GeoPoint, Prediction, RawSeries, SequentialPredictor, Series,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::MeteostatClient;
use crate::services::{ChartService, CsvStore};

/// Fixed inputs of the pipeline
#[derive(Debug, Clone)]
pub struct ForecastSettings {
    pub point: GeoPoint,
    pub range: DateRange,
    pub alpha: f64,
    pub persist_raw: bool,
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
    pub history_days: usize,
}

impl ForecastSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            point: config.point(),
            range: config.range(),
            alpha: config.model.alpha,
            persist_raw: config.storage.persist_raw,
            output_dir: PathBuf::from(&config.storage.output_dir),
            static_dir: PathBuf::from(&config.chart.static_dir),
            history_days: config.chart.history_days,
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub prediction: Prediction,
    pub predictors: Vec<String>,
    pub last_date: NaiveDate,
    pub next_date: NaiveDate,
    pub observations: usize,
    pub csv_path: Option<PathBuf>,
    pub plot_path: PathBuf,
}

/// Runs the forecast pipeline
#[derive(Clone)]
pub struct ForecastService {
    client: MeteostatClient,
    store: CsvStore,
    charts: ChartService,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(client: MeteostatClient, settings: ForecastSettings) -> Self {
        Self {
            client,
            store: CsvStore::new(settings.output_dir.clone()),
            charts: ChartService::new(settings.static_dir.clone()),
            settings,
        }
    }

    /// Fetch, train and predict for the configured location and period
    pub async fn run(&self) -> AppResult<ForecastReport> {
        let raw = self
            .client
            .fetch_daily(self.settings.point, self.settings.range)
            .await?;
        tracing::info!(
            rows = raw.len(),
            missing = raw.missing_count(),
            "Fetched daily observations"
        );

        let service = self.clone();
        tokio::task::spawn_blocking(move || service.forecast(raw))
            .await
            .map_err(|e| AppError::Internal(format!("Forecast task failed: {}", e)))?
    }

    /// Synchronous part of the pipeline, from the fetched series onwards
    pub fn forecast(&self, raw: RawSeries) -> AppResult<ForecastReport> {
        let (series, csv_path) = self.prepare(raw)?;
        let predictors = series.predictors();
        tracing::debug!(?predictors, "Derived predictors");

        let forecast = SequentialPredictor::new(self.settings.alpha).run(&series, &predictors)?;
        let window = ChartWindow::build(&series, forecast.prediction, self.settings.history_days)?;
        let plot_path = self.charts.render(&window)?;

        tracing::info!(
            tmax = forecast.prediction.tmax,
            tmin = forecast.prediction.tmin,
            prcp = forecast.prediction.prcp,
            next_date = %window.next_date,
            "Forecast ready"
        );

        Ok(ForecastReport {
            prediction: forecast.prediction,
            predictors,
            last_date: window.last_date,
            next_date: window.next_date,
            observations: series.len(),
            csv_path,
            plot_path,
        })
    }

    /// Persist and reload the raw series, then fill missing values
    pub fn prepare(&self, raw: RawSeries) -> AppResult<(Series, Option<PathBuf>)> {
        if !self.settings.persist_raw {
            return Ok((raw.clean(), None));
        }

        let path = self.store.persist(&raw)?;
        let reloaded = CsvStore::load(&path)?;
        Ok((reloaded.clean(), Some(path)))
    }
}
