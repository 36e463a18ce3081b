//! Meteostat API client for fetching daily historical observations
//!
//! Queries the point endpoint, which interpolates station data for a
//! coordinate pair, and returns the result as a raw series in the provider's
//! column order.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use shared::{DateRange, GeoPoint, RawColumn, RawSeries};

use crate::error::{AppError, AppResult};

/// Daily columns in the order Meteostat publishes them
pub const DAILY_COLUMNS: [&str; 10] = [
    "tavg", "tmin", "tmax", "prcp", "snow", "wdir", "wspd", "wpgt", "pres", "tsun",
];

const RAPIDAPI_HOST: &str = "meteostat.p.rapidapi.com";

/// Meteostat API client
#[derive(Clone)]
pub struct MeteostatClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Meteostat API response for daily point data
#[derive(Debug, Deserialize)]
struct DailyResponse {
    data: Vec<DailyRecord>,
}

#[derive(Debug, Deserialize)]
struct DailyRecord {
    date: NaiveDate,
    tavg: Option<f64>,
    tmin: Option<f64>,
    tmax: Option<f64>,
    prcp: Option<f64>,
    snow: Option<f64>,
    wdir: Option<f64>,
    wspd: Option<f64>,
    wpgt: Option<f64>,
    pres: Option<f64>,
    tsun: Option<f64>,
}

impl DailyRecord {
    fn fields(&self) -> [Option<f64>; 10] {
        [
            self.tavg, self.tmin, self.tmax, self.prcp, self.snow, self.wdir, self.wspd,
            self.wpgt, self.pres, self.tsun,
        ]
    }
}

impl MeteostatClient {
    /// Create a new MeteostatClient against `base_url`
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch daily observations for a coordinate pair over an inclusive range
    pub async fn fetch_daily(&self, point: GeoPoint, range: DateRange) -> AppResult<RawSeries> {
        let url = format!("{}/point/daily", self.base_url);
        let start = range.start.format("%Y-%m-%d").to_string();
        let end = range.end.format("%Y-%m-%d").to_string();

        tracing::debug!(
            lat = point.latitude,
            lon = point.longitude,
            %start,
            %end,
            "Requesting daily observations"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("start", start),
                ("end", end),
            ])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
            .send()
            .await
            .map_err(|e| AppError::DataSource(format!("Meteostat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::DataSource(format!(
                "Meteostat API error: {} - {}",
                status, body
            )));
        }

        let data: DailyResponse = response.json().await.map_err(|e| {
            AppError::DataSource(format!("Failed to parse Meteostat response: {}", e))
        })?;

        self.convert_daily_response(data)
    }

    /// Convert the Meteostat record list to a raw series
    fn convert_daily_response(&self, mut data: DailyResponse) -> AppResult<RawSeries> {
        data.data.sort_by_key(|r| r.date);

        let index: Vec<NaiveDate> = data.data.iter().map(|r| r.date).collect();
        let mut columns: Vec<RawColumn> = DAILY_COLUMNS
            .iter()
            .map(|name| RawColumn::new(*name, Vec::with_capacity(index.len())))
            .collect();

        for record in &data.data {
            for (column, value) in columns.iter_mut().zip(record.fields()) {
                column.values.push(value);
            }
        }

        RawSeries::new(index, columns)
            .map_err(|e| AppError::DataSource(format!("Malformed Meteostat series: {}", e)))
    }
}
