//! CSV persistence for fetched series
//!
//! Every request writes the raw series to a new timestamped file and reads
//! it straight back. Files are never cleaned up.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use shared::{RawColumn, RawSeries, TIME_COLUMN};

use crate::error::{AppError, AppResult};

const FILE_PREFIX: &str = "historical_weather_data_";

/// Writes and re-reads raw series as CSV files in one directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    output_dir: PathBuf,
}

impl CsvStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File name for a series written at `now`
    pub fn file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("{}{}.csv", FILE_PREFIX, now.format("%Y%m%d_%H%M%S"))
    }

    /// Write `raw` to a new file stamped with the local time
    pub fn persist(&self, raw: &RawSeries) -> AppResult<PathBuf> {
        self.persist_at(raw, &Local::now())
    }

    pub fn persist_at<Tz: TimeZone>(
        &self,
        raw: &RawSeries,
        now: &DateTime<Tz>,
    ) -> AppResult<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(Self::file_name(now));

        let mut wtr = csv::Writer::from_path(&path)?;
        let mut header = vec![TIME_COLUMN];
        header.extend(raw.column_names());
        wtr.write_record(&header)?;

        for (row, date) in raw.dates().iter().enumerate() {
            let mut record = Vec::with_capacity(raw.columns().len() + 1);
            record.push(date.format("%Y-%m-%d").to_string());
            for column in raw.columns() {
                record.push(column.values[row].map(|v| v.to_string()).unwrap_or_default());
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;

        tracing::info!(path = %path.display(), rows = raw.len(), "Persisted raw series");
        Ok(path)
    }

    /// Read a persisted series, keyed by its `time` column
    pub fn load(path: &Path) -> AppResult<RawSeries> {
        let mut rdr = csv::Reader::from_path(path)?;
        let headers = rdr.headers()?.clone();

        let time_idx = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or_else(|| {
                AppError::Storage(format!("{} has no '{}' column", path.display(), TIME_COLUMN))
            })?;

        let mut columns: Vec<(usize, RawColumn)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != time_idx)
            .map(|(i, name)| (i, RawColumn::new(name, Vec::new())))
            .collect();
        let mut index = Vec::new();

        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let time = record.get(time_idx).unwrap_or_default();
            index.push(parse_date(time).ok_or_else(|| {
                AppError::Storage(format!("invalid date '{}' on row {}", time, line + 1))
            })?);

            for (i, column) in columns.iter_mut() {
                let cell = record.get(*i).unwrap_or_default();
                let value = parse_cell(cell).ok_or_else(|| {
                    AppError::Storage(format!(
                        "non-numeric value '{}' in column '{}' on row {}",
                        cell,
                        column.name,
                        line + 1
                    ))
                })?;
                column.values.push(value);
            }
        }

        let raw = RawSeries::new(index, columns.into_iter().map(|(_, c)| c).collect())?;
        tracing::debug!(path = %path.display(), rows = raw.len(), "Reloaded raw series");
        Ok(raw)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // tolerate a midnight timestamp after the date
    let date = value.split_whitespace().next().unwrap_or(value);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// `Some(None)` for a missing cell, `None` when the cell is not a number
fn parse_cell(value: &str) -> Option<Option<f64>> {
    match value.trim() {
        "" => Some(None),
        v if v.eq_ignore_ascii_case("nan") => Some(None),
        v => v.parse::<f64>().ok().map(Some),
    }
}
