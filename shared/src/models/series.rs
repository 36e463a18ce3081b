//! Daily weather series, raw and cleaned

use std::collections::HashSet;

use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};
use crate::models::FeatureRow;
use crate::types::Target;

/// Name of the date index column in persisted series
pub const TIME_COLUMN: &str = "time";

/// A named column whose cells may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A named column with every cell present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Observations as fetched or re-read from disk, before cleaning
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    index: Vec<NaiveDate>,
    columns: Vec<RawColumn>,
}

/// Observations with missing values filled, ready for modeling
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

fn check_shape<'a>(
    index: &[NaiveDate],
    columns: impl Iterator<Item = (&'a str, usize)>,
) -> ForecastResult<()> {
    if index.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ForecastError::InvalidSeries(
            "dates must be strictly ascending".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (name, len) in columns {
        if name == TIME_COLUMN {
            return Err(ForecastError::InvalidSeries(format!(
                "'{}' is reserved for the date index",
                TIME_COLUMN
            )));
        }
        if !seen.insert(name) {
            return Err(ForecastError::InvalidSeries(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if len != index.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "column '{}' has {} values for {} dates",
                name,
                len,
                index.len()
            )));
        }
    }
    Ok(())
}

impl RawSeries {
    pub fn new(index: Vec<NaiveDate>, columns: Vec<RawColumn>) -> ForecastResult<Self> {
        check_shape(
            &index,
            columns.iter().map(|c| (c.name.as_str(), c.values.len())),
        )?;
        Ok(Self { index, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of missing cells across all columns
    pub fn missing_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.iter().filter(|v| v.is_none()).count())
            .sum()
    }

    /// Replace every missing value with zero
    pub fn clean(&self) -> Series {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: c.values.iter().map(|v| v.unwrap_or(0.0)).collect(),
            })
            .collect();

        Series {
            index: self.index.clone(),
            columns,
        }
    }
}

impl Series {
    pub fn new(index: Vec<NaiveDate>, columns: Vec<Column>) -> ForecastResult<Self> {
        check_shape(
            &index,
            columns.iter().map(|c| (c.name.as_str(), c.values.len())),
        )?;
        Ok(Self { index, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> ForecastResult<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }

    /// Every column except the three targets, sorted by name
    pub fn predictors(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !Target::is_target(&c.name))
            .map(|c| c.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn last_date(&self) -> ForecastResult<NaiveDate> {
        self.index.last().copied().ok_or(ForecastError::EmptySeries)
    }

    /// All columns of the most recent observation
    pub fn last_row(&self) -> ForecastResult<FeatureRow> {
        let last = self.len().checked_sub(1).ok_or(ForecastError::EmptySeries)?;
        Ok(FeatureRow::new(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[last]))
                .collect(),
        ))
    }

    /// The last `n` observations (or all of them if fewer)
    pub fn tail(&self, n: usize) -> Series {
        let start = self.len().saturating_sub(n);
        Series {
            index: self.index[start..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[start..].to_vec(),
                })
                .collect(),
        }
    }

    /// Row-major design matrix over the named columns
    pub fn matrix<S: AsRef<str>>(&self, names: &[S]) -> ForecastResult<Array2<f64>> {
        let cols = names
            .iter()
            .map(|n| self.column(n.as_ref()))
            .collect::<ForecastResult<Vec<_>>>()?;

        Ok(Array2::from_shape_fn((self.len(), cols.len()), |(i, j)| {
            cols[j][i]
        }))
    }

    /// View the cleaned series as raw data with every cell present
    pub fn to_raw(&self) -> RawSeries {
        RawSeries {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| RawColumn {
                    name: c.name.clone(),
                    values: c.values.iter().copied().map(Some).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn raw() -> RawSeries {
        RawSeries::new(
            vec![day(1), day(2), day(3)],
            vec![
                RawColumn::new("tavg", vec![Some(10.0), None, Some(12.0)]),
                RawColumn::new("tmin", vec![Some(5.0), Some(6.0), Some(7.0)]),
                RawColumn::new("tmax", vec![Some(15.0), Some(16.0), None]),
                RawColumn::new("prcp", vec![None, Some(0.4), Some(0.0)]),
                RawColumn::new("wspd", vec![Some(3.0), Some(4.0), Some(5.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_clean_fills_missing_with_zero() {
        let series = raw().clean();
        assert_eq!(series.column("tavg").unwrap(), &[10.0, 0.0, 12.0]);
        assert_eq!(series.column("tmax").unwrap(), &[15.0, 16.0, 0.0]);
        assert_eq!(series.column("prcp").unwrap(), &[0.0, 0.4, 0.0]);
    }

    #[test]
    fn test_missing_count() {
        assert_eq!(raw().missing_count(), 3);
        assert_eq!(raw().clean().to_raw().missing_count(), 0);
    }

    #[test]
    fn test_predictors_excludes_targets_sorted() {
        let series = raw().clean();
        assert_eq!(series.predictors(), vec!["tavg", "wspd"]);
    }

    #[test]
    fn test_rejects_unsorted_dates() {
        let result = RawSeries::new(
            vec![day(2), day(1)],
            vec![RawColumn::new("tmax", vec![Some(1.0), Some(2.0)])],
        );
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let result = RawSeries::new(
            vec![day(1), day(1)],
            vec![RawColumn::new("tmax", vec![Some(1.0), Some(2.0)])],
        );
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = Series::new(vec![day(1), day(2)], vec![Column::new("tmax", vec![1.0])]);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn test_rejects_duplicate_and_reserved_columns() {
        let dup = Series::new(
            vec![day(1)],
            vec![Column::new("tmax", vec![1.0]), Column::new("tmax", vec![2.0])],
        );
        assert!(dup.is_err());

        let reserved = Series::new(vec![day(1)], vec![Column::new("time", vec![1.0])]);
        assert!(reserved.is_err());
    }

    #[test]
    fn test_last_row_and_tail() {
        let series = raw().clean();
        let last = series.last_row().unwrap();
        assert_eq!(last.get("wspd"), Some(5.0));
        assert_eq!(last.get("tmax"), Some(0.0));

        let tail = series.tail(2);
        assert_eq!(tail.dates(), &[day(2), day(3)]);
        assert_eq!(tail.column("tmin").unwrap(), &[6.0, 7.0]);
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn test_empty_series_has_no_last_row() {
        let series = Series::new(vec![], vec![Column::new("tmax", vec![])]).unwrap();
        assert_eq!(series.last_row().unwrap_err(), ForecastError::EmptySeries);
        assert_eq!(series.last_date().unwrap_err(), ForecastError::EmptySeries);
    }

    #[test]
    fn test_matrix_layout() {
        let series = raw().clean();
        let m = series.matrix(&["wspd", "tmin"]).unwrap();
        assert_eq!(m.shape(), &[3, 2]);
        assert_eq!(m[[0, 0]], 3.0);
        assert_eq!(m[[2, 1]], 7.0);
        assert!(series.matrix(&["snow"]).is_err());
    }
}
