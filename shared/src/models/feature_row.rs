//! Named feature vectors fed to a fitted model

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// An ordered set of `(column, value)` pairs taken from one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    entries: Vec<(String, f64)>,
}

impl FeatureRow {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Restrict the row to `names`, in the order given
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> ForecastResult<FeatureRow> {
        let entries = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .map(|value| (name.to_string(), value))
                    .ok_or_else(|| ForecastError::UnknownFeature(name.to_string()))
            })
            .collect::<ForecastResult<Vec<_>>>()?;
        Ok(FeatureRow { entries })
    }

    /// Overwrite an existing entry in place
    pub fn set(&mut self, name: &str, value: f64) -> ForecastResult<()> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| ForecastError::UnknownFeature(name.to_string()))?;
        slot.1 = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> FeatureRow {
        FeatureRow::new(vec![
            ("tavg".to_string(), 12.5),
            ("tmax".to_string(), 18.0),
            ("wspd".to_string(), 7.2),
        ])
    }

    #[test]
    fn test_select_follows_requested_order() {
        let selected = row().select(&["wspd", "tavg"]).unwrap();
        assert_eq!(selected.names().collect::<Vec<_>>(), vec!["wspd", "tavg"]);
        assert_eq!(selected.values(), vec![7.2, 12.5]);
    }

    #[test]
    fn test_select_unknown_column() {
        let err = row().select(&["pres"]).unwrap_err();
        assert_eq!(err, ForecastError::UnknownFeature("pres".to_string()));
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut r = row();
        r.set("tmax", 21.3).unwrap();
        assert_eq!(r.get("tmax"), Some(21.3));
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_set_unknown_column() {
        let mut r = row();
        assert!(r.set("tmin", 1.0).is_err());
    }
}
