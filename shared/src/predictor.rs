//! Sequential next-day predictor
//!
//! Three ridge models are fitted over the full series, one per target, all on
//! the same predictor columns. `tmax` is predicted from the last observation.
//! The `tmin` and `prcp` inputs are built from the last observation widened
//! with the earlier targets, the earlier predictions are written into those
//! slots, and the row is then restricted back to the predictor columns.
//! Targets are never predictors, so the written values are dropped again and
//! all three models see the same input row.

use serde::{Deserialize, Serialize};

use crate::error::ForecastResult;
use crate::models::{FeatureRow, Prediction, Series};
use crate::ridge::Ridge;
use crate::types::Target;

/// Regularisation strength used when none is configured
pub const DEFAULT_ALPHA: f64 = 0.1;

/// The three fitted models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetModels {
    pub tmax: Ridge,
    pub tmin: Ridge,
    pub prcp: Ridge,
}

impl TargetModels {
    /// Fit one independent model per target on `predictors`
    pub fn fit(series: &Series, predictors: &[String], alpha: f64) -> ForecastResult<Self> {
        let x = series.matrix(predictors)?;
        let fit = |target: Target| -> ForecastResult<Ridge> {
            let y = ndarray::ArrayView1::from(series.column(target.column())?);
            Ridge::fit(x.view(), y, alpha)
        };

        Ok(Self {
            tmax: fit(Target::Tmax)?,
            tmin: fit(Target::Tmin)?,
            prcp: fit(Target::Prcp)?,
        })
    }

    pub fn get(&self, target: Target) -> &Ridge {
        match target {
            Target::Tmax => &self.tmax,
            Target::Tmin => &self.tmin,
            Target::Prcp => &self.prcp,
        }
    }
}

/// Input rows actually given to each model, with the unrounded outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionTrace {
    pub tmax_input: FeatureRow,
    pub tmin_input: FeatureRow,
    pub prcp_input: FeatureRow,
    pub raw: Prediction,
}

/// Result of one predictor run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predictors: Vec<String>,
    pub prediction: Prediction,
    pub trace: PredictionTrace,
}

/// Fits the per-target models and chains their predictions
#[derive(Debug, Clone, Copy)]
pub struct SequentialPredictor {
    alpha: f64,
}

impl Default for SequentialPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl SequentialPredictor {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fit fresh models on `series` and predict the following day
    pub fn run(&self, series: &Series, predictors: &[String]) -> ForecastResult<Forecast> {
        let models = TargetModels::fit(series, predictors, self.alpha)?;
        tracing::debug!(
            alpha = self.alpha,
            rows = series.len(),
            features = predictors.len(),
            "Fitted target models"
        );
        self.predict(&models, series, predictors)
    }

    /// Chain the three predictions from already fitted models
    pub fn predict(
        &self,
        models: &TargetModels,
        series: &Series,
        predictors: &[String],
    ) -> ForecastResult<Forecast> {
        let last = series.last_row()?;

        let tmax_input = last.select(predictors)?;
        let tmax = models.tmax.predict_one(&tmax_input.values())?;

        let mut widened = last.select(&with_columns(predictors, &[Target::Tmax]))?;
        widened.set(Target::Tmax.column(), tmax)?;
        let tmin_input = widened.select(predictors)?;
        let tmin = models.tmin.predict_one(&tmin_input.values())?;

        let mut widened = last.select(&with_columns(predictors, &[Target::Tmax, Target::Tmin]))?;
        widened.set(Target::Tmax.column(), tmax)?;
        widened.set(Target::Tmin.column(), tmin)?;
        let prcp_input = widened.select(predictors)?;
        let prcp = models.prcp.predict_one(&prcp_input.values())?;

        let raw = Prediction { tmax, tmin, prcp };
        let prediction = raw.rounded();
        tracing::debug!(
            tmax = prediction.tmax,
            tmin = prediction.tmin,
            prcp = prediction.prcp,
            "Predicted next day"
        );

        Ok(Forecast {
            predictors: predictors.to_vec(),
            prediction,
            trace: PredictionTrace {
                tmax_input,
                tmin_input,
                prcp_input,
                raw,
            },
        })
    }
}

fn with_columns(predictors: &[String], targets: &[Target]) -> Vec<String> {
    predictors
        .iter()
        .cloned()
        .chain(targets.iter().map(|t| t.column().to_string()))
        .collect()
}
