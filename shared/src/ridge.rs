//! Ridge regression with an unpenalised intercept
//!
//! Fits `y = intercept + X·w` minimising `‖y − Xw − b‖² + α‖w‖²`. Inputs are
//! centred on their column means so the intercept is not shrunk, and the
//! regularised normal equations are solved by Cholesky decomposition. When
//! there are more features than samples the dual (kernel) system is solved
//! instead, which is smaller and yields the same coefficients.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// A fitted ridge regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    alpha: f64,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl Ridge {
    /// Fit on a row-major design matrix `x` (samples × features) and target `y`
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>, alpha: f64) -> ForecastResult<Self> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(ForecastError::EmptySeries);
        }
        if n_features == 0 {
            return Err(ForecastError::InvalidSeries(
                "no predictor columns".to_string(),
            ));
        }
        if y.len() != n_samples {
            return Err(ForecastError::ShapeMismatch {
                expected: n_samples,
                actual: y.len(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFinite("predictors".to_string()));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFinite("target".to_string()));
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(ForecastError::NonFinite("alpha".to_string()));
        }

        let x_mean = x.mean_axis(Axis(0)).ok_or(ForecastError::EmptySeries)?;
        let y_mean = y.mean().ok_or(ForecastError::EmptySeries)?;
        let xc = &x - &x_mean;
        let yc = &y - y_mean;

        let coefficients = if n_features <= n_samples {
            let mut gram = xc.t().dot(&xc);
            add_diagonal(&mut gram, alpha);
            let rhs = xc.t().dot(&yc);
            cholesky_solve(&gram, &rhs)?
        } else {
            let mut kernel = xc.dot(&xc.t());
            add_diagonal(&mut kernel, alpha);
            let dual = cholesky_solve(&kernel, &yc)?;
            xc.t().dot(&dual)
        };

        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(Self {
            alpha,
            coefficients: coefficients.to_vec(),
            intercept,
        })
    }

    /// Predict a single sample
    pub fn predict_one(&self, features: &[f64]) -> ForecastResult<f64> {
        if features.len() != self.coefficients.len() {
            return Err(ForecastError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        Ok(self.intercept
            + features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Build a model from known parameters
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64, alpha: f64) -> Self {
        Self {
            alpha,
            coefficients,
            intercept,
        }
    }
}

/// Pivots below this fraction of the largest diagonal entry are rank deficient
const PIVOT_TOLERANCE: f64 = 1e-12;

fn add_diagonal(m: &mut Array2<f64>, value: f64) {
    m.diag_mut().mapv_inplace(|d| d + value);
}

/// Solve `a·x = b` for symmetric positive definite `a`
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> ForecastResult<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    let scale = a.diag().iter().fold(1.0_f64, |m, v| m.max(v.abs()));
    let tolerance = PIVOT_TOLERANCE * scale;

    for j in 0..n {
        let mut d = a[[j, j]];
        for k in 0..j {
            d -= l[[j, k]] * l[[j, k]];
        }
        if !d.is_finite() || d <= tolerance {
            return Err(ForecastError::SingularMatrix);
        }
        let d = d.sqrt();
        l[[j, j]] = d;

        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / d;
        }
    }

    // forward: L·z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut s = b[i];
        for k in 0..i {
            s -= l[[i, k]] * z[k];
        }
        z[i] = s / l[[i, i]];
    }

    // backward: Lᵀ·x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut s = z[i];
        for k in (i + 1)..n {
            s -= l[[k, i]] * x[k];
        }
        x[i] = s / l[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_recovers_exact_line_with_tiny_alpha() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];
        let model = Ridge::fit(x.view(), y.view(), 1e-9).unwrap();
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-6);
        assert!((model.intercept() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shrinkage_matches_closed_form() {
        // one feature: w = Sxy / (Sxx + alpha)
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let model = Ridge::fit(x.view(), y.view(), 0.1).unwrap();
        let sxx = 5.0;
        let sxy = 10.0;
        let w = sxy / (sxx + 0.1);
        assert!((model.coefficients()[0] - w).abs() < 1e-12);
        assert!((model.intercept() - (5.0 - 2.5 * w)).abs() < 1e-12);
    }

    #[test]
    fn test_constant_feature_predicts_mean() {
        let x = Array2::from_elem((6, 1), 5.0);
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let model = Ridge::fit(x.view(), y.view(), 0.1).unwrap();
        assert_eq!(model.coefficients()[0], 0.0);
        assert!((model.predict_one(&[5.0]).unwrap() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_dual_form_agrees_with_primal() {
        // 2 samples, 3 features takes the kernel path
        let x = array![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];
        let y = array![1.0, 3.0];
        let model = Ridge::fit(x.view(), y.view(), 0.5).unwrap();

        let xc = &x - &x.mean_axis(Axis(0)).unwrap();
        let yc: Array1<f64> = &y - y.mean().unwrap();
        let mut gram = xc.t().dot(&xc);
        add_diagonal(&mut gram, 0.5);
        let primal = cholesky_solve(&gram, &xc.t().dot(&yc)).unwrap();

        for (a, b) in model.coefficients().iter().zip(primal.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fit_errors() {
        let empty = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert_eq!(
            Ridge::fit(empty.view(), y.view(), 0.1).unwrap_err(),
            ForecastError::EmptySeries
        );

        let x = array![[1.0], [2.0]];
        let short = array![1.0];
        assert!(matches!(
            Ridge::fit(x.view(), short.view(), 0.1),
            Err(ForecastError::ShapeMismatch { .. })
        ));

        let nan = array![[1.0], [f64::NAN]];
        let y = array![1.0, 2.0];
        assert!(matches!(
            Ridge::fit(nan.view(), y.view(), 0.1),
            Err(ForecastError::NonFinite(_))
        ));
    }

    #[test]
    fn test_zero_alpha_collinear_is_singular() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(
            Ridge::fit(x.view(), y.view(), 0.0).unwrap_err(),
            ForecastError::SingularMatrix
        );
    }

    #[test]
    fn test_zero_alpha_scaled_collinear_is_singular() {
        let x = array![
            [0.1, 0.3, 1.0],
            [0.2, 0.6, 0.0],
            [0.3, 0.9, 2.0],
            [0.7, 2.1, 1.0]
        ];
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            Ridge::fit(x.view(), y.view(), 0.0).unwrap_err(),
            ForecastError::SingularMatrix
        );
    }

    #[test]
    fn test_small_alpha_collinear_still_fits() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];
        let model = Ridge::fit(x.view(), y.view(), 1e-6).unwrap();
        assert!((model.predict_one(&[4.0, 8.0]).unwrap() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_predict_one_shape() {
        let model = Ridge::from_parts(vec![1.0, 2.0], 0.5, 0.1);
        assert_eq!(model.predict_one(&[1.0, 1.0]).unwrap(), 3.5);
        assert!(model.predict_one(&[1.0]).is_err());
    }
}
