//! Log-linear least squares
//!
//! The model is
//!
//! ```text
//! ln(total) = β0 + β1 ln(revenue) + β2 ln(intensity)
//!           + β3 ln(1 + employees) + β4 ln(1 + energy spend) + β5 ln(1 + area)
//! ```
//!
//! solved with SVD so the tall, nearly collinear design matrix (employees and
//! energy spend both track revenue) stays well-behaved. Predictions are
//! back-transformed with Duan's smearing factor.

use crate::error::BaselineError;
use crate::synthetic::TrainingSample;
use nalgebra::{DMatrix, DVector};

/// Number of model coefficients
pub const FEATURES: usize = 6;

/// Inputs to the model, all in natural units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    /// Annual revenue, USD
    pub revenue: f64,
    /// Industry intensity, t CO2e per $M revenue
    pub intensity: f64,
    /// Headcount
    pub employees: f64,
    /// Annual energy spend, USD
    pub energy_spend: f64,
    /// Floor area, sq ft
    pub facility_area: f64,
}

impl Features {
    fn row(&self) -> [f64; FEATURES] {
        [
            1.0,
            self.revenue.ln(),
            self.intensity.ln(),
            self.employees.max(0.0).ln_1p(),
            self.energy_spend.max(0.0).ln_1p(),
            self.facility_area.max(0.0).ln_1p(),
        ]
    }
}

impl From<&TrainingSample> for Features {
    fn from(s: &TrainingSample) -> Self {
        Self {
            revenue: s.revenue,
            intensity: s.industry.intensity(),
            employees: s.employees,
            energy_spend: s.energy_spend,
            facility_area: s.facility_area,
        }
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Progressively looser tolerances for near-singular designs
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fitted log-linear model
#[derive(Debug, Clone, PartialEq)]
pub struct LogLinearModel {
    coefficients: DVector<f64>,
    smearing: f64,
}

impl LogLinearModel {
    /// Fit on the given samples (indices into `samples`, repeats allowed)
    pub fn fit(samples: &[TrainingSample], indices: &[usize]) -> Result<Self, BaselineError> {
        if indices.len() < FEATURES {
            return Err(BaselineError::Regression(format!(
                "need at least {} samples, got {}",
                FEATURES,
                indices.len()
            )));
        }

        let mut x = DMatrix::<f64>::zeros(indices.len(), FEATURES);
        let mut y = DVector::<f64>::zeros(indices.len());
        for (row, &i) in indices.iter().enumerate() {
            let sample = samples
                .get(i)
                .ok_or_else(|| BaselineError::Regression(format!("sample index {} out of range", i)))?;
            for (col, v) in Features::from(sample).row().iter().enumerate() {
                x[(row, col)] = *v;
            }
            y[row] = sample.total.ln();
        }

        let coefficients = solve_least_squares(&x, &y)
            .ok_or_else(|| BaselineError::Regression("design matrix is singular".to_string()))?;

        let residuals = &y - &x * &coefficients;
        let smearing = residuals.iter().map(|r| r.exp()).sum::<f64>() / residuals.len() as f64;

        Ok(Self {
            coefficients,
            smearing,
        })
    }

    /// Fit on every sample
    pub fn fit_all(samples: &[TrainingSample]) -> Result<Self, BaselineError> {
        let indices: Vec<usize> = (0..samples.len()).collect();
        Self::fit(samples, &indices)
    }

    /// Predicted annual emissions, t CO2e
    pub fn predict(&self, features: &Features) -> f64 {
        let log_total: f64 = features
            .row()
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, b)| x * b)
            .sum();
        log_total.exp() * self.smearing
    }

    /// Coefficients in feature order
    pub fn coefficients(&self) -> &[f64] {
        self.coefficients.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaselineConfig;
    use crate::synthetic::generate;

    #[test]
    fn test_least_squares_solves_simple_system() {
        // y = 2 + 3x on x = [0, 1, 2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_fit_recovers_proportional_structure() {
        let samples = generate(&BaselineConfig::fast()).unwrap();
        let model = LogLinearModel::fit_all(&samples).unwrap();
        let beta = model.coefficients();

        // emissions scale with revenue and intensity
        assert!((beta[2] - 1.0).abs() < 0.1, "intensity elasticity {}", beta[2]);
        let revenue_elasticity = beta[1] + beta[3] + beta[4] + beta[5];
        assert!((revenue_elasticity - 1.0).abs() < 0.1, "revenue elasticity {}", revenue_elasticity);
    }

    #[test]
    fn test_too_few_samples() {
        let samples = generate(&BaselineConfig::fast()).unwrap();
        assert!(matches!(
            LogLinearModel::fit(&samples, &[0, 1, 2]),
            Err(BaselineError::Regression(_))
        ));
    }
}
