//! Linear regression model: intercept plus one coefficient per feature

use serde::{Deserialize, Serialize};

use super::LossModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearLossModel {
    pub intercept: f64,
    /// Coefficients aligned to the schema's feature order
    pub coefficients: Vec<f64>,
}

impl LinearLossModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl LossModel for LinearLossModel {
    fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(coef, x)| coef * x)
                .sum::<f64>()
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}
