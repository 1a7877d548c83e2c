//! Per-row model input reconstruction
//!
//! The vector is produced by walking the schema's slots, so its layout always
//! matches the training order.

use super::params::ScenarioParameters;
use super::schema::{Feature, FeatureSchema};
use crate::exposure::ExposureRow;

/// Model inputs for one exposure row, laid out in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named feature, looked up through the schema
    pub fn get(&self, schema: &FeatureSchema, name: &str) -> Option<f64> {
        schema.position(name).and_then(|idx| self.values.get(idx).copied())
    }
}

/// Build the stressed model input for `row`.
/// Indicator columns for regions other than the row's are 0.
pub fn build_feature_vector(
    row: &ExposureRow,
    schema: &FeatureSchema,
    params: &ScenarioParameters,
) -> FeatureVector {
    let precipitation = params.precipitation_for(&row.region);

    let values = schema
        .features()
        .iter()
        .map(|feature| match feature {
            Feature::PremiumEarned => row.premium_earned,
            Feature::AnomalyIndex => params.anomaly_index,
            Feature::Precipitation => precipitation,
            Feature::RegionIndicator(code) => {
                if *code == row.region {
                    1.0
                } else {
                    0.0
                }
            }
        })
        .collect();

    FeatureVector { values }
}
