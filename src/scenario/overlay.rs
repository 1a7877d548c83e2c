//! Replace observed gross losses with model-predicted stress losses

use log::{info, warn};
use rayon::prelude::*;

use super::features::build_feature_vector;
use super::params::ScenarioParameters;
use super::schema::FeatureSchema;
use crate::error::{ModelError, SettlementError};
use crate::exposure::ExposureRow;
use crate::model::LossModel;

/// Produce a new row set whose `loss_gross` is the model's stress prediction.
///
/// Cardinality, order, keys and premiums are preserved; `rows` is not modified.
/// Negative predictions are floored at zero; non-finite ones are an error. A model
/// whose input width differs from the schema is rejected before any prediction.
pub fn apply_stress(
    rows: &[ExposureRow],
    schema: &FeatureSchema,
    params: &ScenarioParameters,
    model: &dyn LossModel,
) -> Result<Vec<ExposureRow>, SettlementError> {
    if let Some(expected) = model.input_width() {
        if expected != schema.len() {
            return Err(ModelError::WidthMismatch {
                expected,
                actual: schema.len(),
            }
            .into());
        }
    }

    info!(
        "Applying stress scenario to {} rows (anomaly={}, southern={:?})",
        rows.len(),
        params.anomaly_index,
        params.southern_regions
    );

    rows.par_iter()
        .map(|row| -> Result<ExposureRow, SettlementError> {
            let features = build_feature_vector(row, schema, params);
            let predicted = model.predict(features.values());
            if !predicted.is_finite() {
                return Err(ModelError::NonFinitePrediction {
                    region: row.region.clone(),
                }
                .into());
            }
            if predicted < 0.0 {
                warn!(
                    "Negative stress loss {} predicted for {} {}, floored at 0",
                    predicted, row.region, row.period
                );
                return Ok(row.with_loss_gross(0.0));
            }
            Ok(row.with_loss_gross(predicted))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearLossModel;
    use crate::scenario::Feature;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_features(vec![
            Feature::PremiumEarned,
            Feature::AnomalyIndex,
            Feature::Precipitation,
            Feature::RegionIndicator("PR".to_string()),
            Feature::RegionIndicator("RS".to_string()),
        ])
        .unwrap()
    }

    fn rows() -> Vec<ExposureRow> {
        vec![
            ExposureRow::new("RS", "2023-03", 100.0, 80.0, 10.0),
            ExposureRow::new("SP", "2023-03", 200.0, 150.0, 20.0),
            ExposureRow::new("PR", "2023-04", 50.0, 50.0, 5.0),
        ]
    }

    #[test]
    fn test_losses_replaced_by_prediction() {
        // loss = 2 * premium + 1000 * RS indicator + precipitation
        let model = LinearLossModel::new(0.0, vec![2.0, 0.0, 1.0, 0.0, 1_000.0]);
        let source = rows();
        let stressed = apply_stress(&source, &schema(), &ScenarioParameters::default(), &model)
            .unwrap();

        assert_eq!(stressed.len(), source.len());
        assert_eq!(stressed[0].loss_gross, 200.0 + 1_000.0 + 400.0);
        assert_eq!(stressed[1].loss_gross, 400.0 + 30.0);
        assert_eq!(stressed[2].loss_gross, 100.0 + 400.0);

        for (before, after) in source.iter().zip(&stressed) {
            assert_eq!(before.region, after.region);
            assert_eq!(before.period, after.period);
            assert_eq!(before.premium_earned, after.premium_earned);
            assert_eq!(before.premium_retained, after.premium_retained);
        }
        // source untouched
        assert_eq!(source[0].loss_gross, 10.0);
    }

    #[test]
    fn test_negative_prediction_floored() {
        let model = LinearLossModel::new(-1e9, vec![0.0; 5]);
        let stressed =
            apply_stress(&rows(), &schema(), &ScenarioParameters::default(), &model).unwrap();
        assert!(stressed.iter().all(|r| r.loss_gross == 0.0));
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let model = LinearLossModel::new(0.0, vec![1.0; 3]);
        let err = apply_stress(&rows(), &schema(), &ScenarioParameters::default(), &model)
            .unwrap_err();
        assert!(matches!(
            err,
            SettlementError::Model(ModelError::WidthMismatch { expected: 3, actual: 5 })
        ));
    }

    #[test]
    fn test_non_finite_prediction_rejected() {
        let model = LinearLossModel::new(f64::NAN, vec![0.0; 5]);
        let err = apply_stress(&rows(), &schema(), &ScenarioParameters::default(), &model)
            .unwrap_err();
        assert!(matches!(
            err,
            SettlementError::Model(ModelError::NonFinitePrediction { .. })
        ));
    }

    #[test]
    fn test_empty_rows() {
        let model = LinearLossModel::new(1.0, vec![0.0; 5]);
        let stressed =
            apply_stress(&[], &schema(), &ScenarioParameters::default(), &model).unwrap();
        assert!(stressed.is_empty());
    }
}
