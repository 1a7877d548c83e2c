//! Pre-loaded settlement service
//!
//! Holds the exposure source and the (optional) model artifact for the life of the
//! process, and exposes the two operations callers use: a plain settlement and a
//! stress-scenario settlement. Rows are loaded fresh on every call.
//!
//! # Example
//! ```ignore
//! let service = SettlementService::from_config(&ServiceConfig::from_env());
//! let request = SettlementRequest::new(150.0, 200.0, RegionFilter::All);
//! match service.calculate(&request)? {
//!     SettlementOutcome::Settled(result) => println!("{:.2}", result.recovery),
//!     SettlementOutcome::NoMatchingData => println!("no rows"),
//! }
//! ```

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::SettlementError;
use crate::exposure::{CsvExposureSource, ExposureRow, ExposureSource, RegionFilter};
use crate::model::ModelArtifact;
use crate::scenario::ScenarioParameters;
use crate::settlement::{SettlementEngine, SettlementOutcome};
use crate::treaty::{TreatyParameters, DEFAULT_UNIT_SCALE};

/// Caller input; priority and capacity are in the service's unit scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub priority: f64,
    pub capacity: f64,
    #[serde(default)]
    pub region: RegionFilter,
}

impl SettlementRequest {
    pub fn new(priority: f64, capacity: f64, region: RegionFilter) -> Self {
        Self {
            priority,
            capacity,
            region,
        }
    }
}

pub struct SettlementService {
    source: Box<dyn ExposureSource>,
    artifact: Option<Arc<ModelArtifact>>,
    scenario: ScenarioParameters,
    unit_scale: f64,
}

impl SettlementService {
    pub fn new(source: Box<dyn ExposureSource>, artifact: Option<Arc<ModelArtifact>>) -> Self {
        Self {
            source,
            artifact,
            scenario: ScenarioParameters::default(),
            unit_scale: DEFAULT_UNIT_SCALE,
        }
    }

    /// CSV-backed service. A missing or invalid model artifact is logged and leaves
    /// the stress operation unavailable; plain settlement still works.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let source = CsvExposureSource::new(&config.data_path, config.business_line);
        let artifact = match ModelArtifact::load(&config.model_path) {
            Ok(artifact) => Some(Arc::new(artifact)),
            Err(e) => {
                warn!(
                    "Model artifact {} not loaded, stress scenarios disabled: {}",
                    config.model_path.display(),
                    e
                );
                None
            }
        };

        Self::new(Box::new(source), artifact).with_unit_scale(config.unit_scale)
    }

    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = unit_scale;
        self
    }

    pub fn with_scenario(mut self, scenario: ScenarioParameters) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn has_model(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn scenario(&self) -> &ScenarioParameters {
        &self.scenario
    }

    /// Settle the treaty against observed losses
    pub fn calculate(&self, request: &SettlementRequest) -> Result<SettlementOutcome, SettlementError> {
        let engine = self.engine_for(request)?;
        let rows = self.load_rows(&request.region)?;
        Ok(engine.settle(&rows))
    }

    /// Settle the treaty against model-predicted stress losses
    pub fn predict_stress(
        &self,
        request: &SettlementRequest,
    ) -> Result<SettlementOutcome, SettlementError> {
        let engine = self.engine_for(request)?;
        let artifact = self.artifact.as_ref().ok_or(SettlementError::ModelUnavailable)?;

        let rows = self.load_rows(&request.region)?;
        if rows.is_empty() {
            return Ok(SettlementOutcome::NoMatchingData);
        }

        let stressed = artifact.stress(&rows, &self.scenario)?;
        Ok(engine.settle(&stressed))
    }

    fn engine_for(&self, request: &SettlementRequest) -> Result<SettlementEngine, SettlementError> {
        let treaty = TreatyParameters::from_scaled(request.priority, request.capacity, self.unit_scale)?;
        Ok(SettlementEngine::new(treaty))
    }

    fn load_rows(&self, region: &RegionFilter) -> Result<Vec<ExposureRow>, SettlementError> {
        let rows = region.apply(self.source.load()?);
        info!("Settling {} rows for {}", rows.len(), region);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExposureError;
    use crate::model::LinearLossModel;
    use crate::scenario::{Feature, FeatureSchema};
    use approx::assert_relative_eq;

    fn rows() -> Vec<ExposureRow> {
        vec![
            ExposureRow::new("SP", "2023-01", 100.0, 80.0, 30.0),
            ExposureRow::new("RS", "2023-01", 100.0, 80.0, 50.0),
            ExposureRow::new("RS", "2023-02", 100.0, 80.0, 20.0),
        ]
    }

    fn artifact() -> Arc<ModelArtifact> {
        let schema = FeatureSchema::from_features(vec![
            Feature::PremiumEarned,
            Feature::AnomalyIndex,
            Feature::Precipitation,
            Feature::RegionIndicator("RS".to_string()),
        ])
        .unwrap();
        // loss = premium + 100 for RS
        let model = LinearLossModel::new(0.0, vec![1.0, 0.0, 0.0, 100.0]);
        Arc::new(ModelArtifact::new(schema, Box::new(model)).unwrap())
    }

    fn service(artifact: Option<Arc<ModelArtifact>>) -> SettlementService {
        SettlementService::new(Box::new(rows()), artifact).with_unit_scale(1.0)
    }

    struct FailingSource;

    impl ExposureSource for FailingSource {
        fn load(&self) -> Result<Vec<ExposureRow>, ExposureError> {
            Err(ExposureError::MissingRegion)
        }
    }

    #[test]
    fn test_calculate_all_regions() {
        let outcome = service(None)
            .calculate(&SettlementRequest::new(0.0, 40.0, RegionFilter::All))
            .unwrap();
        let result = outcome.settled().unwrap();

        assert_relative_eq!(result.loss_gross_total, 100.0);
        assert_relative_eq!(result.recovery, 40.0);
        assert_relative_eq!(result.region("RS").unwrap().recovery, 28.0, epsilon = 1e-9);
        assert_relative_eq!(result.region("SP").unwrap().recovery, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_region_filter_and_no_data() {
        let svc = service(None);

        let rs = svc
            .calculate(&SettlementRequest::new(0.0, 1_000.0, RegionFilter::parse("RS")))
            .unwrap();
        assert_relative_eq!(rs.settled().unwrap().loss_gross_total, 70.0);

        let none = svc
            .calculate(&SettlementRequest::new(0.0, 1_000.0, RegionFilter::parse("AC")))
            .unwrap();
        assert!(none.is_no_data());
    }

    #[test]
    fn test_unit_scale_applied() {
        let svc = SettlementService::new(Box::new(rows()), None).with_unit_scale(10.0);
        let outcome = svc
            .calculate(&SettlementRequest::new(2.0, 5.0, RegionFilter::All))
            .unwrap();
        let result = outcome.settled().unwrap();

        assert_eq!(result.treaty.priority(), 20.0);
        assert_relative_eq!(result.recovery, 50.0);
    }

    #[test]
    fn test_stress_without_model_is_unavailable() {
        let err = service(None)
            .predict_stress(&SettlementRequest::new(0.0, 10.0, RegionFilter::All))
            .unwrap_err();
        assert!(err.is_service_unavailable());
    }

    #[test]
    fn test_stress_replaces_losses() {
        let svc = service(Some(artifact()));
        assert!(svc.has_model());

        let outcome = svc
            .predict_stress(&SettlementRequest::new(100.0, 1_000.0, RegionFilter::All))
            .unwrap();
        let result = outcome.settled().unwrap();

        // SP: 100, RS: 200 + 200
        assert_relative_eq!(result.loss_gross_total, 500.0);
        assert_relative_eq!(result.recovery, 400.0);
        assert_relative_eq!(result.region("RS").unwrap().loss_gross, 400.0);
        assert_relative_eq!(result.premium_total, 300.0);
    }

    #[test]
    fn test_stress_with_empty_filter_is_no_data() {
        let outcome = service(Some(artifact()))
            .predict_stress(&SettlementRequest::new(0.0, 10.0, RegionFilter::parse("AM")))
            .unwrap();
        assert!(outcome.is_no_data());
    }

    #[test]
    fn test_data_failure_surfaces() {
        let svc = SettlementService::new(Box::new(FailingSource), None);
        let err = svc
            .calculate(&SettlementRequest::new(0.0, 10.0, RegionFilter::All))
            .unwrap_err();
        assert!(matches!(err, SettlementError::DataUnavailable(_)));
    }

    #[test]
    fn test_negative_treaty_rejected() {
        let err = service(None)
            .calculate(&SettlementRequest::new(-1.0, 10.0, RegionFilter::All))
            .unwrap_err();
        assert!(matches!(err, SettlementError::InvalidTreaty(_)));
    }
}
