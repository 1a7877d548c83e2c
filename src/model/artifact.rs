//! Trained model artifact: fitted model plus the ordered feature schema it expects
//!
//! Exported by the training pipeline as JSON:
//!
//! ```json
//! {
//!   "features": ["premium_earned", "anomaly_index", "precipitation_mm", "region_indicator_RS"],
//!   "indicator_prefix": "region_indicator_",
//!   "model": { "kind": "forest", "n_features": 4, "trees": [ { "nodes": [ ... ] } ] }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::{LinearLossModel, LossModel, RegressionForest, RegressionTree};
use crate::error::{ModelError, SettlementError};
use crate::exposure::ExposureRow;
use crate::scenario::{
    apply_stress, FeatureNames, FeatureSchema, ScenarioParameters, DEFAULT_INDICATOR_PREFIX,
};

/// Serialized model section of an artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearLossModel),
    Forest {
        n_features: usize,
        trees: Vec<RegressionTree>,
    },
}

impl ModelSpec {
    fn build(self) -> Result<Box<dyn LossModel>, ModelError> {
        let model: Box<dyn LossModel> = match self {
            ModelSpec::Linear(model) => Box::new(model),
            ModelSpec::Forest { n_features, trees } => {
                Box::new(RegressionForest::new(n_features, trees)?)
            }
        };
        Ok(model)
    }
}

fn default_indicator_prefix() -> String {
    DEFAULT_INDICATOR_PREFIX.to_string()
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    features: Vec<String>,
    #[serde(default = "default_indicator_prefix")]
    indicator_prefix: String,
    #[serde(default)]
    feature_names: Option<FeatureNames>,
    model: ModelSpec,
}

/// Read-only predictive artifact, loaded once and shared across requests
#[derive(Debug)]
pub struct ModelArtifact {
    schema: FeatureSchema,
    model: Box<dyn LossModel>,
}

impl ModelArtifact {
    /// Pair a model with its schema, checking the model's input width
    pub fn new(schema: FeatureSchema, model: Box<dyn LossModel>) -> Result<Self, SettlementError> {
        if let Some(expected) = model.input_width() {
            if expected != schema.len() {
                return Err(ModelError::WidthMismatch {
                    expected,
                    actual: schema.len(),
                }
                .into());
            }
        }
        Ok(Self { schema, model })
    }

    /// Load an artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettlementError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(ModelError::from)?;
        let artifact = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded model artifact from {} ({} features, {} region indicators)",
            path.display(),
            artifact.schema.len(),
            artifact.schema.indicator_regions().count()
        );
        Ok(artifact)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, SettlementError> {
        let file: ArtifactFile = serde_json::from_reader(reader).map_err(ModelError::from)?;
        Self::from_file(file)
    }

    pub fn from_json(json: &str) -> Result<Self, SettlementError> {
        let file: ArtifactFile = serde_json::from_str(json).map_err(ModelError::from)?;
        Self::from_file(file)
    }

    fn from_file(file: ArtifactFile) -> Result<Self, SettlementError> {
        let numeric = file.feature_names.unwrap_or_default();
        let schema = FeatureSchema::new(file.features, &file.indicator_prefix, &numeric)?;
        let model = file.model.build()?;
        Self::new(schema, model)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &dyn LossModel {
        self.model.as_ref()
    }

    /// Run the stress overlay with this artifact's model and schema
    pub fn stress(
        &self,
        rows: &[ExposureRow],
        params: &ScenarioParameters,
    ) -> Result<Vec<ExposureRow>, SettlementError> {
        apply_stress(rows, &self.schema, params, self.model())
    }
}
