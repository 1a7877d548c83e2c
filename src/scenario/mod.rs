//! Stress-scenario overlay: rebuild model inputs per row and substitute predicted losses

mod features;
mod overlay;
mod params;
mod schema;

pub use features::{build_feature_vector, FeatureVector};
pub use overlay::apply_stress;
pub use params::ScenarioParameters;
pub use schema::{Feature, FeatureNames, FeatureSchema, DEFAULT_INDICATOR_PREFIX};
