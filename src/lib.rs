//! XL Settlement - Excess-of-loss reinsurance settlement for agricultural exposure
//!
//! This library provides:
//! - Single-layer XL treaty settlement over aggregated premium/claims rows
//! - Proportional allocation of recovery and retention back to regions
//! - Stress-scenario overlay substituting model-predicted losses before settlement
//! - CSV exposure loading and JSON model artifact loading

pub mod config;
pub mod error;
pub mod exposure;
pub mod model;
pub mod scenario;
pub mod service;
pub mod settlement;
pub mod treaty;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use error::{ExposureError, ModelError, SettlementError, TreatyError};
pub use exposure::{ExposureRow, ExposureSource, RegionFilter};
pub use model::{LossModel, ModelArtifact};
pub use scenario::{apply_stress, FeatureSchema, ScenarioParameters};
pub use service::{SettlementRequest, SettlementService};
pub use settlement::{settle, RegionalSettlement, SettlementOutcome, SettlementResult};
pub use treaty::TreatyParameters;
