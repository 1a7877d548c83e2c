//! Service configuration: file locations, business line and input unit scale

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::exposure::DEFAULT_BUSINESS_LINE;
use crate::treaty::DEFAULT_UNIT_SCALE;

/// Default location of the aggregated exposure CSV
pub const DEFAULT_DATA_PATH: &str = "data/exposure.csv";

/// Default location of the exported model artifact
pub const DEFAULT_MODEL_PATH: &str = "data/cat_model.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    /// Only rows tagged with this line are settled
    pub business_line: u32,
    /// Multiplier applied to user-facing priority/capacity figures
    pub unit_scale: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            business_line: DEFAULT_BUSINESS_LINE,
            unit_scale: DEFAULT_UNIT_SCALE,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `XL_DATA_PATH`, `XL_MODEL_PATH`, `XL_BUSINESS_LINE`
    /// and `XL_UNIT_SCALE`. Unparseable numbers are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("XL_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("XL_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("XL_BUSINESS_LINE") {
            match raw.trim().parse() {
                Ok(line) => config.business_line = line,
                Err(_) => warn!("Ignoring XL_BUSINESS_LINE={:?}: not a line code", raw),
            }
        }
        if let Some(raw) = lookup("XL_UNIT_SCALE") {
            match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale > 0.0 => config.unit_scale = scale,
                _ => warn!("Ignoring XL_UNIT_SCALE={:?}: not a positive number", raw),
            }
        }

        config
    }
}
