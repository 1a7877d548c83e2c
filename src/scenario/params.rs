//! Fixed stress values fed to the model in place of observed climate features

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Climate inputs for one stress scenario
///
/// Precipitation depends on a two-way region split: the southern group gets
/// `southern_precipitation_mm` (flood / hail), everyone else gets
/// `other_precipitation_mm` (drought).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Oceanic Niño anomaly applied to every region
    pub anomaly_index: f64,

    /// Region codes in the high-exposure southern group
    pub southern_regions: BTreeSet<String>,

    pub southern_precipitation_mm: f64,

    pub other_precipitation_mm: f64,
}

impl ScenarioParameters {
    /// Severe El Niño: anomaly +2.8, deluge in RS/PR, drought elsewhere
    pub fn severe_el_nino() -> Self {
        Self {
            anomaly_index: 2.8,
            southern_regions: ["RS", "PR"].iter().map(|s| s.to_string()).collect(),
            southern_precipitation_mm: 400.0,
            other_precipitation_mm: 30.0,
        }
    }

    pub fn is_southern(&self, region: &str) -> bool {
        self.southern_regions.contains(region)
    }

    pub fn precipitation_for(&self, region: &str) -> f64 {
        if self.is_southern(region) {
            self.southern_precipitation_mm
        } else {
            self.other_precipitation_mm
        }
    }
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self::severe_el_nino()
    }
}
