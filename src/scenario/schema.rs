//! Training-time feature schema
//!
//! The schema is classified once, at construction, into typed [`Feature`] slots.
//! Region indicator columns are recognised through the schema's declared
//! `indicator_prefix`; any name that is neither a known numeric feature nor an
//! indicator is a mismatch.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SettlementError;

pub const DEFAULT_INDICATOR_PREFIX: &str = "region_indicator_";

/// Column names of the non-indicator features in a trained schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureNames {
    pub premium_earned: String,
    pub anomaly_index: String,
    pub precipitation: String,
}

impl Default for FeatureNames {
    fn default() -> Self {
        Self {
            premium_earned: "premium_earned".to_string(),
            anomaly_index: "anomaly_index".to_string(),
            precipitation: "precipitation_mm".to_string(),
        }
    }
}

/// One slot of the model's input vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    PremiumEarned,
    AnomalyIndex,
    Precipitation,
    /// One-hot indicator for the given region code
    RegionIndicator(String),
}

/// Ordered feature list the model was trained on
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
    features: Vec<Feature>,
    indicator_prefix: String,
}

impl FeatureSchema {
    /// Classify `names` (in training order) against the declared numeric names and
    /// indicator prefix.
    ///
    /// Fails with `SchemaMismatch` when a numeric feature is absent, a name cannot be
    /// classified, or a name appears twice.
    pub fn new(
        names: Vec<String>,
        indicator_prefix: &str,
        numeric: &FeatureNames,
    ) -> Result<Self, SettlementError> {
        let mut features = Vec::with_capacity(names.len());
        let mut unexpected = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for name in &names {
            if !seen.insert(name.as_str()) {
                unexpected.push(format!("{} (duplicate)", name));
                continue;
            }

            let feature = if *name == numeric.premium_earned {
                Some(Feature::PremiumEarned)
            } else if *name == numeric.anomaly_index {
                Some(Feature::AnomalyIndex)
            } else if *name == numeric.precipitation {
                Some(Feature::Precipitation)
            } else {
                name.strip_prefix(indicator_prefix)
                    .filter(|code| !code.is_empty() && !indicator_prefix.is_empty())
                    .map(|code| Feature::RegionIndicator(code.to_string()))
            };

            match feature {
                Some(f) => features.push(f),
                None => unexpected.push(name.clone()),
            }
        }
        drop(seen);

        let missing: Vec<String> = [
            (Feature::PremiumEarned, &numeric.premium_earned),
            (Feature::AnomalyIndex, &numeric.anomaly_index),
            (Feature::Precipitation, &numeric.precipitation),
        ]
        .into_iter()
        .filter(|(feature, _)| !features.contains(feature))
        .map(|(_, name)| name.clone())
        .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(SettlementError::SchemaMismatch { missing, unexpected });
        }

        Ok(Self {
            names,
            features,
            indicator_prefix: indicator_prefix.to_string(),
        })
    }

    /// Schema with the default numeric names and indicator prefix
    pub fn with_defaults(names: Vec<String>) -> Result<Self, SettlementError> {
        Self::new(names, DEFAULT_INDICATOR_PREFIX, &FeatureNames::default())
    }

    /// Build a schema from typed slots, naming them with the defaults
    pub fn from_features(features: Vec<Feature>) -> Result<Self, SettlementError> {
        let numeric = FeatureNames::default();
        let names = features
            .iter()
            .map(|f| match f {
                Feature::PremiumEarned => numeric.premium_earned.clone(),
                Feature::AnomalyIndex => numeric.anomaly_index.clone(),
                Feature::Precipitation => numeric.precipitation.clone(),
                Feature::RegionIndicator(code) => format!("{}{}", DEFAULT_INDICATOR_PREFIX, code),
            })
            .collect();
        Self::new(names, DEFAULT_INDICATOR_PREFIX, &numeric)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn indicator_prefix(&self) -> &str {
        &self.indicator_prefix
    }

    /// Region codes that have an indicator column, in schema order
    pub fn indicator_regions(&self) -> impl Iterator<Item = &str> {
        self.features.iter().filter_map(|f| match f {
            Feature::RegionIndicator(code) => Some(code.as_str()),
            _ => None,
        })
    }

    /// Position of a named feature
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classifies_in_declared_order() {
        let schema = FeatureSchema::with_defaults(names(&[
            "premium_earned",
            "anomaly_index",
            "precipitation_mm",
            "region_indicator_MG",
            "region_indicator_RS",
        ]))
        .unwrap();

        assert_eq!(schema.len(), 5);
        assert_eq!(schema.features()[0], Feature::PremiumEarned);
        assert_eq!(schema.features()[4], Feature::RegionIndicator("RS".to_string()));
        assert_eq!(schema.indicator_regions().collect::<Vec<_>>(), vec!["MG", "RS"]);
        assert_eq!(schema.position("region_indicator_MG"), Some(3));
    }

    #[test]
    fn test_custom_names_and_prefix() {
        let numeric = FeatureNames {
            premium_earned: "Premio_Ganho".to_string(),
            anomaly_index: "Anomalia_El_Nino".to_string(),
            precipitation: "Precipitacao_mm".to_string(),
        };
        let schema = FeatureSchema::new(
            names(&["Premio_Ganho", "Anomalia_El_Nino", "Precipitacao_mm", "UF_PR", "UF_RS"]),
            "UF_",
            &numeric,
        )
        .unwrap();

        assert_eq!(schema.indicator_prefix(), "UF_");
        assert_eq!(schema.indicator_regions().collect::<Vec<_>>(), vec!["PR", "RS"]);
    }

    #[test]
    fn test_missing_numeric_feature() {
        let err = FeatureSchema::with_defaults(names(&["premium_earned", "precipitation_mm"]))
            .unwrap_err();
        match err {
            SettlementError::SchemaMismatch { missing, unexpected } => {
                assert_eq!(missing, vec!["anomaly_index".to_string()]);
                assert!(unexpected.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_and_duplicate_names() {
        let err = FeatureSchema::with_defaults(names(&[
            "premium_earned",
            "anomaly_index",
            "precipitation_mm",
            "soil_moisture",
            "region_indicator_",
            "anomaly_index",
        ]))
        .unwrap_err();
        match err {
            SettlementError::SchemaMismatch { missing, unexpected } => {
                assert!(missing.is_empty());
                assert_eq!(unexpected.len(), 3);
                assert!(unexpected.contains(&"soil_moisture".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_features_uses_default_names() {
        let schema = FeatureSchema::from_features(vec![
            Feature::RegionIndicator("SP".to_string()),
            Feature::Precipitation,
            Feature::AnomalyIndex,
            Feature::PremiumEarned,
        ])
        .unwrap();
        assert_eq!(schema.names()[0], "region_indicator_SP");
        assert_eq!(schema.names()[1], "precipitation_mm");
    }
}
