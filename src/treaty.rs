//! Single-layer excess-of-loss treaty terms

use crate::error::TreatyError;
use serde::{Deserialize, Serialize};

/// Multiplier from the "millions" figures entered by users to absolute currency
pub const DEFAULT_UNIT_SCALE: f64 = 1_000_000.0;

/// Priority (attachment point) and capacity (layer width) in absolute currency units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTreaty")]
pub struct TreatyParameters {
    priority: f64,
    capacity: f64,
}

/// Unvalidated wire shape; deserialization goes through `TreatyParameters::new`
#[derive(Debug, Deserialize)]
struct RawTreaty {
    priority: f64,
    capacity: f64,
}

impl TryFrom<RawTreaty> for TreatyParameters {
    type Error = TreatyError;

    fn try_from(raw: RawTreaty) -> Result<Self, Self::Error> {
        Self::new(raw.priority, raw.capacity)
    }
}

impl TreatyParameters {
    /// Build validated treaty terms. Negative or non-finite values are rejected.
    pub fn new(priority: f64, capacity: f64) -> Result<Self, TreatyError> {
        validate("priority", priority)?;
        validate("capacity", capacity)?;
        Ok(Self { priority, capacity })
    }

    /// Build terms from user-facing figures expressed in `unit_scale` units
    /// (e.g. millions with `DEFAULT_UNIT_SCALE`)
    pub fn from_scaled(priority: f64, capacity: f64, unit_scale: f64) -> Result<Self, TreatyError> {
        validate("unit_scale", unit_scale)?;
        Self::new(priority * unit_scale, capacity * unit_scale)
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Loss level above which nothing more is recovered
    pub fn exhaustion_point(&self) -> f64 {
        self.priority + self.capacity
    }

    /// Amount ceded for a given gross loss: the excess over priority, capped at capacity
    pub fn recovery_for(&self, loss_gross: f64) -> f64 {
        (loss_gross - self.priority).min(self.capacity).max(0.0)
    }
}

fn validate(field: &'static str, value: f64) -> Result<(), TreatyError> {
    if !value.is_finite() {
        return Err(TreatyError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(TreatyError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_layers() {
        assert_eq!(
            TreatyParameters::new(-1.0, 10.0),
            Err(TreatyError::Negative { field: "priority", value: -1.0 })
        );
        assert_eq!(
            TreatyParameters::new(1.0, -10.0),
            Err(TreatyError::Negative { field: "capacity", value: -10.0 })
        );
        assert!(matches!(
            TreatyParameters::new(f64::NAN, 1.0),
            Err(TreatyError::NotFinite { field: "priority", .. })
        ));
    }

    #[test]
    fn test_scaling_from_millions() {
        let treaty = TreatyParameters::from_scaled(150.0, 200.0, DEFAULT_UNIT_SCALE).unwrap();
        assert_eq!(treaty.priority(), 150_000_000.0);
        assert_eq!(treaty.capacity(), 200_000_000.0);
        assert_eq!(treaty.exhaustion_point(), 350_000_000.0);
    }

    #[test]
    fn test_recovery_layer() {
        let treaty = TreatyParameters::new(20.0, 50.0).unwrap();
        assert_eq!(treaty.recovery_for(10.0), 0.0); // below attachment
        assert_eq!(treaty.recovery_for(20.0), 0.0);
        assert_eq!(treaty.recovery_for(50.0), 30.0);
        assert_eq!(treaty.recovery_for(70.0), 50.0); // exhausted
        assert_eq!(treaty.recovery_for(1_000.0), 50.0);
    }

    #[test]
    fn test_zero_capacity_recovers_nothing() {
        let treaty = TreatyParameters::new(0.0, 0.0).unwrap();
        assert_eq!(treaty.recovery_for(500.0), 0.0);
    }

    #[test]
    fn test_deserialize_validates_layer() {
        let err = serde_json::from_str::<TreatyParameters>(r#"{"priority":-50.0,"capacity":100.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("priority"));
        assert!(serde_json::from_str::<TreatyParameters>(r#"{"priority":1.0,"capacity":"inf"}"#).is_err());

        let treaty: TreatyParameters =
            serde_json::from_str(r#"{"priority":20.0,"capacity":50.0}"#).unwrap();
        assert_eq!(treaty, TreatyParameters::new(20.0, 50.0).unwrap());
        assert_eq!(treaty.recovery_for(10.0), 0.0);
    }

    #[test]
    fn test_serialized_terms_round_trip_through_validation() {
        let treaty = TreatyParameters::new(5.0, 7.5).unwrap();
        let json = serde_json::to_string(&treaty).unwrap();
        assert_eq!(json, r#"{"priority":5.0,"capacity":7.5}"#);
        assert_eq!(serde_json::from_str::<TreatyParameters>(&json).unwrap(), treaty);
    }
}
