//! Settlement output structures

use crate::treaty::TreatyParameters;
use serde::{Deserialize, Serialize};

/// Share of the treaty settlement attributed to one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSettlement {
    pub region: String,
    /// Gross loss summed over all of the region's rows
    pub loss_gross: f64,
    /// Region's share of total gross loss (0 when total gross loss is 0)
    pub weight: f64,
    pub recovery: f64,
    pub retention: f64,
}

/// Complete settlement of one treaty against one row set
///
/// `regions` is sorted ascending by region code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Terms the settlement was computed with (absolute units)
    pub treaty: TreatyParameters,

    // Aggregate totals
    pub premium_total: f64,
    pub premium_retained_total: f64,
    pub loss_gross_total: f64,

    // Treaty outcome
    pub recovery: f64,
    pub retention_net: f64,

    // Ratios in percent
    pub loss_ratio_gross_pct: f64,
    pub loss_ratio_retained_pct: f64,

    /// Per-region breakdown
    pub regions: Vec<RegionalSettlement>,
}

impl SettlementResult {
    /// Look up the breakdown entry for a region
    pub fn region(&self, code: &str) -> Option<&RegionalSettlement> {
        self.regions.iter().find(|r| r.region == code)
    }

    /// Whether the gross loss pierced the priority
    pub fn layer_attached(&self) -> bool {
        self.recovery > 0.0
    }

    /// Whether the whole layer capacity was consumed
    pub fn layer_exhausted(&self) -> bool {
        self.treaty.capacity() > 0.0 && self.recovery >= self.treaty.capacity()
    }
}

/// Outcome of a settlement call
///
/// An empty row set is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettlementOutcome {
    Settled(SettlementResult),
    NoMatchingData,
}

impl SettlementOutcome {
    pub fn settled(&self) -> Option<&SettlementResult> {
        match self {
            SettlementOutcome::Settled(result) => Some(result),
            SettlementOutcome::NoMatchingData => None,
        }
    }

    pub fn into_settled(self) -> Option<SettlementResult> {
        match self {
            SettlementOutcome::Settled(result) => Some(result),
            SettlementOutcome::NoMatchingData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, SettlementOutcome::NoMatchingData)
    }
}
