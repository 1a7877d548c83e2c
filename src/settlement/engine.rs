//! Core XL settlement calculation
//!
//! Pure function of (rows, treaty). The treaty recovery is computed on the aggregate
//! gross loss and then allocated back to regions by their share of gross loss; there
//! are no per-region attachment points.

use std::collections::BTreeMap;

use log::debug;

use super::result::{RegionalSettlement, SettlementOutcome, SettlementResult};
use crate::exposure::ExposureRow;
use crate::treaty::TreatyParameters;

/// Settlement engine bound to one set of treaty terms
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    treaty: TreatyParameters,
}

impl SettlementEngine {
    pub fn new(treaty: TreatyParameters) -> Self {
        Self { treaty }
    }

    pub fn treaty(&self) -> &TreatyParameters {
        &self.treaty
    }

    /// Settle the treaty against `rows`.
    /// Returns `NoMatchingData` when `rows` is empty.
    pub fn settle(&self, rows: &[ExposureRow]) -> SettlementOutcome {
        if rows.is_empty() {
            return SettlementOutcome::NoMatchingData;
        }

        let mut premium_total = 0.0;
        let mut premium_retained_total = 0.0;
        let mut loss_gross_total = 0.0;
        for row in rows {
            premium_total += row.premium_earned;
            premium_retained_total += row.premium_retained;
            loss_gross_total += row.loss_gross;
        }

        let recovery = self.treaty.recovery_for(loss_gross_total);
        let retention_net = loss_gross_total - recovery;

        let loss_ratio_gross_pct = percent_of(loss_gross_total, premium_total);
        let loss_ratio_retained_pct = percent_of(retention_net, premium_retained_total);

        let regions = allocate_by_region(rows, loss_gross_total, recovery);

        debug!(
            "Settled {} rows: gross={:.2} recovery={:.2} retention={:.2} regions={}",
            rows.len(),
            loss_gross_total,
            recovery,
            retention_net,
            regions.len()
        );

        SettlementOutcome::Settled(SettlementResult {
            treaty: self.treaty,
            premium_total,
            premium_retained_total,
            loss_gross_total,
            recovery,
            retention_net,
            loss_ratio_gross_pct,
            loss_ratio_retained_pct,
            regions,
        })
    }
}

/// Settle `treaty` against `rows`
pub fn settle(rows: &[ExposureRow], treaty: &TreatyParameters) -> SettlementOutcome {
    SettlementEngine::new(*treaty).settle(rows)
}

/// 100 * numerator / denominator, or 0 when the denominator is not positive
fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Group gross loss by region (ascending code order) and split the recovery by loss share
fn allocate_by_region(
    rows: &[ExposureRow],
    loss_gross_total: f64,
    recovery: f64,
) -> Vec<RegionalSettlement> {
    let mut by_region: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *by_region.entry(row.region.as_str()).or_insert(0.0) += row.loss_gross;
    }

    by_region
        .into_iter()
        .map(|(region, loss_gross)| {
            let weight = if loss_gross_total > 0.0 {
                loss_gross / loss_gross_total
            } else {
                0.0
            };
            let region_recovery = recovery * weight;
            RegionalSettlement {
                region: region.to_string(),
                loss_gross,
                weight,
                recovery: region_recovery,
                retention: loss_gross - region_recovery,
            }
        })
        .collect()
}
