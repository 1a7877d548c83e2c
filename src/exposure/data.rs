//! Exposure data structures matching the aggregated premium/claims format

use serde::{Deserialize, Serialize};

/// One aggregation bucket (region x period) of earned premium and gross loss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    /// Region code (e.g. "RS", "SP")
    pub region: String,

    /// Period label as found in the source (e.g. "2023-03", "202503")
    #[serde(default)]
    pub period: String,

    /// Earned premium
    pub premium_earned: f64,

    /// Premium kept after primary retention
    pub premium_retained: f64,

    /// Gross incurred loss before reinsurance
    pub loss_gross: f64,
}

impl ExposureRow {
    /// Create a row with an explicit retained premium
    pub fn new(
        region: impl Into<String>,
        period: impl Into<String>,
        premium_earned: f64,
        premium_retained: f64,
        loss_gross: f64,
    ) -> Self {
        Self {
            region: region.into(),
            period: period.into(),
            premium_earned,
            premium_retained,
            loss_gross,
        }
    }

    /// Create a row for a source without a primary-retention figure.
    /// Retained premium falls back to earned premium.
    pub fn with_earned_retention(
        region: impl Into<String>,
        period: impl Into<String>,
        premium_earned: f64,
        loss_gross: f64,
    ) -> Self {
        Self::new(region, period, premium_earned, premium_earned, loss_gross)
    }

    /// Copy of this row with gross loss replaced; premiums and keys are untouched
    pub fn with_loss_gross(&self, loss_gross: f64) -> Self {
        Self {
            loss_gross,
            ..self.clone()
        }
    }
}

/// Region restriction applied by the caller before settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RegionFilter {
    /// No restriction
    #[default]
    All,
    /// Keep only rows for this region code
    Only(String),
}

impl RegionFilter {
    /// Parse a user-facing region selector.
    /// Empty input, "all" (any case) and "Todas" mean no restriction.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("todas")
        {
            RegionFilter::All
        } else {
            RegionFilter::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, row: &ExposureRow) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => row.region == *region,
        }
    }

    /// Keep the rows that match, preserving input order
    pub fn apply(&self, rows: Vec<ExposureRow>) -> Vec<ExposureRow> {
        match self {
            RegionFilter::All => rows,
            RegionFilter::Only(_) => rows.into_iter().filter(|r| self.matches(r)).collect(),
        }
    }
}

impl std::fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionFilter::All => write!(f, "all regions"),
            RegionFilter::Only(region) => write!(f, "{}", region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_defaults_to_earned() {
        let row = ExposureRow::with_earned_retention("SP", "2023-01", 120.0, 40.0);
        assert_eq!(row.premium_retained, 120.0);
    }

    #[test]
    fn test_with_loss_gross_leaves_source_untouched() {
        let row = ExposureRow::new("RS", "2023-03", 100.0, 80.0, 50.0);
        let stressed = row.with_loss_gross(900.0);

        assert_eq!(row.loss_gross, 50.0);
        assert_eq!(stressed.loss_gross, 900.0);
        assert_eq!(stressed.region, "RS");
        assert_eq!(stressed.period, "2023-03");
        assert_eq!(stressed.premium_earned, 100.0);
        assert_eq!(stressed.premium_retained, 80.0);
    }

    #[test]
    fn test_region_filter_parse() {
        assert_eq!(RegionFilter::parse(""), RegionFilter::All);
        assert_eq!(RegionFilter::parse("Todas"), RegionFilter::All);
        assert_eq!(RegionFilter::parse("ALL"), RegionFilter::All);
        assert_eq!(RegionFilter::parse(" PR "), RegionFilter::Only("PR".to_string()));
    }

    #[test]
    fn test_region_filter_apply() {
        let rows = vec![
            ExposureRow::with_earned_retention("SP", "1", 1.0, 1.0),
            ExposureRow::with_earned_retention("RS", "1", 2.0, 2.0),
            ExposureRow::with_earned_retention("SP", "2", 3.0, 3.0),
        ];

        let all = RegionFilter::All.apply(rows.clone());
        assert_eq!(all.len(), 3);

        let sp = RegionFilter::Only("SP".to_string()).apply(rows.clone());
        assert_eq!(sp.len(), 2);
        assert!(sp.iter().all(|r| r.region == "SP"));

        let none = RegionFilter::Only("MT".to_string()).apply(rows);
        assert!(none.is_empty());
    }
}
