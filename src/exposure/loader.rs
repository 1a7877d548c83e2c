//! Load aggregated exposure rows from CSV
//!
//! Accepts both the English column names and the headers used by the SUSEP-derived
//! exports (`UF`, `Ano_Mes`/`Competencia`, `Ramo`, `Premio_Ganho`, `Premio_Retido`,
//! `Sinistro_Bruto`).

use super::ExposureRow;
use crate::error::ExposureError;
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Agricultural insurance line code
pub const DEFAULT_BUSINESS_LINE: u32 = 11;

/// Anything that can produce a fresh set of exposure rows per request
pub trait ExposureSource: Send + Sync {
    fn load(&self) -> Result<Vec<ExposureRow>, ExposureError>;
}

/// In-memory source, mostly for tests and embedding callers
impl ExposureSource for Vec<ExposureRow> {
    fn load(&self) -> Result<Vec<ExposureRow>, ExposureError> {
        Ok(self.clone())
    }
}

/// CSV file source restricted to one business line
#[derive(Debug, Clone)]
pub struct CsvExposureSource {
    path: PathBuf,
    business_line: u32,
}

impl CsvExposureSource {
    pub fn new(path: impl Into<PathBuf>, business_line: u32) -> Self {
        Self {
            path: path.into(),
            business_line,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExposureSource for CsvExposureSource {
    fn load(&self) -> Result<Vec<ExposureRow>, ExposureError> {
        load_exposure(&self.path, self.business_line)
    }
}

/// Raw CSV row; every numeric column may be blank
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(alias = "UF")]
    region: String,
    #[serde(default, alias = "Ano_Mes", alias = "Competencia")]
    period: Option<String>,
    #[serde(default, alias = "Ramo")]
    line: Option<u32>,
    #[serde(default, alias = "Premio_Ganho")]
    premium_earned: Option<f64>,
    #[serde(default, alias = "Premio_Retido")]
    premium_retained: Option<f64>,
    #[serde(default, alias = "Sinistro_Bruto")]
    loss_gross: Option<f64>,
}

impl CsvRow {
    fn to_exposure(self) -> Result<ExposureRow, ExposureError> {
        if self.region.is_empty() {
            return Err(ExposureError::MissingRegion);
        }

        let premium_earned = self.premium_earned.unwrap_or(0.0);
        let loss_gross = self.loss_gross.unwrap_or(0.0);
        // No primary-retention figure: earned premium is the retention base
        let premium_retained = self.premium_retained.unwrap_or(premium_earned);

        for (field, value) in [
            ("premium_earned", premium_earned),
            ("premium_retained", premium_retained),
            ("loss_gross", loss_gross),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ExposureError::InvalidValue {
                    region: self.region,
                    field,
                    value,
                });
            }
        }

        Ok(ExposureRow {
            region: self.region,
            period: self.period.unwrap_or_default(),
            premium_earned,
            premium_retained,
            loss_gross,
        })
    }
}

/// Load all rows for `business_line` from a CSV file
pub fn load_exposure<P: AsRef<Path>>(
    path: P,
    business_line: u32,
) -> Result<Vec<ExposureRow>, ExposureError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let rows = load_exposure_from_reader(file, business_line)?;
    info!("Loaded {} exposure rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load rows from any reader (e.g., string buffer, network stream).
/// Rows tagged with a different business line are dropped; untagged rows are kept.
pub fn load_exposure_from_reader<R: std::io::Read>(
    reader: R,
    business_line: u32,
) -> Result<Vec<ExposureRow>, ExposureError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.deserialize() {
        let raw: CsvRow = result?;
        if raw.line.is_some_and(|line| line != business_line) {
            skipped += 1;
            continue;
        }
        rows.push(raw.to_exposure()?);
    }

    if skipped > 0 {
        debug!("Skipped {} rows outside business line {}", skipped, business_line);
    }

    Ok(rows)
}
