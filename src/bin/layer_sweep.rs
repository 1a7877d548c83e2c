//! Sweep the attachment point of an XL layer and record the settlement at each step
//!
//! Outputs one CSV row per priority, for charting how recovery decays as the
//! layer moves up.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use xl_settlement::exposure::{CsvExposureSource, ExposureSource};
use xl_settlement::{
    ModelArtifact, RegionFilter, ScenarioParameters, ServiceConfig, SettlementOutcome,
    TreatyParameters,
};

#[derive(Debug, Parser)]
#[command(name = "layer_sweep", about = "Settle a range of XL attachment points")]
struct Cli {
    /// Layer width, in millions
    #[arg(long)]
    capacity: f64,

    /// First priority, in millions
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Last priority, in millions (inclusive)
    #[arg(long)]
    to: f64,

    /// Priority increment, in millions
    #[arg(long, default_value_t = 50.0)]
    step: f64,

    /// Region code, or "all"
    #[arg(long, default_value = "all")]
    region: String,

    /// Settle stress-scenario losses instead of observed losses
    #[arg(long)]
    stress: bool,

    #[arg(long, default_value = "layer_sweep_output.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    priority: f64,
    capacity: f64,
    loss_gross: f64,
    recovery: f64,
    retention_net: f64,
    loss_ratio_gross_pct: f64,
    loss_ratio_retained_pct: f64,
}

/// Upper bound on the number of layers in one sweep
const MAX_STEPS: usize = 100_000;

fn priorities(from: f64, to: f64, step: f64) -> Result<Vec<f64>> {
    if !from.is_finite() || !to.is_finite() || step.is_nan() || step <= 0.0 || to < from {
        bail!("need step > 0 and to >= from (got from={}, to={}, step={})", from, to, step);
    }
    // Tolerance keeps `to` inclusive when (to - from) / step lands just under an integer
    let intervals = ((to - from) / step + 1e-9).floor();
    if intervals >= MAX_STEPS as f64 {
        bail!(
            "sweep from={} to={} step={} exceeds {} layers",
            from,
            to,
            step,
            MAX_STEPS
        );
    }
    let count = intervals as usize + 1;
    Ok((0..count).map(|i| (from + step * i as f64).min(to)).collect())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env();
    let start = Instant::now();

    let source = CsvExposureSource::new(&config.data_path, config.business_line);
    let mut rows = RegionFilter::parse(&cli.region).apply(
        source
            .load()
            .with_context(|| format!("loading {}", config.data_path.display()))?,
    );
    println!("Loaded {} rows in {:?}", rows.len(), start.elapsed());

    if cli.stress {
        let artifact = ModelArtifact::load(&config.model_path)
            .with_context(|| format!("loading model {}", config.model_path.display()))?;
        rows = artifact.stress(&rows, &ScenarioParameters::default())?;
        println!("Applied stress scenario");
    }

    let steps = priorities(cli.from, cli.to, cli.step)?;
    println!("Settling {} layers...", steps.len());

    let results: Vec<SweepRow> = steps
        .par_iter()
        .map(|&priority| -> Result<Option<SweepRow>> {
            let treaty = TreatyParameters::from_scaled(priority, cli.capacity, config.unit_scale)?;
            Ok(match xl_settlement::settle(&rows, &treaty) {
                SettlementOutcome::Settled(r) => Some(SweepRow {
                    priority: r.treaty.priority(),
                    capacity: r.treaty.capacity(),
                    loss_gross: r.loss_gross_total,
                    recovery: r.recovery,
                    retention_net: r.retention_net,
                    loss_ratio_gross_pct: r.loss_ratio_gross_pct,
                    loss_ratio_retained_pct: r.loss_ratio_retained_pct,
                }),
                SettlementOutcome::NoMatchingData => None,
            })
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    if results.is_empty() {
        println!("No exposure data for the selected filter");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    for row in &results {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
