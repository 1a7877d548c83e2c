//! XL Settlement CLI
//!
//! Settles an excess-of-loss treaty against the exposure file, optionally under a
//! model-predicted stress scenario.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use xl_settlement::{
    RegionFilter, ServiceConfig, SettlementOutcome, SettlementRequest, SettlementResult,
    SettlementService,
};

#[derive(Debug, Parser)]
#[command(name = "xl-settle", version, about = "Excess-of-loss treaty settlement")]
struct Cli {
    /// Exposure CSV (overrides XL_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Model artifact JSON (overrides XL_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Business line code to settle (overrides XL_BUSINESS_LINE)
    #[arg(long, global = true)]
    line: Option<u32>,

    /// Multiplier for priority/capacity inputs (overrides XL_UNIT_SCALE)
    #[arg(long, global = true)]
    unit_scale: Option<f64>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Settle against observed gross losses
    Settle(TreatyArgs),
    /// Settle against the model's severe El Niño stress losses
    Stress(TreatyArgs),
}

#[derive(Debug, Args)]
struct TreatyArgs {
    /// Attachment point, in millions by default
    #[arg(long)]
    priority: f64,

    /// Layer width, in millions by default
    #[arg(long)]
    capacity: f64,

    /// Region code, or "all"
    #[arg(long, default_value = "all")]
    region: String,
}

impl TreatyArgs {
    fn to_request(&self) -> SettlementRequest {
        SettlementRequest::new(self.priority, self.capacity, RegionFilter::parse(&self.region))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env();
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(line) = cli.line {
        config.business_line = line;
    }
    if let Some(scale) = cli.unit_scale {
        config.unit_scale = scale;
    }

    let service = SettlementService::from_config(&config);

    let (outcome, label) = match &cli.command {
        Command::Settle(args) => (
            service
                .calculate(&args.to_request())
                .context("settlement failed")?,
            "Observed losses",
        ),
        Command::Stress(args) => (
            service
                .predict_stress(&args.to_request())
                .context("stress settlement failed")?,
            "Stress scenario (severe El Niño)",
        ),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SettlementOutcome::Settled(result) => print_result(label, &result),
        SettlementOutcome::NoMatchingData => println!("No exposure data for the selected filter"),
    }

    Ok(())
}

fn print_result(label: &str, result: &SettlementResult) {
    println!("XL Settlement - {}", label);
    println!("==============================\n");
    println!("  Priority:          {:>18.2}", result.treaty.priority());
    println!("  Capacity:          {:>18.2}", result.treaty.capacity());
    println!("  Premium Earned:    {:>18.2}", result.premium_total);
    println!("  Premium Retained:  {:>18.2}", result.premium_retained_total);
    println!("  Gross Loss:        {:>18.2}", result.loss_gross_total);
    println!("  Recovery:          {:>18.2}", result.recovery);
    println!("  Net Retention:     {:>18.2}", result.retention_net);
    println!("  Gross Loss Ratio:  {:>17.2}%", result.loss_ratio_gross_pct);
    println!("  Net Loss Ratio:    {:>17.2}%", result.loss_ratio_retained_pct);
    println!();

    println!("{:<6} {:>18} {:>8} {:>18} {:>18}", "Region", "GrossLoss", "Weight", "Recovery", "Retention");
    println!("{}", "-".repeat(72));
    for region in &result.regions {
        println!(
            "{:<6} {:>18.2} {:>7.2}% {:>18.2} {:>18.2}",
            region.region,
            region.loss_gross,
            region.weight * 100.0,
            region.recovery,
            region.retention,
        );
    }
}
