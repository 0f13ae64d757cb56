//! Bond Rotation CLI
//!
//! Reads a holdings CSV, analyzes every bond against the given parameters
//! and prints per-bond details plus an overall summary.
//!
//! Parameters can also be set through the environment:
//!   BOND_CSV, NEW_FIXED_RATE_PCT, FEDERAL_TAX_RATE_PCT, INVESTMENT_HORIZON_YEARS

use anyhow::{bail, Context, Result};
use bond_rotation::parameters::{
    DEFAULT_FEDERAL_TAX_RATE_PCT, DEFAULT_INVESTMENT_HORIZON_YEARS, DEFAULT_NEW_FIXED_RATE_PCT,
};
use bond_rotation::{load_bonds, report, BatchResult, BatchRunner, BatchSummary, PolicyParameters};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

/// Estimate whether rotating savings bonds into a higher fixed rate pays off
#[derive(Parser, Debug)]
#[command(name = "bond-rotation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Holdings CSV export
    #[arg(long, env = "BOND_CSV", default_value = "my_i_bonds.csv")]
    csv: PathBuf,

    /// Fixed rate of a new bond (%)
    #[arg(long, env = "NEW_FIXED_RATE_PCT", default_value_t = DEFAULT_NEW_FIXED_RATE_PCT)]
    new_rate: f64,

    /// Federal tax rate on accrued interest (%)
    #[arg(long, env = "FEDERAL_TAX_RATE_PCT", default_value_t = DEFAULT_FEDERAL_TAX_RATE_PCT)]
    tax_rate: f64,

    /// Years the new bond will be held
    #[arg(long, env = "INVESTMENT_HORIZON_YEARS", default_value_t = DEFAULT_INVESTMENT_HORIZON_YEARS)]
    horizon: u32,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Only show details for this confirmation number
    #[arg(long)]
    bond: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valuation_date: NaiveDate,
    parameters: PolicyParameters,
    results: &'a BatchResult,
    skipped: Vec<JsonSkippedRow>,
    summary: BatchSummary,
}

#[derive(Serialize)]
struct JsonSkippedRow {
    line: u64,
    confirmation: Option<String>,
    reason: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let parameters = PolicyParameters::new(cli.new_rate, cli.tax_rate, cli.horizon);
    parameters.validate().context("Invalid input value")?;
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    let loaded = load_bonds(&cli.csv, as_of)
        .with_context(|| format!("Failed to read CSV '{}'", cli.csv.display()))?;

    let runner = BatchRunner::new(parameters, as_of);
    let batch = runner.run_batch(&loaded.bonds);
    let summary = batch.summary();

    if cli.json {
        let doc = JsonReport {
            valuation_date: as_of,
            parameters,
            results: &batch,
            skipped: loaded
                .skipped
                .iter()
                .map(|s| JsonSkippedRow {
                    line: s.line,
                    confirmation: s.confirmation.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if !loaded.skipped.is_empty() {
        println!("{}", report::format_skipped(&loaded.skipped));
    }

    if batch.is_empty() {
        println!("No valid bond data found in the CSV file to analyze.");
        return Ok(());
    }

    println!(
        "Analysis as of {} (new fixed rate {}%, tax rate {}%, horizon {} years)\n",
        as_of, parameters.new_fixed_rate_pct, parameters.federal_tax_rate_pct, parameters.investment_horizon_years
    );

    let selected: Vec<_> = match &cli.bond {
        Some(conf) => {
            let bond = loaded.bonds.iter().find(|b| &b.confirmation == conf);
            match bond {
                Some(bond) => vec![bond],
                None => bail!("No analyzed bond with confirmation '{}'", conf),
            }
        }
        None => loaded.bonds.iter().collect(),
    };

    for bond in selected {
        if let Some(result) = batch.get(&bond.confirmation) {
            println!("{}\n", report::format_bond_details(bond, result, &parameters));
        }
    }

    println!("{}", report::format_summary(&summary));
    println!("Analysis complete. Processed {} bonds.\n", batch.len());
    print!("{}", report::format_disclaimers());

    Ok(())
}
