//! Reimburse - single trip estimate
//!
//! Prints the estimated reimbursement for one trip, with two decimals, and
//! nothing else on stdout.
//!
//! # Usage
//! ```sh
//! reimburse 3 93 1.42
//! REIMBURSE_DATASET_PATH=data/public_cases.json reimburse 5 250.5 480.25
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use reimburse::application::prediction::{KnnPredictor, ReimbursementPredictor};
use reimburse::config::Config;
use reimburse::domain::expense::types::TripInput;
use reimburse::domain::ports::CaseRepository;
use reimburse::infrastructure::observability::init_tracing;
use reimburse::infrastructure::persistence::JsonCaseRepository;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
struct Args {
    /// Trip length in whole days
    trip_duration_days: String,

    /// Miles traveled
    miles_traveled: String,

    /// Total receipts amount in dollars
    total_receipts_amount: String,

    /// Historical cases file (overrides REIMBURSE_DATASET_PATH)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    init_tracing(&config.observability);

    let input = TripInput::parse(
        &args.trip_duration_days,
        &args.miles_traveled,
        &args.total_receipts_amount,
    )
    .context("Invalid trip input")?;

    let dataset_path = args.dataset.unwrap_or(config.dataset.dataset_path);
    let training = JsonCaseRepository::new(dataset_path)
        .load_training_set()
        .context("Failed to load training data")?;

    let predictor = KnnPredictor::new(Arc::new(training));
    let prediction = predictor.predict(&input)?;
    info!("Estimate method: {:?}", prediction.method);

    println!("{:.2}", prediction.amount);
    Ok(())
}
