//! Accuracy evaluation and batch prediction over JSON case files.
//!
//! # Usage
//! ```sh
//! evaluate run --leave-one-out --top 10 --csv reports/outcomes.csv
//! evaluate batch --queries private_cases.json --output private_results.txt
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reimburse::application::evaluation::{
    BatchPredictor, EvaluationEngine, EvaluationMode, EvaluationReporter, write_results,
};
use reimburse::application::prediction::KnnPredictor;
use reimburse::config::Config;
use reimburse::domain::ports::{CaseRepository, QueryRepository};
use reimburse::infrastructure::observability::init_tracing;
use reimburse::infrastructure::persistence::{JsonCaseRepository, JsonQueryRepository};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Historical cases file (overrides REIMBURSE_DATASET_PATH)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the predictor against the labelled dataset
    Run {
        /// Hold each case out of the training set while predicting it
        #[arg(long)]
        leave_one_out: bool,

        /// Number of worst cases to list
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Directory for the JSON report (overrides REIMBURSE_REPORT_DIR)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Skip writing the JSON report
        #[arg(long)]
        no_report: bool,

        /// Also export per-case outcomes as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Predict every trip in a query file, one result per line
    Batch {
        /// Query file (overrides REIMBURSE_QUERY_PATH)
        #[arg(long)]
        queries: Option<PathBuf>,

        /// Results file (overrides REIMBURSE_RESULTS_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.observability);

    let dataset_path = cli
        .dataset
        .unwrap_or_else(|| config.dataset.dataset_path.clone());
    let training = Arc::new(
        JsonCaseRepository::new(&dataset_path)
            .load_training_set()
            .with_context(|| format!("Failed to load training data from {:?}", dataset_path))?,
    );
    let predictor = Arc::new(KnnPredictor::new(training.clone()));

    match cli.command {
        Commands::Run {
            leave_one_out,
            top,
            report_dir,
            no_report,
            csv,
        } => {
            let mode = if leave_one_out {
                EvaluationMode::LeaveOneOut
            } else {
                EvaluationMode::InSample
            };

            let engine = EvaluationEngine::new(predictor);
            let run = engine.run(training.cases(), mode)?;

            let reporter =
                EvaluationReporter::new(report_dir.unwrap_or(config.dataset.report_dir))?;
            reporter.print_summary(&run, top);

            if !no_report {
                let path = reporter.write_json(&run)?;
                println!("Report saved to: {}", path.display());
            }
            if let Some(csv_path) = csv {
                reporter.write_csv(&run, &csv_path)?;
                println!("Outcomes exported to: {}", csv_path.display());
            }
        }
        Commands::Batch { queries, output } => {
            let query_path = queries.unwrap_or(config.dataset.query_path);
            let output_path = output.unwrap_or(config.dataset.results_path);

            let queries = JsonQueryRepository::new(&query_path)
                .load_queries()
                .with_context(|| format!("Failed to load queries from {:?}", query_path))?;

            let outcomes = BatchPredictor::new(predictor).run(&queries);
            write_results(&output_path, &outcomes)?;
            println!(
                "Wrote {} results to {}",
                outcomes.len(),
                output_path.display()
            );
        }
    }

    Ok(())
}
