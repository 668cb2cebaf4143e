use crate::application::prediction::ReimbursementPredictor;
use crate::domain::ports::QueryRow;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Marker written in place of an amount when a row cannot be predicted
pub const ERROR_MARKER: &str = "ERROR";

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Predicted(f64),
    Failed(String),
}

impl BatchOutcome {
    /// One line of the results file
    pub fn to_line(&self) -> String {
        match self {
            BatchOutcome::Predicted(amount) => format!("{:.2}", amount),
            BatchOutcome::Failed(_) => ERROR_MARKER.to_string(),
        }
    }
}

/// Predicts a list of unlabelled trips, one outcome per row in input order.
pub struct BatchPredictor {
    predictor: Arc<dyn ReimbursementPredictor>,
}

impl BatchPredictor {
    pub fn new(predictor: Arc<dyn ReimbursementPredictor>) -> Self {
        Self { predictor }
    }

    /// A bad row is reported and skipped; it never aborts the batch.
    pub fn run(&self, queries: &[QueryRow]) -> Vec<BatchOutcome> {
        info!("Predicting {} queries", queries.len());

        let outcomes: Vec<BatchOutcome> = queries
            .par_iter()
            .enumerate()
            .map(|(index, query)| self.predict_row(index, query))
            .collect();

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Failed(_)))
            .count();
        info!(
            "Batch complete: {} predicted, {} failed",
            outcomes.len() - failed,
            failed
        );
        outcomes
    }

    fn predict_row(&self, index: usize, row: &QueryRow) -> BatchOutcome {
        let query = match row {
            Ok(query) => query,
            Err(e) => {
                warn!("Skipping query #{}: {}", index, e);
                return BatchOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = query.validate() {
            warn!("Skipping query #{}: {}", index, e);
            return BatchOutcome::Failed(e.to_string());
        }

        match self.predictor.predict(query) {
            Ok(prediction) => BatchOutcome::Predicted(prediction.amount),
            Err(e) => {
                warn!("Prediction failed for query #{}: {}", index, e);
                BatchOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Writes one line per outcome, in order.
pub fn write_results(path: &Path, outcomes: &[BatchOutcome]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let file = fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for outcome in outcomes {
        writeln!(writer, "{}", outcome.to_line())?;
    }
    writer.flush().context("Failed to flush results file")?;

    info!("Wrote {} results to {:?}", outcomes.len(), path);
    Ok(())
}
