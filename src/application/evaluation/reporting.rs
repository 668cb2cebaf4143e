use super::engine::{CaseOutcome, EvaluationMode, EvaluationRun, EvaluationSummary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub timestamp: DateTime<Utc>,
    pub predictor: String,
    pub mode: EvaluationMode,
    pub summary: EvaluationSummary,
    pub outcomes: Vec<CaseOutcome>,
}

/// Flat per-case row for CSV export
#[derive(Debug, Serialize)]
struct OutcomeRow {
    index: usize,
    trip_duration_days: u32,
    miles_traveled: f64,
    total_receipts_amount: f64,
    expected: f64,
    predicted: f64,
    error: f64,
    exact_match_shortcut: bool,
}

impl From<&CaseOutcome> for OutcomeRow {
    fn from(o: &CaseOutcome) -> Self {
        Self {
            index: o.index,
            trip_duration_days: o.input.trip_duration_days,
            miles_traveled: o.input.miles_traveled,
            total_receipts_amount: o.input.total_receipts_amount,
            expected: o.expected,
            predicted: o.predicted,
            error: o.error,
            exact_match_shortcut: o.exact_match_shortcut,
        }
    }
}

pub struct EvaluationReporter {
    output_dir: PathBuf,
}

impl EvaluationReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = output_dir.into();
        if !path.exists() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create report directory {:?}", path))?;
        }
        Ok(Self { output_dir: path })
    }

    /// Writes a timestamped JSON report and returns its path
    pub fn write_json(&self, run: &EvaluationRun) -> Result<PathBuf> {
        let timestamp = Utc::now();
        let report = EvaluationReport {
            timestamp,
            predictor: run.predictor.clone(),
            mode: run.mode,
            summary: run.summary.clone(),
            outcomes: run.outcomes.clone(),
        };

        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        let path = self.report_path(&format!(
            "evaluation_report_{}_{}",
            run.mode.file_tag(),
            timestamp.format("%Y%m%d_%H%M%S_%3f")
        ));
        fs::write(&path, json).with_context(|| format!("Failed to write report {:?}", path))?;

        info!("Report saved to {}", path.display());
        Ok(path)
    }

    /// First free `<stem>.json`, then `<stem>_1.json`, `<stem>_2.json`, ...
    fn report_path(&self, stem: &str) -> PathBuf {
        let mut path = self.output_dir.join(format!("{}.json", stem));
        let mut attempt = 1;
        while path.exists() {
            path = self.output_dir.join(format!("{}_{}.json", stem, attempt));
            attempt += 1;
        }
        path
    }

    /// Exports one CSV row per evaluated case
    pub fn write_csv(&self, run: &EvaluationRun, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV {:?}", path))?;
        for outcome in &run.outcomes {
            writer.serialize(OutcomeRow::from(outcome))?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", run.outcomes.len(), path.display());
        Ok(())
    }

    pub fn print_summary(&self, run: &EvaluationRun, top: usize) {
        print!("{}", format_summary(run, top));
    }
}

/// Renders the console summary table
pub fn format_summary(run: &EvaluationRun, top: usize) -> String {
    let s = &run.summary;
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(72)));
    out.push_str(&format!("EVALUATION SUMMARY ({}, {})\n", run.predictor, run.mode));
    out.push_str(&format!("{}\n", "=".repeat(72)));
    out.push_str(&format!("  Total cases:      {:>8}\n", s.total_cases));
    out.push_str(&format!(
        "  Exact (±$0.01):   {:>8}  ({:.1}%)\n",
        s.exact_matches, s.exact_match_pct
    ));
    out.push_str(&format!(
        "  Close (±$1.00):   {:>8}  ({:.1}%)\n",
        s.close_matches, s.close_match_pct
    ));
    out.push_str(&format!("  Average error:    ${:>8.2}\n", s.average_error));
    out.push_str(&format!("  Error std dev:    ${:>8.2}\n", s.error_std_dev));
    out.push_str(&format!(
        "  Max error:        ${:>8.2}  (case #{})\n",
        s.max_error, s.max_error_case
    ));
    out.push_str(&format!("  Score:            {:>9.2}  (lower is better)\n", s.score));

    let worst = run.worst_cases(top);
    if !worst.is_empty() && s.exact_matches < s.total_cases {
        out.push_str(&format!("{}\n", "-".repeat(72)));
        out.push_str(&format!(
            "{:>6} | {:>5} | {:>9} | {:>9} | {:>10} | {:>10} | {:>8}\n",
            "Case", "Days", "Miles", "Receipts", "Expected", "Predicted", "Error"
        ));
        out.push_str(&format!("{}\n", "-".repeat(72)));
        for o in worst.iter().filter(|o| o.error >= 0.01) {
            out.push_str(&format!(
                "{:>6} | {:>5} | {:>9.2} | {:>9.2} | {:>10.2} | {:>10.2} | {:>8.2}\n",
                o.index,
                o.input.trip_duration_days,
                o.input.miles_traveled,
                o.input.total_receipts_amount,
                o.expected,
                o.predicted,
                o.error
            ));
        }
    }
    out.push_str(&format!("{}\n", "=".repeat(72)));
    out
}
