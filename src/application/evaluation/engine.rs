use crate::application::prediction::ReimbursementPredictor;
use crate::domain::errors::EvaluationError;
use crate::domain::expense::types::{HistoricalCase, TripInput};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Predictions within a cent of the expected value count as exact.
pub const EXACT_MATCH_THRESHOLD: f64 = 0.01;

/// Predictions within a dollar of the expected value count as close.
pub const CLOSE_MATCH_THRESHOLD: f64 = 1.0;

/// How each labelled case is presented to the predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Predict every case with the full training set available
    InSample,
    /// Predict case `i` with training case `i` held out.
    /// The evaluated cases must be the predictor's own training set, in order.
    LeaveOneOut,
}

impl EvaluationMode {
    /// Short tag used in report file names
    pub fn file_tag(&self) -> &'static str {
        match self {
            EvaluationMode::InSample => "in_sample",
            EvaluationMode::LeaveOneOut => "loo",
        }
    }
}

impl std::fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationMode::InSample => write!(f, "in-sample"),
            EvaluationMode::LeaveOneOut => write!(f, "leave-one-out"),
        }
    }
}

/// Result of predicting a single labelled case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub index: usize,
    pub input: TripInput,
    pub expected: f64,
    /// Prediction rounded to cents, as it would be printed
    pub predicted: f64,
    pub error: f64,
    pub exact_match_shortcut: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total_cases: usize,
    pub exact_matches: usize,
    pub close_matches: usize,
    pub exact_match_pct: f64,
    pub close_match_pct: f64,
    pub average_error: f64,
    pub error_std_dev: f64,
    pub max_error: f64,
    pub max_error_case: usize,
    /// Lower is better: average error in cents plus a 0.1 penalty per inexact case
    pub score: f64,
}

impl EvaluationSummary {
    pub fn from_outcomes(outcomes: &[CaseOutcome]) -> Result<Self, EvaluationError> {
        let total_cases = outcomes.len();
        if total_cases == 0 {
            return Err(EvaluationError::NoCases);
        }

        let errors: Vec<f64> = outcomes.iter().map(|o| o.error).collect();
        let exact_matches = errors
            .iter()
            .filter(|&&e| e < EXACT_MATCH_THRESHOLD)
            .count();
        let close_matches = errors
            .iter()
            .filter(|&&e| e < CLOSE_MATCH_THRESHOLD)
            .count();

        let (max_error_case, max_error) = outcomes
            .iter()
            .map(|o| (o.index, o.error))
            .fold((outcomes[0].index, f64::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 { cur } else { best }
            });

        // statrs returns NaN for the spread of a single sample
        let data = Data::new(errors);
        let average_error = data.mean().unwrap_or(0.0);
        let error_std_dev = data.std_dev().filter(|v| v.is_finite()).unwrap_or(0.0);

        let n = total_cases as f64;
        let score = average_error * 100.0 + (total_cases - exact_matches) as f64 * 0.1;

        Ok(Self {
            total_cases,
            exact_matches,
            close_matches,
            exact_match_pct: exact_matches as f64 / n * 100.0,
            close_match_pct: close_matches as f64 / n * 100.0,
            average_error,
            error_std_dev,
            max_error,
            max_error_case,
            score,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub mode: EvaluationMode,
    pub predictor: String,
    pub outcomes: Vec<CaseOutcome>,
    pub summary: EvaluationSummary,
}

impl EvaluationRun {
    /// The `n` cases with the largest error, worst first
    pub fn worst_cases(&self, n: usize) -> Vec<&CaseOutcome> {
        let mut sorted: Vec<&CaseOutcome> = self.outcomes.iter().collect();
        sorted.sort_by(|a, b| b.error.total_cmp(&a.error));
        sorted.truncate(n);
        sorted
    }
}

/// Runs a predictor over labelled cases and scores the results.
pub struct EvaluationEngine {
    predictor: Arc<dyn ReimbursementPredictor>,
}

impl EvaluationEngine {
    pub fn new(predictor: Arc<dyn ReimbursementPredictor>) -> Self {
        Self { predictor }
    }

    /// Predicts every case in parallel. The training set is only read, so
    /// workers share it without synchronisation.
    pub fn run(
        &self,
        cases: &[HistoricalCase],
        mode: EvaluationMode,
    ) -> Result<EvaluationRun, EvaluationError> {
        if cases.is_empty() {
            return Err(EvaluationError::NoCases);
        }

        info!(
            "Evaluating {} on {} cases ({})",
            self.predictor.name(),
            cases.len(),
            mode
        );
        let started = Instant::now();

        let outcomes: Vec<CaseOutcome> = cases
            .par_iter()
            .enumerate()
            .map(|(index, case)| self.evaluate_case(index, case, mode))
            .collect::<Result<_, _>>()?;

        let summary = EvaluationSummary::from_outcomes(&outcomes)?;
        info!(
            "Evaluation finished in {:.2?}: {} exact, {} close, avg error ${:.2}, score {:.2}",
            started.elapsed(),
            summary.exact_matches,
            summary.close_matches,
            summary.average_error,
            summary.score
        );

        Ok(EvaluationRun {
            mode,
            predictor: format!("{} {}", self.predictor.name(), self.predictor.version()),
            outcomes,
            summary,
        })
    }

    fn evaluate_case(
        &self,
        index: usize,
        case: &HistoricalCase,
        mode: EvaluationMode,
    ) -> Result<CaseOutcome, EvaluationError> {
        let prediction = match mode {
            EvaluationMode::InSample => self.predictor.predict(&case.input),
            EvaluationMode::LeaveOneOut => self.predictor.predict_excluding(&case.input, index),
        }
        .map_err(|source| EvaluationError::Prediction { index, source })?;

        let predicted = round_to_cents(prediction.amount);
        Ok(CaseOutcome {
            index,
            input: case.input,
            expected: case.expected_output,
            predicted,
            error: (predicted - case.expected_output).abs(),
            exact_match_shortcut: prediction.is_exact_match(),
        })
    }
}

pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::prediction::KnnPredictor;
    use crate::domain::expense::types::TrainingSet;

    fn cases() -> Vec<HistoricalCase> {
        vec![
            HistoricalCase::new(TripInput::new(1, 10.0, 5.0).unwrap(), 100.0),
            HistoricalCase::new(TripInput::new(2, 20.0, 10.0).unwrap(), 200.0),
            HistoricalCase::new(TripInput::new(3, 30.0, 15.0).unwrap(), 300.0),
            HistoricalCase::new(TripInput::new(4, 40.0, 20.0).unwrap(), 420.0),
        ]
    }

    fn engine() -> EvaluationEngine {
        let set = TrainingSet::new(cases()).unwrap();
        EvaluationEngine::new(Arc::new(KnnPredictor::new(Arc::new(set))))
    }

    fn outcome(index: usize, error: f64) -> CaseOutcome {
        CaseOutcome {
            index,
            input: TripInput::new(1, 1.0, 1.0).unwrap(),
            expected: 100.0,
            predicted: 100.0 + error,
            error,
            exact_match_shortcut: false,
        }
    }

    #[test]
    fn test_in_sample_is_all_exact() {
        let run = engine().run(&cases(), EvaluationMode::InSample).unwrap();

        assert_eq!(run.summary.total_cases, 4);
        assert_eq!(run.summary.exact_matches, 4);
        assert_eq!(run.summary.score, 0.0);
        assert!(run.outcomes.iter().all(|o| o.exact_match_shortcut));
    }

    #[test]
    fn test_leave_one_out_never_matches_itself() {
        let run = engine().run(&cases(), EvaluationMode::LeaveOneOut).unwrap();

        assert!(run.outcomes.iter().all(|o| !o.exact_match_shortcut));
        // Outcomes stay in input order
        let indexes: Vec<usize> = run.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
        assert!(run.summary.max_error > 0.0);
        assert!(run.summary.score > 0.0);
    }

    #[test]
    fn test_empty_cases_rejected() {
        assert!(matches!(
            engine().run(&[], EvaluationMode::InSample),
            Err(EvaluationError::NoCases)
        ));
    }

    #[test]
    fn test_summary_thresholds_and_score() {
        let outcomes = vec![
            outcome(0, 0.0),
            outcome(1, 0.5),
            outcome(2, 2.0),
            outcome(3, 5.5),
        ];
        let summary = EvaluationSummary::from_outcomes(&outcomes).unwrap();

        assert_eq!(summary.exact_matches, 1);
        assert_eq!(summary.close_matches, 2);
        assert!((summary.average_error - 2.0).abs() < 1e-12);
        assert_eq!(summary.max_error, 5.5);
        assert_eq!(summary.max_error_case, 3);
        // 2.0 * 100 + 3 inexact * 0.1
        assert!((summary.score - 200.3).abs() < 1e-9);
        assert!((summary.exact_match_pct - 25.0).abs() < 1e-12);
        assert!((summary.close_match_pct - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_outcome_has_zero_spread() {
        let summary = EvaluationSummary::from_outcomes(&[outcome(0, 3.0)]).unwrap();
        assert_eq!(summary.error_std_dev, 0.0);
        assert_eq!(summary.average_error, 3.0);
    }

    #[test]
    fn test_worst_cases_ordering() {
        let run = EvaluationRun {
            mode: EvaluationMode::InSample,
            predictor: "test".to_string(),
            outcomes: vec![outcome(0, 1.0), outcome(1, 9.0), outcome(2, 4.0)],
            summary: EvaluationSummary::from_outcomes(&[outcome(0, 1.0)]).unwrap(),
        };

        let worst: Vec<usize> = run.worst_cases(2).iter().map(|o| o.index).collect();
        assert_eq!(worst, vec![1, 2]);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(50.0045), 50.0);
        assert_eq!(round_to_cents(149.996), 150.0);
        assert_eq!(round_to_cents(12.344), 12.34);
    }
}
