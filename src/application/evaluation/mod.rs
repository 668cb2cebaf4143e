pub mod batch;
pub mod engine;
pub mod reporting;

pub use batch::{BatchOutcome, BatchPredictor, write_results};
pub use engine::{CaseOutcome, EvaluationEngine, EvaluationMode, EvaluationRun, EvaluationSummary};
pub use reporting::EvaluationReporter;
