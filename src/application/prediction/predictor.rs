use crate::domain::errors::PredictionError;
use crate::domain::expense::knn::Prediction;
use crate::domain::expense::types::TripInput;

/// Interface for case-based reimbursement estimators
pub trait ReimbursementPredictor: Send + Sync {
    /// Estimate the reimbursement for a trip
    fn predict(&self, input: &TripInput) -> Result<Prediction, PredictionError>;

    /// Estimate while ignoring the stored case at `excluded_index`
    /// (leave-one-out evaluation)
    fn predict_excluding(
        &self,
        input: &TripInput,
        excluded_index: usize,
    ) -> Result<Prediction, PredictionError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
