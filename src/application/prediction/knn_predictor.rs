use super::predictor::ReimbursementPredictor;
use crate::domain::errors::PredictionError;
use crate::domain::expense::knn::{self, DEFAULT_NEIGHBOR_COUNT, Prediction, PredictionMethod};
use crate::domain::expense::types::{TrainingSet, TripInput};
use std::sync::Arc;
use tracing::debug;

/// Nearest-neighbour predictor over a shared, read-only training set.
///
/// Cloning is cheap and every clone reads the same cases, so one instance can
/// serve any number of threads without locking.
#[derive(Debug, Clone)]
pub struct KnnPredictor {
    training: Arc<TrainingSet>,
    k: usize,
}

impl KnnPredictor {
    pub fn new(training: Arc<TrainingSet>) -> Self {
        Self {
            training,
            k: DEFAULT_NEIGHBOR_COUNT,
        }
    }

    pub fn training_set(&self) -> &TrainingSet {
        &self.training
    }

    pub fn neighbor_count(&self) -> usize {
        self.k
    }

    fn trace(input: &TripInput, prediction: &Prediction) {
        match prediction.method {
            PredictionMethod::ExactMatch { index } => debug!(
                days = input.trip_duration_days,
                miles = input.miles_traveled,
                receipts = input.total_receipts_amount,
                index,
                "Exact match: returning stored reimbursement {:.2}",
                prediction.amount
            ),
            PredictionMethod::WeightedNeighbors {
                neighbors_used,
                nearest_distance,
            } => debug!(
                days = input.trip_duration_days,
                miles = input.miles_traveled,
                receipts = input.total_receipts_amount,
                neighbors_used,
                nearest_distance,
                "Weighted estimate {:.2}",
                prediction.amount
            ),
        }
    }
}

impl ReimbursementPredictor for KnnPredictor {
    fn predict(&self, input: &TripInput) -> Result<Prediction, PredictionError> {
        let prediction = knn::estimate(input, self.training.cases(), self.k)?;
        Self::trace(input, &prediction);
        Ok(prediction)
    }

    fn predict_excluding(
        &self,
        input: &TripInput,
        excluded_index: usize,
    ) -> Result<Prediction, PredictionError> {
        let prediction =
            knn::estimate_excluding(input, self.training.cases(), self.k, excluded_index)?;
        Self::trace(input, &prediction);
        Ok(prediction)
    }

    fn name(&self) -> &str {
        "Weighted KNN"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}
