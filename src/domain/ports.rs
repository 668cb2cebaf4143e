use crate::domain::errors::InputError;
use crate::domain::expense::types::{TrainingSet, TripInput};
use anyhow::Result;

/// One query as read from disk, or the reason it could not be read.
pub type QueryRow = std::result::Result<TripInput, InputError>;

/// Source of the labelled historical cases the predictor compares against.
pub trait CaseRepository: Send + Sync {
    fn load_training_set(&self) -> Result<TrainingSet>;
}

/// Source of unlabelled trips to run through the predictor in bulk.
///
/// A row that does not parse is returned as an error in its slot; rows that
/// parse are returned unvalidated.
pub trait QueryRepository: Send + Sync {
    fn load_queries(&self) -> Result<Vec<QueryRow>>;
}
