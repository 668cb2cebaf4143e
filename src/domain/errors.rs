use thiserror::Error;

/// Errors raised while building a trip query from raw values
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Invalid {field}: '{value}' is not a valid number")]
    Malformed { field: &'static str, value: String },

    #[error("Invalid {field}: {value} must not be negative")]
    Negative { field: &'static str, value: f64 },

    #[error("Invalid {field}: value must be finite")]
    NotFinite { field: &'static str },

    #[error("Unreadable trip row: {reason}")]
    UnreadableRow { reason: String },
}

/// Errors related to loading the historical case dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset contains no historical cases")]
    Empty,

    #[error("Failed to read dataset at {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset at {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Case #{index} is invalid: {source}")]
    InvalidCase {
        index: usize,
        #[source]
        source: InputError,
    },
}

/// Errors related to the nearest-neighbour estimate itself
#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("Cannot predict from an empty training set")]
    EmptyTrainingSet,

    #[error("Neighbor count must be at least 1, got {k}")]
    InvalidNeighborCount { k: usize },
}

/// Errors related to evaluating the predictor against labelled cases
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("No cases to evaluate")]
    NoCases,

    #[error("Case #{index} could not be predicted: {source}")]
    Prediction {
        index: usize,
        #[source]
        source: PredictionError,
    },
}
