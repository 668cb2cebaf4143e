// Trip inputs and historical cases
pub mod types;

// Feature-scaled distance between trips
pub mod distance;

// Nearest-neighbour reimbursement estimate
pub mod knn;

pub use distance::{FeatureScales, scaled_distance};
pub use knn::{
    DEFAULT_NEIGHBOR_COUNT, EXACT_MATCH_TOLERANCE, Prediction, PredictionMethod, WEIGHT_EPSILON,
    estimate, estimate_excluding, predict_weighted_knn,
};
pub use types::{HistoricalCase, Neighbor, TrainingSet, TripInput};
