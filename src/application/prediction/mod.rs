pub mod knn_predictor;
pub mod predictor;

pub use knn_predictor::KnnPredictor;
pub use predictor::ReimbursementPredictor;
