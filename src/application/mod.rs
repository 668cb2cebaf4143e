// Reimbursement predictors
pub mod prediction;

// Accuracy evaluation and batch runs
pub mod evaluation;
