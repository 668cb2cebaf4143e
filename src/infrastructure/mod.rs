// Dataset loading
pub mod persistence;

// Logging setup
pub mod observability;
