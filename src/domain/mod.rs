// Travel expense domain
pub mod expense;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
