//! Observability for the reimbursement tools
//!
//! Structured `tracing` logs written to stderr, filtered by `RUST_LOG` or
//! `REIMBURSE_LOG_LEVEL`.

pub mod logging;

pub use logging::init_tracing;
