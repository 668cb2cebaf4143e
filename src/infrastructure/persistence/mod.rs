pub mod case_repository;

pub use case_repository::{JsonCaseRepository, JsonQueryRepository, load_cases};
