//! Configuration module for the reimbursement tools.
//!
//! Settings are read from environment variables (optionally seeded from a
//! `.env` file by the binaries), organized by concern: Dataset and Observability.
//! The neighbour count and feature scales are fixed and not configurable.

mod dataset_config;
mod observability_config;

pub use dataset_config::DatasetEnvConfig;
pub use observability_config::{LogFormat, ObservabilityEnvConfig};

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset: DatasetEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let dataset = DatasetEnvConfig::from_lookup(&lookup);
        let observability = ObservabilityEnvConfig::from_lookup(&lookup)
            .context("Failed to load observability config")?;

        Ok(Self {
            dataset,
            observability,
        })
    }
}
