//! Observability configuration parsing from environment variables.
//!
//! This module handles loading log level and format settings.

use anyhow::{Result, bail};
use std::str::FromStr;

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => bail!(
                "Invalid REIMBURSE_LOG_FORMAT: {}. Must be 'pretty' or 'compact'",
                s
            ),
        }
    }
}

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let log_format = match lookup("REIMBURSE_LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw)?,
            None => defaults.log_format,
        };

        Ok(Self {
            log_level: lookup("REIMBURSE_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
        })
    }
}
