//! Tracing subscriber setup shared by the binaries.
//!
//! Logs always go to stderr: stdout is reserved for results.

use crate::config::{LogFormat, ObservabilityEnvConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn env_filter(config: &ObservabilityEnvConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Installs the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init_tracing(config: &ObservabilityEnvConfig) {
    let filter = env_filter(config);

    let result = match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .pretty(),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
