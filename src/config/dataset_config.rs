//! Dataset and output location parsing from environment variables.

use std::path::PathBuf;

/// File locations used by the binaries
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEnvConfig {
    /// Labelled historical cases (`REIMBURSE_DATASET_PATH`)
    pub dataset_path: PathBuf,
    /// Unlabelled trips for batch runs (`REIMBURSE_QUERY_PATH`)
    pub query_path: PathBuf,
    /// Batch output, one amount per line (`REIMBURSE_RESULTS_PATH`)
    pub results_path: PathBuf,
    /// Evaluation reports directory (`REIMBURSE_REPORT_DIR`)
    pub report_dir: PathBuf,
}

impl Default for DatasetEnvConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("public_cases.json"),
            query_path: PathBuf::from("private_cases.json"),
            results_path: PathBuf::from("private_results.txt"),
            report_dir: PathBuf::from("reports"),
        }
    }
}

impl DatasetEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };

        Self {
            dataset_path: path("REIMBURSE_DATASET_PATH", defaults.dataset_path),
            query_path: path("REIMBURSE_QUERY_PATH", defaults.query_path),
            results_path: path("REIMBURSE_RESULTS_PATH", defaults.results_path),
            report_dir: path("REIMBURSE_REPORT_DIR", defaults.report_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_dataset_config_defaults() {
        let config = DatasetEnvConfig::from_lookup(|_| None);
        assert_eq!(config, DatasetEnvConfig::default());
        assert_eq!(config.dataset_path, PathBuf::from("public_cases.json"));
    }

    #[test]
    fn test_dataset_config_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REIMBURSE_DATASET_PATH", "/data/cases.json"),
            ("REIMBURSE_REPORT_DIR", "  "),
        ]
        .into_iter()
        .collect();
        let config = DatasetEnvConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.dataset_path, PathBuf::from("/data/cases.json"));
        // Blank values fall back to defaults
        assert_eq!(config.report_dir, PathBuf::from("reports"));
    }
}
