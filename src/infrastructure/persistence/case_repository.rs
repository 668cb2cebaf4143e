//! JSON-file loaders for historical cases and unlabelled queries.
//!
//! Cases use the dataset layout
//! `[{"input": {"trip_duration_days", "miles_traveled", "total_receipts_amount"}, "expected_output"}]`.
//! Query files may list bare inputs or the same labelled layout; labels are ignored.

use crate::domain::errors::{DatasetError, InputError};
use crate::domain::expense::types::{HistoricalCase, TrainingSet};
use crate::domain::ports::{CaseRepository, QueryRepository, QueryRow};
use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads and validates every case in a dataset file.
pub fn load_cases(path: &Path) -> Result<Vec<HistoricalCase>, DatasetError> {
    let content = read(path)?;
    let cases: Vec<HistoricalCase> =
        serde_json::from_str(&content).map_err(|source| DatasetError::Malformed {
            path: path.display().to_string(),
            source,
        })?;

    for (index, case) in cases.iter().enumerate() {
        case.input
            .validate()
            .map_err(|source| DatasetError::InvalidCase { index, source })?;
    }

    Ok(cases)
}

fn read(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Unreadable {
        path: path.display().to_string(),
        source,
    })
}

pub struct JsonCaseRepository {
    path: PathBuf,
}

impl JsonCaseRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CaseRepository for JsonCaseRepository {
    fn load_training_set(&self) -> Result<TrainingSet> {
        let cases = load_cases(&self.path)?;
        let set = TrainingSet::new(cases)?;
        info!("Loaded {} historical cases from {:?}", set.len(), self.path);
        Ok(set)
    }
}

/// Reads one query row, bare or wrapped in `{"input": ...}`.
fn parse_query_row(row: Value) -> QueryRow {
    let input = match row {
        Value::Object(mut fields) if fields.contains_key("input") => {
            fields.remove("input").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(input).map_err(|e| InputError::UnreadableRow {
        reason: e.to_string(),
    })
}

pub struct JsonQueryRepository {
    path: PathBuf,
}

impl JsonQueryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QueryRepository for JsonQueryRepository {
    fn load_queries(&self) -> Result<Vec<QueryRow>> {
        let content = read(&self.path)?;
        let rows: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| DatasetError::Malformed {
                path: self.path.display().to_string(),
                source,
            })?;

        let queries: Vec<QueryRow> = rows.into_iter().map(parse_query_row).collect();
        for (index, query) in queries.iter().enumerate() {
            if let Err(e) = query {
                warn!("Query #{} in {:?} is unreadable: {}", index, self.path, e);
            }
        }

        info!("Loaded {} queries from {:?}", queries.len(), self.path);
        Ok(queries)
    }
}
