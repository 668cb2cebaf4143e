use crate::domain::errors::{DatasetError, InputError};
use serde::{Deserialize, Serialize};

/// The three facts a reimbursement is estimated from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    pub trip_duration_days: u32,
    pub miles_traveled: f64,
    pub total_receipts_amount: f64,
}

impl TripInput {
    /// Creates a validated trip input.
    ///
    /// Miles and receipts must be finite and non-negative.
    pub fn new(
        trip_duration_days: u32,
        miles_traveled: f64,
        total_receipts_amount: f64,
    ) -> Result<Self, InputError> {
        let input = Self {
            trip_duration_days,
            miles_traveled,
            total_receipts_amount,
        };
        input.validate()?;
        Ok(input)
    }

    /// Parses the three raw command-line values.
    pub fn parse(days: &str, miles: &str, receipts: &str) -> Result<Self, InputError> {
        let trip_duration_days = days
            .trim()
            .parse::<u32>()
            .map_err(|_| InputError::Malformed {
                field: "trip_duration_days",
                value: days.to_string(),
            })?;
        let miles_traveled = parse_amount("miles_traveled", miles)?;
        let total_receipts_amount = parse_amount("total_receipts_amount", receipts)?;

        Self::new(trip_duration_days, miles_traveled, total_receipts_amount)
    }

    /// Checks the invariants `new` enforces. Deserialized inputs bypass `new`,
    /// so loaders call this explicitly.
    pub fn validate(&self) -> Result<(), InputError> {
        check_amount("miles_traveled", self.miles_traveled)?;
        check_amount("total_receipts_amount", self.total_receipts_amount)
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| InputError::Malformed {
            field,
            value: raw.to_string(),
        })
}

fn check_amount(field: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}

/// A past trip together with the reimbursement that was actually paid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalCase {
    pub input: TripInput,
    pub expected_output: f64,
}

impl HistoricalCase {
    pub fn new(input: TripInput, expected_output: f64) -> Self {
        Self {
            input,
            expected_output,
        }
    }
}

/// A scored candidate during ranking. Only lives for one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub output: f64,
}

/// Immutable, non-empty collection of historical cases.
///
/// Loaded once per process and shared read-only (typically behind an `Arc`)
/// between any number of concurrent predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    cases: Vec<HistoricalCase>,
}

impl TrainingSet {
    pub fn new(cases: Vec<HistoricalCase>) -> Result<Self, DatasetError> {
        if cases.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[HistoricalCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoricalCase> {
        self.cases.iter()
    }
}

impl<'a> IntoIterator for &'a TrainingSet {
    type Item = &'a HistoricalCase;
    type IntoIter = std::slice::Iter<'a, HistoricalCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
