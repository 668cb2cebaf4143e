//! Inverse-distance-weighted nearest-neighbour estimate.
//!
//! A query that matches a historical trip (same day count, miles and receipts
//! within [`EXACT_MATCH_TOLERANCE`]) returns that trip's reimbursement as-is.
//! Otherwise every case is scored with [`scaled_distance`], the `k` closest are
//! kept, and their outputs are averaged with weights `1 / (distance + ε)`.

use super::distance::scaled_distance;
use super::types::{HistoricalCase, Neighbor, TripInput};
use crate::domain::errors::PredictionError;

/// Number of neighbours blended into a weighted estimate.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

/// Absolute tolerance on miles and receipts for the exact-match shortcut.
pub const EXACT_MATCH_TOLERANCE: f64 = 0.001;

/// Added to every distance so a near-duplicate never divides by zero.
pub const WEIGHT_EPSILON: f64 = 1e-8;

/// Which branch of the algorithm produced an estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionMethod {
    /// Returned the stored output of the case at `index` unchanged
    ExactMatch { index: usize },
    /// Blended the outputs of the closest cases
    WeightedNeighbors {
        neighbors_used: usize,
        nearest_distance: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub amount: f64,
    pub method: PredictionMethod,
}

impl Prediction {
    pub fn is_exact_match(&self) -> bool {
        matches!(self.method, PredictionMethod::ExactMatch { .. })
    }
}

/// Estimates the reimbursement for `query` and returns only the amount.
pub fn predict_weighted_knn(
    query: &TripInput,
    cases: &[HistoricalCase],
    k: usize,
) -> Result<f64, PredictionError> {
    estimate(query, cases, k).map(|p| p.amount)
}

/// Estimates the reimbursement for `query` against every case.
pub fn estimate(
    query: &TripInput,
    cases: &[HistoricalCase],
    k: usize,
) -> Result<Prediction, PredictionError> {
    estimate_filtered(query, cases, k, None)
}

/// Same as [`estimate`] but ignores the case at `excluded_index`.
///
/// Used for leave-one-out evaluation, where the held-out case would otherwise
/// always short-circuit to its own output.
pub fn estimate_excluding(
    query: &TripInput,
    cases: &[HistoricalCase],
    k: usize,
    excluded_index: usize,
) -> Result<Prediction, PredictionError> {
    estimate_filtered(query, cases, k, Some(excluded_index))
}

fn estimate_filtered(
    query: &TripInput,
    cases: &[HistoricalCase],
    k: usize,
    excluded: Option<usize>,
) -> Result<Prediction, PredictionError> {
    if k == 0 {
        return Err(PredictionError::InvalidNeighborCount { k });
    }

    // First match in dataset order wins
    if let Some((index, case)) =
        candidates(cases, excluded).find(|(_, case)| is_exact_match(query, &case.input))
    {
        return Ok(Prediction {
            amount: case.expected_output,
            method: PredictionMethod::ExactMatch { index },
        });
    }

    let mut neighbors: Vec<Neighbor> = candidates(cases, excluded)
        .map(|(_, case)| Neighbor {
            distance: scaled_distance(query, &case.input),
            output: case.expected_output,
        })
        .collect();

    if neighbors.is_empty() {
        return Err(PredictionError::EmptyTrainingSet);
    }

    // Stable sort keeps dataset order among equal distances
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbors.truncate(k);

    let nearest = neighbors[0];
    let (weighted_sum, total_weight) =
        neighbors.iter().fold((0.0, 0.0), |(sum, total), neighbor| {
            let weight = 1.0 / (neighbor.distance + WEIGHT_EPSILON);
            (sum + weight * neighbor.output, total + weight)
        });

    let amount = if total_weight == 0.0 {
        nearest.output
    } else {
        weighted_sum / total_weight
    };

    Ok(Prediction {
        amount,
        method: PredictionMethod::WeightedNeighbors {
            neighbors_used: neighbors.len(),
            nearest_distance: nearest.distance,
        },
    })
}

fn candidates(
    cases: &[HistoricalCase],
    excluded: Option<usize>,
) -> impl Iterator<Item = (usize, &HistoricalCase)> {
    cases
        .iter()
        .enumerate()
        .filter(move |(i, _)| Some(*i) != excluded)
}

fn is_exact_match(query: &TripInput, candidate: &TripInput) -> bool {
    candidate.trip_duration_days == query.trip_duration_days
        && (candidate.miles_traveled - query.miles_traveled).abs() < EXACT_MATCH_TOLERANCE
        && (candidate.total_receipts_amount - query.total_receipts_amount).abs()
            < EXACT_MATCH_TOLERANCE
}
