use reimburse::application::prediction::{KnnPredictor, ReimbursementPredictor};
use reimburse::domain::expense::{
    HistoricalCase, PredictionMethod, TrainingSet, TripInput, WEIGHT_EPSILON,
    predict_weighted_knn, scaled_distance,
};
use std::sync::Arc;

fn case(days: u32, miles: f64, receipts: f64, output: f64) -> HistoricalCase {
    HistoricalCase::new(TripInput::new(days, miles, receipts).unwrap(), output)
}

fn predictor(cases: Vec<HistoricalCase>) -> KnnPredictor {
    KnnPredictor::new(Arc::new(TrainingSet::new(cases).unwrap()))
}

fn formatted(predictor: &KnnPredictor, days: u32, miles: f64, receipts: f64) -> String {
    let input = TripInput::new(days, miles, receipts).unwrap();
    format!("{:.2}", predictor.predict(&input).unwrap().amount)
}

fn sample_cases() -> Vec<HistoricalCase> {
    vec![
        case(3, 93.0, 1.42, 364.51),
        case(1, 55.0, 3.6, 126.06),
        case(1, 47.0, 17.97, 128.91),
        case(2, 13.0, 4.67, 203.52),
        case(3, 88.0, 5.78, 380.37),
        case(5, 130.0, 306.9, 574.1),
        case(5, 173.0, 1337.9, 1443.96),
        case(8, 482.0, 1411.49, 631.81),
        case(14, 1056.0, 2489.69, 1894.16),
        case(10, 1201.0, 1149.66, 1771.02),
    ]
}

#[test]
fn test_single_record_exact_match() {
    let predictor = predictor(vec![case(3, 100.0, 50.0, 120.0)]);
    assert_eq!(formatted(&predictor, 3, 100.0, 50.0), "120.00");
}

#[test]
fn test_equidistant_pair_averages() {
    let predictor = predictor(vec![
        case(10, 3000.0, 1000.0, 100.0),
        case(10, 1000.0, 4000.0, 200.0),
    ]);
    assert_eq!(formatted(&predictor, 10, 1000.0, 1000.0), "150.00");
}

#[test]
fn test_near_neighbor_dominates_far_one() {
    let predictor = predictor(vec![
        case(5, 100.2, 100.0, 50.0),
        case(205, 100.0, 100.0, 500.0),
    ]);
    assert_eq!(formatted(&predictor, 5, 100.0, 100.0), "50.00");
}

#[test]
fn test_two_records_with_default_k() {
    let predictor = predictor(vec![case(1, 0.0, 0.0, 80.0), case(9, 0.0, 0.0, 240.0)]);
    let prediction = predictor
        .predict(&TripInput::new(3, 0.0, 0.0).unwrap())
        .unwrap();

    // Distances 0.1 and 0.3 give weights close to 3:1
    let (near, far) = (1.0 / (0.1 + WEIGHT_EPSILON), 1.0 / (0.3 + WEIGHT_EPSILON));
    let expected = (near * 80.0 + far * 240.0) / (near + far);
    assert!((prediction.amount - expected).abs() < 1e-9);
    assert!((prediction.amount - 120.0).abs() < 1e-5);
    assert!(matches!(
        prediction.method,
        PredictionMethod::WeightedNeighbors {
            neighbors_used: 2,
            ..
        }
    ));
}

#[test]
fn test_every_record_reproduces_its_output() {
    let cases = sample_cases();
    let predictor = predictor(cases.clone());

    for case in &cases {
        let prediction = predictor.predict(&case.input).unwrap();
        assert_eq!(prediction.amount, case.expected_output);
        assert!(prediction.is_exact_match());
    }
}

#[test]
fn test_small_perturbation_still_matches_exactly() {
    let predictor = predictor(sample_cases());
    let prediction = predictor
        .predict(&TripInput::new(5, 130.0009, 306.8991).unwrap())
        .unwrap();

    assert_eq!(prediction.amount, 574.1);
}

#[test]
fn test_weighted_estimate_within_selected_outputs() {
    let cases = sample_cases();
    let query = TripInput::new(6, 300.0, 900.0).unwrap();

    let mut ranked: Vec<(f64, f64)> = cases
        .iter()
        .map(|c| (scaled_distance(&query, &c.input), c.expected_output))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    let selected = &ranked[..5];
    let lo = selected.iter().map(|r| r.1).fold(f64::INFINITY, f64::min);
    let hi = selected.iter().map(|r| r.1).fold(f64::NEG_INFINITY, f64::max);

    let amount = predict_weighted_knn(&query, &cases, 5).unwrap();
    assert!(amount >= lo - 1e-9 && amount <= hi + 1e-9);
}

#[test]
fn test_distance_symmetry_over_dataset() {
    let cases = sample_cases();
    for a in &cases {
        for b in &cases {
            let d = scaled_distance(&a.input, &b.input);
            assert_eq!(d, scaled_distance(&b.input, &a.input));
            assert!(d >= 0.0);
        }
        assert_eq!(scaled_distance(&a.input, &a.input), 0.0);
    }
}
