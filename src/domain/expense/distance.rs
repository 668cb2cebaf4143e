use super::types::TripInput;

/// Per-feature divisors that bring each axis to a comparable magnitude.
///
/// Fixed empirical ranges: trips run roughly 1-20 days, mileage 0-2000,
/// receipts 0-3000. They do not adapt to the loaded dataset.
pub struct FeatureScales;

impl FeatureScales {
    pub const DAYS: f64 = 20.0;
    pub const MILES: f64 = 2000.0;
    pub const RECEIPTS: f64 = 3000.0;
}

/// Scaled Euclidean distance between two trips.
pub fn scaled_distance(a: &TripInput, b: &TripInput) -> f64 {
    let days_diff =
        (f64::from(a.trip_duration_days) - f64::from(b.trip_duration_days)) / FeatureScales::DAYS;
    let miles_diff = (a.miles_traveled - b.miles_traveled) / FeatureScales::MILES;
    let receipts_diff =
        (a.total_receipts_amount - b.total_receipts_amount) / FeatureScales::RECEIPTS;

    (days_diff * days_diff + miles_diff * miles_diff + receipts_diff * receipts_diff).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(days: u32, miles: f64, receipts: f64) -> TripInput {
        TripInput::new(days, miles, receipts).unwrap()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = trip(5, 320.5, 812.33);
        assert_eq!(scaled_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (trip(1, 0.0, 0.0), trip(14, 1200.0, 2400.0)),
            (trip(7, 55.5, 10.0), trip(3, 900.0, 1.5)),
            (trip(0, 0.0, 0.0), trip(0, 0.001, 0.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(scaled_distance(&a, &b), scaled_distance(&b, &a));
            assert!(scaled_distance(&a, &b) >= 0.0);
        }
    }

    #[test]
    fn test_each_axis_uses_its_own_scale() {
        let base = trip(1, 0.0, 0.0);

        // One full scale unit along any axis is a distance of 1.0
        assert!((scaled_distance(&base, &trip(21, 0.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((scaled_distance(&base, &trip(1, 2000.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((scaled_distance(&base, &trip(1, 0.0, 3000.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_combines_axes_euclidean() {
        // 12 days (0.6) and 1600 miles (0.8)
        let a = trip(2, 100.0, 50.0);
        let b = trip(14, 1700.0, 50.0);
        assert!((scaled_distance(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_day_order_does_not_underflow() {
        let short = trip(1, 0.0, 0.0);
        let long = trip(11, 0.0, 0.0);
        assert!((scaled_distance(&short, &long) - 0.5).abs() < 1e-12);
    }
}
