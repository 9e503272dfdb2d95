use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use trendline_core::timeseries::change::change_factor;
use trendline_core::{Point, Series, change_multipliers};

fn series(values: &[f64]) -> Series {
    let base = NaiveDate::from_ymd_opt(2012, 3, 1).unwrap();
    let pts = values
        .iter()
        .enumerate()
        .map(|(i, v)| Point::new(base + Duration::days(i64::try_from(i).unwrap()), *v))
        .collect();
    Series::new(pts).unwrap()
}

#[test]
fn flat_days_give_identity() {
    assert_eq!(change_factor(42.0, 42.0), 1.0);
}

#[test]
fn steep_drop_is_clamped_to_floor() {
    // log10(1/101) < -0.9, clamped: 1 + log10(0.1) = 0
    assert!((change_factor(100.0, 0.0) - 0.0).abs() < 1e-12);
}

#[test]
fn steep_rise_is_capped() {
    let cap = 1.0 + 2f64.log10();
    assert!((change_factor(0.0, 100.0) - cap).abs() < 1e-12);
}

#[test]
fn moderate_rise_matches_formula() {
    let rel = (11.0f64 / 6.0).log10();
    let expected = 1.0 + (1.0 + rel).log10();
    assert!((change_factor(5.0, 10.0) - expected).abs() < 1e-12);
}

#[test]
fn dates_follow_series() {
    let s = series(&[1.0, 2.0, 3.0]);
    let m = change_multipliers(&s);
    let dates: Vec<_> = m.iter().map(|c| c.date).collect();
    let expected: Vec<_> = s.points().iter().map(|p| p.date).collect();
    assert_eq!(dates, expected);
    assert!(change_multipliers(&Series::default()).is_empty());
}

proptest! {
    #[test]
    fn multipliers_have_same_length_identity_seed_and_bounds(
        values in proptest::collection::vec(0u32..=100, 1..300)
    ) {
        let v: Vec<f64> = values.into_iter().map(f64::from).collect();
        let m = change_multipliers(&series(&v));
        prop_assert_eq!(m.len(), v.len());
        prop_assert_eq!(m[0].factor, 1.0);
        let lo = 1.0 + 0.1f64.log10();
        let hi = 1.0 + 2f64.log10();
        for c in &m {
            prop_assert!(c.factor >= lo - 1e-12 && c.factor <= hi + 1e-12, "factor {}", c.factor);
        }
    }
}
