use chrono::NaiveDate;
use proptest::prelude::*;
use trendline_core::timeseries::change::change_factor;
use trendline_core::{
    DateWindow, Observation, QuarterWindow, interpolate_observations, merge_quarters,
    normalize_first_column, quarter_multipliers,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn quarter(start: NaiveDate, end: NaiveDate, v0: u32, v1: u32) -> QuarterWindow {
    QuarterWindow::new(
        DateWindow::new(start, end).unwrap(),
        vec![Observation::new(start, v0), Observation::new(end, v1)],
    )
}

#[test]
fn flat_quarter_leaves_anchor_untouched() {
    let anchor = [Observation::new(d(2020, 1, 1), 10), Observation::new(d(2020, 1, 31), 40)];
    let q = quarter(d(2020, 1, 1), d(2020, 1, 31), 50, 50);
    let merged = merge_quarters(&anchor, &[q]).unwrap();
    assert!(merged.rescaled);
    assert_eq!(merged.all_zero_quarters, 0);
    assert_eq!(merged.series, interpolate_observations(&anchor).unwrap());
}

#[test]
fn output_is_restricted_to_common_days() {
    let anchor = [Observation::new(d(2020, 1, 1), 20), Observation::new(d(2020, 3, 1), 20)];
    let q = quarter(d(2020, 2, 1), d(2020, 2, 10), 5, 5);
    let merged = merge_quarters(&anchor, &[q]).unwrap();
    assert_eq!(merged.series.len(), 10);
    assert_eq!(merged.series.first().unwrap().date, d(2020, 2, 1));
    assert_eq!(merged.series.last().unwrap().date, d(2020, 2, 10));
}

#[test]
fn all_zero_anchor_is_returned_without_rescaling() {
    let anchor = [Observation::new(d(2019, 6, 1), 0), Observation::new(d(2019, 6, 5), 0)];
    let q = quarter(d(2019, 6, 1), d(2019, 6, 5), 10, 90);
    let merged = merge_quarters(&anchor, &[q]).unwrap();
    assert!(!merged.rescaled);
    assert_eq!(merged.series.len(), 5);
    assert!(merged.series.is_all_zero());
}

#[test]
fn missing_quarters_fall_back_to_anchor() {
    let anchor = [Observation::new(d(2019, 6, 1), 3), Observation::new(d(2019, 6, 3), 9)];
    let merged = merge_quarters(&anchor, &[]).unwrap();
    assert!(!merged.rescaled);
    assert_eq!(merged.series.values(), vec![3.0, 6.0, 9.0]);
}

#[test]
fn zero_quarters_are_counted_and_neutral() {
    let anchor = [Observation::new(d(2021, 1, 1), 30), Observation::new(d(2021, 1, 11), 30)];
    let window = DateWindow::new(d(2021, 1, 1), d(2021, 1, 11)).unwrap();
    let merged = merge_quarters(&anchor, &[QuarterWindow::zero_filled(window)]).unwrap();
    assert_eq!(merged.all_zero_quarters, 1);
    // zero-filled quarters stay zero through smoothing, so every factor is 1
    assert!(merged.series.values().iter().all(|v| (*v - 30.0).abs() < 1e-12));
}

#[test]
fn no_interest_quarter_keeps_every_day_of_its_window() {
    let anchor = [Observation::new(d(2014, 1, 1), 40), Observation::new(d(2014, 7, 1), 60)];
    let span = DateWindow::new(d(2014, 1, 1), d(2014, 7, 1)).unwrap();
    let first = quarter(d(2014, 1, 1), d(2014, 4, 1), 10, 30);

    for echo in ["Worldwide; Apr 2014", "Worldwide; 2014"] {
        let payload = format!("Web Search interest: x\n{echo}\n\n");
        let readings = normalize_first_column(&payload, d(2014, 4, 1)).unwrap();
        let second =
            QuarterWindow::new(DateWindow::new(d(2014, 4, 1), d(2014, 7, 1)).unwrap(), readings);
        assert!(second.is_all_zero);

        let merged = merge_quarters(&anchor, &[first.clone(), second]).unwrap();
        assert_eq!(merged.all_zero_quarters, 1);
        assert_eq!(merged.series.len() as i64, span.days() + 1);
        assert_eq!(merged.series.first().unwrap().date, span.start());
        assert_eq!(merged.series.last().unwrap().date, span.end());
    }
}

#[test]
fn earlier_quarter_wins_shared_boundary_day() {
    let a = quarter(d(2020, 1, 1), d(2020, 1, 10), 10, 20);
    let b = quarter(d(2020, 1, 10), d(2020, 1, 20), 80, 80);
    // deliberately out of order
    let m = quarter_multipliers(&[b, a]).unwrap();

    let boundary = m.iter().find(|c| c.date == d(2020, 1, 10)).unwrap();
    let expected = change_factor(10.0 + (10.0 / 9.0) * 8.0, 20.0);
    assert!((boundary.factor - expected).abs() < 1e-12);
    assert_eq!(m.len(), 20);
    assert!(m.windows(2).all(|w| w[0].date < w[1].date));
}

proptest! {
    #[test]
    fn merged_values_stay_within_multiplier_bounds(
        a0 in 1u32..=100,
        a1 in 1u32..=100,
        q0 in 0u32..=100,
        q1 in 0u32..=100,
    ) {
        let anchor = [Observation::new(d(2018, 1, 1), a0), Observation::new(d(2018, 3, 1), a1)];
        let q = quarter(d(2018, 1, 1), d(2018, 3, 1), q0, q1);
        let merged = merge_quarters(&anchor, &[q]).unwrap();
        let daily = interpolate_observations(&anchor).unwrap();
        prop_assert_eq!(merged.series.len(), daily.len());
        let hi = 1.0 + 2f64.log10();
        for (m, p) in merged.series.points().iter().zip(daily.points()) {
            prop_assert!(m.value >= 0.0);
            prop_assert!(m.value <= p.value * hi + 1e-9);
        }
    }
}
