use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::timeseries::change::change_multipliers;
use crate::timeseries::interpolate::interpolate_observations;
use crate::timeseries::smooth::smooth_zeros;
use trendline_types::{ChangeMultiplier, Observation, Point, QuarterWindow, Series, TrendsError};

/// Result of reconciling a long-span series with its quarter windows.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSeries {
    /// One value per day on the common date range.
    pub series: Series,
    /// Quarter windows that reported no measurable interest. Diagnostic only.
    pub all_zero_quarters: usize,
    /// False when the interpolated long-span series was returned without rescaling.
    pub rescaled: bool,
}

/// Change multipliers of every quarter, concatenated chronologically.
///
/// Each quarter is interpolated, smoothed, and converted on its own: the portal
/// rescales every query window independently, so only the relative movement
/// inside one window is meaningful. An all-zero quarter counts as zero on every
/// day of its window, so it still contributes a neutral multiplier per day. On a
/// boundary day shared by two quarters the earlier quarter's multiplier wins.
///
/// # Errors
/// Returns `TrendsError::Data` if a quarter's observations are out of order.
pub fn quarter_multipliers(
    quarters: &[QuarterWindow],
) -> Result<Vec<ChangeMultiplier>, TrendsError> {
    let mut ordered: Vec<&QuarterWindow> = quarters.iter().collect();
    ordered.sort_by_key(|q| q.window.start());

    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for q in ordered {
        let filled;
        let observations = if q.is_all_zero {
            filled = QuarterWindow::zero_filled(q.window);
            &filled.observations
        } else {
            &q.observations
        };
        let daily = smooth_zeros(&interpolate_observations(observations)?);
        for m in change_multipliers(&daily) {
            by_day.entry(m.date).or_insert(m.factor);
        }
    }
    Ok(by_day
        .into_iter()
        .map(|(date, factor)| ChangeMultiplier { date, factor })
        .collect())
}

/// Rescale the long-span `anchor` by the day-to-day dynamics of `quarters`.
///
/// The anchor is interpolated to daily resolution and intersected with the
/// quarter multipliers' dates; each common day gets
/// `anchor_value * quarter_multiplier`. Absolute level therefore comes from the
/// long span while daily movement comes from the fine-grained windows.
///
/// When the interpolated anchor is entirely zero, or there are no quarter
/// windows, it is returned as is with `rescaled == false`.
///
/// # Errors
/// Returns `TrendsError::Data` if any input is out of chronological order.
pub fn merge_quarters(
    anchor: &[Observation],
    quarters: &[QuarterWindow],
) -> Result<MergedSeries, TrendsError> {
    let all_zero_quarters = quarters.iter().filter(|q| q.is_all_zero).count();
    let daily = interpolate_observations(anchor)?;

    if daily.is_all_zero() || quarters.is_empty() {
        return Ok(MergedSeries {
            series: daily,
            all_zero_quarters,
            rescaled: false,
        });
    }

    let multipliers: BTreeMap<NaiveDate, f64> = quarter_multipliers(quarters)?
        .into_iter()
        .map(|m| (m.date, m.factor))
        .collect();

    let merged: Vec<Point> = daily
        .points()
        .iter()
        .filter_map(|p| {
            multipliers
                .get(&p.date)
                .map(|factor| Point::new(p.date, p.value * factor))
        })
        .collect();

    Ok(MergedSeries {
        series: Series::new(merged)?,
        all_zero_quarters,
        rescaled: true,
    })
}
