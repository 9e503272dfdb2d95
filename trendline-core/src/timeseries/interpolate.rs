use chrono::Duration;

use trendline_types::{Observation, Point, Series, TrendsError};

/// Densify an ordered, possibly sparse point sequence into one point per day.
///
/// Between each consecutive pair `(a, b)` spanning `n` days, `n` evenly spaced
/// values from `a` up to (excluding) `b` are emitted; `b` itself closes the
/// series after the last pair. Pairs sharing a day contribute nothing, so the
/// later point of a duplicate anchors the next segment. The output always has
/// `(last - first).days + 1` points.
///
/// # Errors
/// Returns `TrendsError::Data` if dates decrease anywhere in the input.
pub fn interpolate(points: &[Point]) -> Result<Series, TrendsError> {
    let Some(last) = points.last() else {
        return Ok(Series::default());
    };

    let mut out: Vec<Point> = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let days = (b.date - a.date).num_days();
        if days < 0 {
            return Err(TrendsError::Data(format!(
                "interpolation input out of order: {} then {}",
                a.date, b.date
            )));
        }
        let step = (b.value - a.value) / days as f64;
        for k in 0..days {
            out.push(Point::new(
                a.date + Duration::days(k),
                a.value + step * k as f64,
            ));
        }
    }
    out.push(*last);

    Series::new(out)
}

/// [`interpolate`] over raw portal observations.
///
/// # Errors
/// Returns `TrendsError::Data` if dates decrease anywhere in the input.
pub fn interpolate_observations(observations: &[Observation]) -> Result<Series, TrendsError> {
    let points: Vec<Point> = observations.iter().copied().map(Point::from).collect();
    interpolate(&points)
}
