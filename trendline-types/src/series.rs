//! Interest-over-time value objects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TrendsError;

/// One raw interest-over-time reading as reported by the portal (0-100 scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day the reading is anchored on.
    pub date: NaiveDate,
    /// Interest score.
    pub value: u32,
}

impl Observation {
    /// Build an observation.
    #[must_use]
    pub const fn new(date: NaiveDate, value: u32) -> Self {
        Self { date, value }
    }
}

/// A daily point of a reconstructed series. Values are real after interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Calendar day.
    pub date: NaiveDate,
    /// Interest value.
    pub value: f64,
}

impl Point {
    /// Build a point.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<Observation> for Point {
    fn from(o: Observation) -> Self {
        Self {
            date: o.date,
            value: f64::from(o.value),
        }
    }
}

/// Ordered points with strictly increasing dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    /// Build a series, checking that dates strictly increase.
    ///
    /// # Errors
    /// Returns `TrendsError::Data` on a duplicate or out-of-order date.
    pub fn new(points: Vec<Point>) -> Result<Self, TrendsError> {
        if let Some(w) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(TrendsError::Data(format!(
                "series dates must strictly increase: {} then {}",
                w[0].date, w[1].date
            )));
        }
        Ok(Self { points })
    }

    /// Points in chronological order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the series, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values in chronological order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// First point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// True when every value is zero (an empty series counts as all zero).
    #[must_use]
    pub fn is_all_zero(&self) -> bool {
        self.points.iter().all(|p| p.value == 0.0)
    }
}

impl TryFrom<Vec<Point>> for Series {
    type Error = TrendsError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Series> for Vec<Point> {
    fn from(s: Series) -> Self {
        s.points
    }
}

/// Day-over-day adjustment factor. The first day of a series carries 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeMultiplier {
    /// Day the factor applies to.
    pub date: NaiveDate,
    /// Multiplicative factor relative to the previous day.
    pub factor: f64,
}

/// Closed calendar range `[start, end]` used to query the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window.
    ///
    /// # Errors
    /// Returns `TrendsError::InvalidArg` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TrendsError> {
        if start > end {
            return Err(TrendsError::InvalidArg(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Length of the window in days (`end - start`).
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// One fine-grained sub-window of a long query span and the readings it returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterWindow {
    /// Queried range.
    pub window: DateWindow,
    /// Raw readings returned for the range, in portal order.
    pub observations: Vec<Observation>,
    /// True when the portal reported no measurable interest for the range.
    pub is_all_zero: bool,
}

impl QuarterWindow {
    /// Wrap the readings returned for `window`, deriving the all-zero flag.
    #[must_use]
    pub fn new(window: DateWindow, observations: Vec<Observation>) -> Self {
        let is_all_zero = observations.iter().all(|o| o.value == 0);
        Self {
            window,
            observations,
            is_all_zero,
        }
    }

    /// A zero-interest placeholder anchored on the window's first and last day.
    #[must_use]
    pub fn zero_filled(window: DateWindow) -> Self {
        let mut observations = vec![Observation::new(window.start(), 0)];
        if window.end() > window.start() {
            observations.push(Observation::new(window.end(), 0));
        }
        Self {
            window,
            observations,
            is_all_zero: true,
        }
    }
}
