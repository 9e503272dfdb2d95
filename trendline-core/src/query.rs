use chrono::{Datelike, Months, NaiveDate};

use trendline_types::{DateWindow, KeywordQuery, TrendsError};

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn shift_months(date: NaiveDate, months: i64) -> Result<NaiveDate, TrendsError> {
    let magnitude = u32::try_from(months.unsigned_abs())
        .map_err(|_| TrendsError::InvalidArg(format!("month offset too large: {months}")))?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or_else(|| TrendsError::InvalidArg(format!("date out of range: {date} {months:+}m")))
}

/// Long-span window around `filing`: `offset_months` either side, snapped to month starts.
///
/// # Errors
/// Returns `TrendsError::InvalidArg` if the shifted dates fall outside the calendar range.
pub fn window_around(filing: NaiveDate, offset_months: u32) -> Result<DateWindow, TrendsError> {
    let anchor = first_of_month(filing);
    let offset = i64::from(offset_months);
    DateWindow::new(shift_months(anchor, -offset)?, shift_months(anchor, offset)?)
}

/// Split `span` into consecutive sub-windows of `step_months`, the last clipped to `span.end()`.
///
/// Consecutive windows share their boundary day, matching how the portal treats
/// `MM/YYYY Nm` ranges. A zero-length span yields one single-day window.
///
/// # Errors
/// Returns `TrendsError::InvalidArg` for a zero step.
pub fn plan_quarters(span: DateWindow, step_months: u32) -> Result<Vec<DateWindow>, TrendsError> {
    if step_months == 0 {
        return Err(TrendsError::InvalidArg("quarter step must be at least one month".into()));
    }
    if span.days() == 0 {
        return Ok(vec![span]);
    }
    let mut out = Vec::new();
    let mut start = span.start();
    while start < span.end() {
        let next = shift_months(start, i64::from(step_months))?;
        out.push(DateWindow::new(start, next.min(span.end()))?);
        start = next;
    }
    Ok(out)
}

/// Parameters of one report export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Queried range.
    pub window: DateWindow,
    /// Topics to query; one per request in practice.
    pub topics: Vec<String>,
    /// Optional category code such as `0-7-37`.
    pub category: Option<String>,
}

impl QueryParams {
    /// Parameters for a single keyword query over `window`.
    #[must_use]
    pub fn for_query(query: &KeywordQuery, window: DateWindow, category: Option<&str>) -> Self {
        Self {
            window,
            topics: vec![query.topic().to_string()],
            category: category.map(str::to_string),
        }
    }

    /// Number of months requested: `max(days, 30) / 30`.
    #[must_use]
    pub fn months(&self) -> i64 {
        self.window.days().max(30) / 30
    }

    /// Encoded date window, e.g. `01/2014 3m`.
    #[must_use]
    pub fn date_param(&self) -> String {
        format!("{} {}m", self.window.start().format("%m/%Y"), self.months())
    }

    /// Comma-joined topic list.
    #[must_use]
    pub fn topics_param(&self) -> String {
        self.topics.join(", ")
    }

    /// Query-string pairs in the order the portal expects.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("export", "1".to_string()),
            ("content", "1".to_string()),
            ("date", self.date_param()),
            ("q", self.topics_param()),
        ];
        if let Some(cat) = &self.category {
            pairs.push(("cat", cat.clone()));
        }
        pairs
    }
}
