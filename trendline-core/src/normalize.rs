//! Parsing of the portal's line-oriented CSV export.
//!
//! The export contains several sections; only the block following the
//! "Interest over time" marker is consumed. Its first line names the columns,
//! every following line up to the first blank one is `label,count1,...,countN`.

use chrono::NaiveDate;

use trendline_types::{DateWindow, Observation, QuarterWindow, TrendsError};

/// Marker line that opens the interest-over-time section.
pub const INTEREST_OVER_TIME_HEADER: &str = "Interest over time";
/// Content type of a successful export.
pub const EXPECTED_CONTENT_TYPE: &str = "text/csv; charset=UTF-8";

const WORLDWIDE_PREFIX: &str = "Worldwide; ";
const DAY_LABEL_LEN: usize = 10;

/// One export row: a day and one count per queried topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationRow {
    /// Representative day of the row.
    pub date: NaiveDate,
    /// Interest counts, one per topic column.
    pub counts: Vec<u32>,
}

/// Check the response content type and hand back the body of a valid export.
///
/// # Errors
/// - `QuotaExceeded` for an HTML page mentioning the quota.
/// - `Unavailable` for an HTML page reporting the data as unavailable.
/// - `Format` for any other content.
pub fn classify_response(content_type: &str, body: String) -> Result<String, TrendsError> {
    if content_type.eq_ignore_ascii_case(EXPECTED_CONTENT_TYPE) {
        return Ok(body);
    }
    if content_type.to_ascii_lowercase().starts_with("text/html") {
        let lowered = body.to_lowercase();
        if lowered.contains("quota") {
            return Err(TrendsError::quota(
                "the portal request quota has been reached (daily or rate limit); \
                 consider a longer throttle",
            ));
        }
        if lowered.contains("unavailable") {
            return Err(TrendsError::Unavailable(
                "portal reported the report as currently unavailable".into(),
            ));
        }
    }
    Err(TrendsError::Format(format!(
        "unexpected content type {content_type}; maybe an invalid category or date was supplied"
    )))
}

/// Parse a row label into its representative day.
///
/// Labels longer than a day (`YYYY-MM-DD - YYYY-MM-DD`) are week ranges: the
/// start day is used, except for the final row of a batch which is anchored on
/// the range's end day so a trailing partial week is not under-counted.
/// `YYYY-MM` labels resolve to the first of the month.
///
/// # Errors
/// Returns `TrendsError::Format` if the label is not a recognised date form.
pub fn parse_label(label: &str, is_final: bool) -> Result<NaiveDate, TrendsError> {
    let label = label.trim();
    let day = if label.len() > DAY_LABEL_LEN {
        let slice = if is_final {
            label.get(label.len() - DAY_LABEL_LEN..)
        } else {
            label.get(..DAY_LABEL_LEN)
        };
        slice.ok_or_else(|| TrendsError::Format(format!("unable to parse label {label:?}")))?
    } else {
        label
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{day}-01"), "%Y-%m-%d"))
        .map_err(|_| TrendsError::Format(format!("unable to parse label {label:?}")))
}

fn parse_count(raw: &str) -> Result<u32, TrendsError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| TrendsError::Format(format!("unable to parse count {raw:?}")))
}

// "Worldwide; Jan 2014" / "Worldwide; 2014" echoed in place of data.
fn no_data_label(lines: &[&str]) -> Option<Option<NaiveDate>> {
    let probe = lines.get(1)?;
    let blank_after = lines.get(2).is_none_or(|l| l.trim().trim_matches(',').is_empty());
    let idx = probe.find(WORLDWIDE_PREFIX)?;
    if !blank_after {
        return None;
    }
    let label = probe[idx + WORLDWIDE_PREFIX.len()..].trim().trim_end_matches(',');
    let parsed = NaiveDate::parse_from_str(&format!("01 {label}"), "%d %b %Y")
        .ok()
        .or_else(|| {
            label
                .parse::<i32>()
                .ok()
                .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        });
    Some(parsed)
}

fn zero_row(date: NaiveDate) -> ObservationRow {
    ObservationRow {
        date,
        counts: vec![0],
    }
}

/// Parse an export payload into dated rows.
///
/// A payload signalling "no interest" yields a single zero row instead of an
/// empty batch, dated at the echoed label or, failing that, at `nominal`.
///
/// # Errors
/// Returns `TrendsError::Format` when the interest section is missing or a
/// label or count cannot be parsed.
pub fn normalize(payload: &str, nominal: NaiveDate) -> Result<Vec<ObservationRow>, TrendsError> {
    let lines: Vec<&str> = payload.lines().collect();
    let Some(start) = lines
        .iter()
        .position(|l| l.trim() == INTEREST_OVER_TIME_HEADER)
    else {
        return match no_data_label(&lines) {
            Some(date) => Ok(vec![zero_row(date.unwrap_or(nominal))]),
            None => Err(TrendsError::Format(
                "interest over time section not found".into(),
            )),
        };
    };

    let fields: Vec<Vec<&str>> = lines[start + 1..]
        .iter()
        .map(|l| l.trim())
        .take_while(|l| !l.is_empty())
        .skip(1)
        .map(|l| l.split(',').map(str::trim).collect::<Vec<_>>())
        // A blank first count marks the end of the data the portal has.
        .take_while(|f| f.get(1).is_some_and(|v| !v.is_empty()))
        .collect();

    if fields.is_empty() {
        return Ok(vec![zero_row(nominal)]);
    }

    let last = fields.len() - 1;
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let date = parse_label(f[0], i == last)?;
            let counts = f[1..]
                .iter()
                .map(|c| parse_count(c))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ObservationRow { date, counts })
        })
        .collect()
}

/// Parse an export payload and keep the first topic column as observations.
///
/// # Errors
/// Propagates the errors of [`normalize`].
pub fn normalize_first_column(
    payload: &str,
    nominal: NaiveDate,
) -> Result<Vec<Observation>, TrendsError> {
    Ok(normalize(payload, nominal)?
        .into_iter()
        .map(|r| Observation::new(r.date, r.counts.first().copied().unwrap_or(0)))
        .collect())
}

/// Observations of one queried window.
///
/// A window with no measurable interest comes back as zero readings on its
/// first and last day, whatever single row or echoed label the payload held,
/// so it still covers every day of `window` once interpolated.
///
/// # Errors
/// Propagates the errors of [`normalize`].
pub fn normalize_window(payload: &str, window: DateWindow) -> Result<Vec<Observation>, TrendsError> {
    let observations = normalize_first_column(payload, window.start())?;
    if observations.iter().all(|o| o.value == 0) {
        return Ok(QuarterWindow::zero_filled(window).observations);
    }
    Ok(observations)
}
