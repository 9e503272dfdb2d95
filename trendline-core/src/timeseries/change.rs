use trendline_types::{ChangeMultiplier, Series};

/// Lowest accepted log10 relative change; larger drops are scaling artefacts.
pub const RELATIVE_FLOOR: f64 = -0.9;
/// Highest accepted log10 relative change (a tenfold rise).
///
/// The classic rule only floors the change at [`RELATIVE_FLOOR`]. The ceiling
/// is an addition: it caps a multiplier at `1 + log10(2)`, a bound the floor-only
/// rule breaks for any rise above tenfold (e.g. 0 to 100 gives about 1.48).
pub const RELATIVE_CEILING: f64 = 1.0;

/// Multiplier for a move from `prev` to `next`.
///
/// Both values are shifted by one, the log10 ratio is clamped to
/// `[RELATIVE_FLOOR, RELATIVE_CEILING]`, and the result is `1 + log10(1 + r)`,
/// which lies in `[1 + log10(0.1), 1 + log10(2)]`.
#[must_use]
pub fn change_factor(prev: f64, next: f64) -> f64 {
    let relative = ((1.0 + next) / (1.0 + prev))
        .log10()
        .clamp(RELATIVE_FLOOR, RELATIVE_CEILING);
    1.0 + (1.0 + relative).log10()
}

/// One multiplier per day of `series`; the first day carries the identity 1.0.
#[must_use]
pub fn change_multipliers(series: &Series) -> Vec<ChangeMultiplier> {
    let points = series.points();
    let mut out = Vec::with_capacity(points.len());
    if let Some(first) = points.first() {
        out.push(ChangeMultiplier {
            date: first.date,
            factor: 1.0,
        });
    }
    out.extend(points.windows(2).map(|w| ChangeMultiplier {
        date: w[1].date,
        factor: change_factor(w[0].value, w[1].value),
    }));
    out
}
