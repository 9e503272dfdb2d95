use trendline_types::{Point, Series};

/// Replace zeros so ratios between consecutive values are always defined.
///
/// Zeros take the last non-zero value seen before them. Zeros that remain
/// (leading ones) take the mean of the original values, rounded half to even.
/// Non-zero values are never altered and an all-zero input comes back as is.
#[must_use]
pub fn smooth_values(values: &[f64]) -> Vec<f64> {
    if values.iter().all(|v| *v == 0.0) {
        return values.to_vec();
    }

    let mut out = Vec::with_capacity(values.len());
    let mut carried = values[0];
    for &v in values {
        if v != 0.0 {
            carried = v;
        }
        out.push(carried);
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let fill = mean.round_ties_even();
    for v in &mut out {
        if *v == 0.0 {
            *v = fill;
        }
    }
    out
}

/// [`smooth_values`] applied to a series, keeping its dates.
#[must_use]
pub fn smooth_zeros(series: &Series) -> Series {
    let values = smooth_values(&series.values());
    let points: Vec<Point> = series
        .points()
        .iter()
        .zip(values)
        .map(|(p, v)| Point::new(p.date, v))
        .collect();
    // Dates are unchanged, so ordering still holds.
    Series::new(points).unwrap_or_default()
}
