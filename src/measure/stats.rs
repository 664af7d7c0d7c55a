//! Reduction of repeated trials.

/// Median of `values`; `0.0` when empty.
///
/// Even-length inputs yield the mean of the two central elements. The result
/// is exact; rounding happens when rows are built (see [`round_to`]).
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        0.5 * (sorted[mid - 1] + sorted[mid])
    }
}

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}
