/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|value| {
            let diff = avg - *value;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    Some(variance.sqrt())
}

/// Round to two decimal places, the precision results are stored and shown at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Largest value in the slice, `0.0` when empty.
pub fn max_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
