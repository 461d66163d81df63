pub(crate) fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// The arithmetic mean. Callers guarantee `values` is non-empty.
pub(crate) fn mean(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}

/// The biased (population) standard deviation, with denominator `n` rather than `n - 1`.
pub(crate) fn population_std(values: &[f64], mean: f64) -> f64 {
    let squared_errors = values.iter().fold(0.0, |acc, v| {
        let error = (v - mean).powi(2);
        acc + error
    });
    (squared_errors / values.len() as f64).sqrt()
}
