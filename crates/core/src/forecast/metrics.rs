/// Mean absolute percentage error, in percent.
///
/// Actual values of zero are guarded with `f64::EPSILON` so the result stays
/// finite. Returns `None` for empty or mismatched inputs.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs() / a.abs().max(f64::EPSILON))
        .sum();
    Some(100.0 * sum / actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_prediction_is_zero() {
        assert_eq!(mean_absolute_percentage_error(&[5.0, 10.0], &[5.0, 10.0]), Some(0.0));
    }

    #[test]
    fn averages_relative_errors_in_percent() {
        let mape = mean_absolute_percentage_error(&[100.0, 200.0], &[110.0, 150.0]).unwrap();
        assert!((mape - 17.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_or_empty_inputs() {
        assert_eq!(mean_absolute_percentage_error(&[], &[]), None);
        assert_eq!(mean_absolute_percentage_error(&[1.0], &[1.0, 2.0]), None);
    }
}
