//! Lag polynomials stored as coefficient vectors: `c[k]` multiplies `B^k`.

pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `1 + sign * (c_1 B^s + c_2 B^2s + ...)` for coefficients `c` and spacing `s`.
pub fn lag_polynomial(coefficients: &[f64], spacing: usize, sign: f64) -> Vec<f64> {
    let mut out = vec![0.0; coefficients.len() * spacing + 1];
    out[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        out[(i + 1) * spacing] = sign * c;
    }
    out
}

/// `(1 - B)^d (1 - B^s)^D`.
pub fn differencing(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut out = vec![1.0];
    for _ in 0..d {
        out = multiply(&out, &[1.0, -1.0]);
    }
    for _ in 0..seasonal_d {
        out = multiply(&out, &lag_polynomial(&[1.0], period, -1.0));
    }
    out
}

/// Applies `poly` to `series`: `out[i] = sum_k poly[k] * series[i + deg - k]`.
/// The result is `deg` values shorter than the input.
pub fn apply(poly: &[f64], series: &[f64]) -> Vec<f64> {
    let deg = poly.len().saturating_sub(1);
    if series.len() <= deg {
        return Vec::new();
    }
    (deg..series.len())
        .map(|t| {
            poly.iter()
                .enumerate()
                .map(|(k, c)| c * series[t - k])
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_differencing_polynomial() {
        let delta = differencing(1, 1, 7);
        assert_eq!(delta, vec![1.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn lag_polynomial_places_seasonal_terms() {
        assert_eq!(lag_polynomial(&[0.5], 3, -1.0), vec![1.0, 0.0, 0.0, -0.5]);
        assert_eq!(lag_polynomial(&[], 7, 1.0), vec![1.0]);
    }

    #[test]
    fn first_difference_matches_manual() {
        let diff = apply(&differencing(1, 0, 7), &[10.0, 12.0, 15.0, 14.0, 18.0]);
        assert_eq!(diff, vec![2.0, 3.0, -1.0, 4.0]);
    }

    #[test]
    fn weekly_differencing_removes_trend_and_weekly_pattern() {
        let pattern = [3.0, -1.0, 4.0, 1.0, -5.0, 9.0, 2.0];
        let series: Vec<f64> = (0..50)
            .map(|t| 100.0 + 2.5 * t as f64 + pattern[t % 7])
            .collect();
        let w = apply(&differencing(1, 1, 7), &series);
        assert_eq!(w.len(), 42);
        assert!(w.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn apply_on_short_series_is_empty() {
        assert!(apply(&differencing(1, 1, 7), &[1.0; 8]).is_empty());
    }
}
