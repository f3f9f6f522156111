/// Ordinary least squares of `target` on `columns`, using rows `start..`.
///
/// Columns are scaled to unit norm before solving the normal equations.
/// Returns `None` when the design is singular (a zero or collinear column).
pub fn least_squares(columns: &[Vec<f64>], target: &[f64], start: usize) -> Option<Vec<f64>> {
    let k = columns.len();
    if k == 0 {
        return Some(Vec::new());
    }

    let scales: Vec<f64> = columns
        .iter()
        .map(|c| c[start..].iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();
    if scales.iter().any(|s| *s == 0.0 || !s.is_finite()) {
        return None;
    }

    let mut gram = vec![vec![0.0; k]; k];
    let mut rhs = vec![0.0; k];
    for i in 0..k {
        for j in 0..=i {
            let g = dot(&columns[i][start..], &columns[j][start..]) / (scales[i] * scales[j]);
            gram[i][j] = g;
            gram[j][i] = g;
        }
        rhs[i] = dot(&columns[i][start..], &target[start..]) / scales[i];
    }

    let solution = cholesky_solve(gram, rhs)?;
    Some(solution.iter().zip(&scales).map(|(x, s)| x / s).collect())
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solves `a x = b` for a symmetric positive definite `a`.
fn cholesky_solve(a: Vec<Vec<f64>>, b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let s: f64 = (0..j).map(|m| l[i][m] * l[j][m]).sum();
            if i == j {
                let d = a[i][i] - s;
                if !(d > PIVOT_TOLERANCE) {
                    return None;
                }
                l[i][i] = d.sqrt();
            } else {
                l[i][j] = (a[i][j] - s) / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        let s: f64 = (0..i).map(|m| l[i][m] * y[m]).sum();
        y[i] = (b[i] - s) / l[i][i];
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let s: f64 = (i + 1..n).map(|m| l[m][i] * x[m]).sum();
        x[i] = (y[i] - s) / l[i][i];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_coefficients() {
        let x1: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..20).map(|i| ((i * 7) % 5) as f64 * 1000.0).collect();
        let y: Vec<f64> = x1.iter().zip(&x2).map(|(a, b)| 2.0 * a - 0.003 * b).collect();

        let beta = least_squares(&[x1, x2], &y, 0).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-9, "{beta:?}");
        assert!((beta[1] + 0.003).abs() < 1e-12, "{beta:?}");
    }

    #[test]
    fn skips_rows_before_start() {
        let x = vec![100.0, 1.0, 2.0, 3.0];
        let y = vec![-50.0, 3.0, 6.0, 9.0];
        let beta = least_squares(&[x], &y, 1).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_columns_are_singular() {
        let x1: Vec<f64> = (0..10).map(|i| (i as f64).sin()).collect();
        let x2: Vec<f64> = x1.iter().map(|v| v * 4.0).collect();
        let y = vec![1.0; 10];
        assert!(least_squares(&[x1, x2], &y, 0).is_none());
    }

    #[test]
    fn zero_column_is_singular() {
        assert!(least_squares(&[vec![0.0; 5]], &[1.0; 5], 0).is_none());
    }

    #[test]
    fn no_columns_is_empty_solution() {
        assert_eq!(least_squares(&[], &[1.0, 2.0], 0), Some(Vec::new()));
    }
}
