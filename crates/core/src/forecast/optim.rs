//! Derivative-free minimisation with the Nelder-Mead simplex.

#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    pub initial_step: f64,
    pub max_iterations: usize,
    /// Spread of function values across the simplex, relative once |f| > 1.
    pub f_tolerance: f64,
    /// Largest coordinate distance from the best vertex.
    pub x_tolerance: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            initial_step: 0.25,
            max_iterations: 2000,
            f_tolerance: 1e-9,
            x_tolerance: 1e-5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimises `f` starting from `start`. NaN objective values count as +inf.
/// Deterministic: the same inputs always walk the same simplex.
pub fn nelder_mead<F>(mut f: F, start: &[f64], opts: &NelderMeadOptions) -> Minimum
where
    F: FnMut(&[f64]) -> f64,
{
    let mut eval = |x: &[f64]| {
        let v = f(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let n = start.len();
    if n == 0 {
        return Minimum {
            point: Vec::new(),
            value: eval(start),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.to_vec(), eval(start)));
    for i in 0..n {
        let mut x = start.to_vec();
        x[i] += opts.initial_step;
        let v = eval(&x);
        simplex.push((x, v));
    }

    let mut iterations = 0;
    let mut converged = false;
    loop {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        if has_converged(&simplex, opts) {
            converged = true;
            break;
        }
        if iterations >= opts.max_iterations {
            break;
        }
        iterations += 1;

        let worst = simplex[n].clone();
        let second_worst = simplex[n - 1].1;
        let best = simplex[0].1;
        let centroid = centroid(&simplex[..n]);

        let reflected = along(&centroid, &worst.0, -REFLECT);
        let fr = eval(&reflected);

        if fr < best {
            let expanded = along(&centroid, &worst.0, -REFLECT * EXPAND);
            let fe = eval(&expanded);
            simplex[n] = if fe < fr { (expanded, fe) } else { (reflected, fr) };
            continue;
        }
        if fr < second_worst {
            simplex[n] = (reflected, fr);
            continue;
        }

        let (contracted, fc, accept) = if fr < worst.1 {
            let x = along(&centroid, &worst.0, -REFLECT * CONTRACT);
            let v = eval(&x);
            (x, v, v <= fr)
        } else {
            let x = along(&centroid, &worst.0, CONTRACT);
            let v = eval(&x);
            (x, v, v < worst.1)
        };
        if accept {
            simplex[n] = (contracted, fc);
            continue;
        }

        let anchor = simplex[0].0.clone();
        for vertex in simplex.iter_mut().skip(1) {
            let x: Vec<f64> = anchor
                .iter()
                .zip(&vertex.0)
                .map(|(a, v)| a + SHRINK * (v - a))
                .collect();
            let v = eval(&x);
            *vertex = (x, v);
        }
    }

    let (point, value) = simplex.swap_remove(0);
    Minimum {
        point,
        value,
        iterations,
        converged,
    }
}

fn has_converged(sorted: &[(Vec<f64>, f64)], opts: &NelderMeadOptions) -> bool {
    let best = sorted[0].1;
    let worst = sorted[sorted.len() - 1].1;
    if !best.is_finite() || !worst.is_finite() {
        return false;
    }
    let f_spread = (worst - best).abs() <= opts.f_tolerance * best.abs().max(1.0);
    let x_spread = sorted[1..].iter().all(|(x, _)| {
        x.iter()
            .zip(&sorted[0].0)
            .all(|(a, b)| (a - b).abs() <= opts.x_tolerance)
    });
    f_spread && x_spread
}

fn centroid(vertices: &[(Vec<f64>, f64)]) -> Vec<f64> {
    let dim = vertices[0].0.len();
    let mut c = vec![0.0; dim];
    for (x, _) in vertices {
        for (ci, xi) in c.iter_mut().zip(x) {
            *ci += xi;
        }
    }
    let k = vertices.len() as f64;
    c.iter_mut().for_each(|ci| *ci /= k);
    c
}

/// `centroid + t * (point - centroid)`.
fn along(centroid: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + t * (p - c))
        .collect()
}
