//! Dense symmetric positive-definite solves (private module).

/// Pivots at or below this fraction of the original diagonal are treated as zero.
const PIVOT_TOL: f64 = 1e-12;

/// Solve `a * x = b` for symmetric positive-definite `a` via Cholesky.
///
/// `a` is row-major `n x n`; only the lower triangle is read.
/// On breakdown returns `Err(pivot)` with the zero-based pivot index.
pub(crate) fn cholesky_solve(a: &[Vec<f64>], b: &[f64]) -> Result<Vec<f64>, usize> {
    let n = b.len();
    debug_assert_eq!(a.len(), n);

    // Lower-triangular factor L with a = L * L^T.
    let mut l = vec![vec![0.0f64; n]; n];
    for j in 0..n {
        let mut diag = a[j][j];
        for k in 0..j {
            diag -= l[j][k] * l[j][k];
        }
        if !diag.is_finite() || diag <= a[j][j].abs() * PIVOT_TOL {
            return Err(j);
        }
        let d = diag.sqrt();
        l[j][j] = d;
        for i in (j + 1)..n {
            let mut s = a[i][j];
            for k in 0..j {
                s -= l[i][k] * l[j][k];
            }
            l[i][j] = s / d;
        }
    }

    // Forward substitution: L * y = b.
    let mut y = vec![0.0f64; n];
    for i in 0..n {
        let mut s = b[i];
        for k in 0..i {
            s -= l[i][k] * y[k];
        }
        y[i] = s / l[i][i];
    }

    // Back substitution: L^T * x = y.
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut s = y[i];
        for k in (i + 1)..n {
            s -= l[k][i] * x[k];
        }
        x[i] = s / l[i][i];
    }

    Ok(x)
}
