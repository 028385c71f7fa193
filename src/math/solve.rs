//! Dense square solves for the GLS normal equations.
//!
//! Two routines, meant to be used in sequence:
//!
//! - `solve_direct`: LU with partial pivoting. Reports `Singular` instead of
//!   returning garbage when the pivots show the matrix is numerically rank
//!   deficient.
//! - `solve_pseudo_inverse`: `pinv(A) * b` via SVD, defined for any matrix.
//!
//! Implementation notes:
//! - `A` is equilibrated before the LU: `S A S` with `S = diag(1 / sqrt|a_ii|)`
//!   (entries with a zero diagonal keep scale 1). The singularity signal is
//!   the ratio of the smallest to the largest absolute pivot of the scaled
//!   `U`, so an invertible system whose entries span many orders of magnitude
//!   is not mistaken for a singular one.
//! - The ratio is a cheap stand-in for the reciprocal condition number and is
//!   compared against the relative tolerance the pseudo-inverse uses to drop
//!   singular values.
//! - The SVD may be bounded by an iteration count; unbounded by default.

use nalgebra::{DMatrix, DVector, SVD};

/// Outcome of a direct solve attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectSolve {
    Solved(DVector<f64>),
    /// The matrix is singular to working precision.
    Singular { pivot_ratio: f64 },
}

/// Solve `a * y = b` by LU decomposition of the equilibrated matrix.
///
/// `rel_tol` is the smallest acceptable `min|u_ii| / max|u_ii|` of the scaled
/// factor.
///
/// # Panics
/// Panics if `a` is not square or `b` does not have `a.nrows()` entries.
pub fn solve_direct(a: &DMatrix<f64>, b: &DVector<f64>, rel_tol: f64) -> DirectSolve {
    assert!(a.is_square(), "solve_direct needs a square matrix");
    assert_eq!(a.nrows(), b.len(), "right-hand side length must match");

    let m = a.nrows();
    if m == 0 {
        return DirectSolve::Solved(DVector::zeros(0));
    }

    let scale = equilibration(a);
    let scaled = DMatrix::from_fn(m, m, |i, j| scale[i] * a[(i, j)] * scale[j]);
    let scaled_b = b.component_mul(&scale);

    let lu = scaled.lu();
    let ratio = pivot_ratio(&lu.u());
    if !(ratio > rel_tol) {
        return DirectSolve::Singular { pivot_ratio: ratio };
    }

    match lu.solve(&scaled_b) {
        Some(z) => {
            let y = z.component_mul(&scale);
            if y.iter().all(|v| v.is_finite()) {
                DirectSolve::Solved(y)
            } else {
                DirectSolve::Singular { pivot_ratio: ratio }
            }
        }
        None => DirectSolve::Singular { pivot_ratio: ratio },
    }
}

/// `1 / sqrt|a_ii|`, or `1` where the diagonal is zero.
fn equilibration(a: &DMatrix<f64>) -> DVector<f64> {
    a.diagonal().map(|d| {
        let d = d.abs();
        if d > 0.0 && d.is_finite() { 1.0 / d.sqrt() } else { 1.0 }
    })
}

/// Compute `pinv(a) * b`.
///
/// Singular values at or below `rel_tol * σ_max` are treated as zero.
/// Returns `None` only if the SVD fails to converge within `max_iterations`
/// (`0` = unbounded).
pub fn solve_pseudo_inverse(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    rel_tol: f64,
    max_iterations: usize,
) -> Option<DVector<f64>> {
    if a.nrows() == 0 || a.ncols() == 0 {
        return Some(DVector::zeros(a.ncols()));
    }

    let svd = SVD::try_new(a.clone(), true, true, f64::EPSILON, max_iterations)?;
    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = rel_tol * sigma_max;

    // Only fails for a negative cutoff or missing U / V^T, neither possible here.
    svd.solve(b, cutoff).ok()
}

fn pivot_ratio(u: &DMatrix<f64>) -> f64 {
    let (min, max) = u
        .diagonal()
        .iter()
        .map(|v| v.abs())
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max > 0.0 { min / max } else { 0.0 }
}
