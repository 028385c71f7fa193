//! GLS raking solve and composition of the adjusted vector.
//!
//! Given observations `x`, design `G`, targets `g` and diagonal variance
//! matrices `V_e`, `V_epsilon`, the adjusted vector is
//!
//! ```text
//! A         = G V_e G^T + V_epsilon
//! A y       = g - G x
//! theta_hat = x + V_e G^T y
//! ```
//!
//! This is the closed-form minimizer of `(θ - x)^T V_e^{-1} (θ - x)` with the
//! constraint `G θ ≈ g` softened by `V_epsilon`. With `V_epsilon = 0` the
//! constraints hold exactly whenever `A` is invertible.
//!
//! Exactly one linear solve is done per call. If `A` turns out singular the
//! dual vector comes from the pseudo-inverse instead; that is a different
//! numeric path, not an error.

use nalgebra::{DMatrix, DVector};

use crate::domain::{RakingOptions, SolvePath};
use crate::math::{DirectSolve, solve_direct, solve_pseudo_inverse};

/// Result of one raking solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    theta_hat: DVector<f64>,
    delta: DVector<f64>,
    dual: DVector<f64>,
    residual: DVector<f64>,
    path: SolvePath,
}

impl Adjustment {
    /// The adjusted observations.
    pub fn theta_hat(&self) -> &DVector<f64> {
        &self.theta_hat
    }

    pub fn into_theta_hat(self) -> DVector<f64> {
        self.theta_hat
    }

    /// `theta_hat - x`, i.e. `V_e G^T y`.
    pub fn adjustment(&self) -> &DVector<f64> {
        &self.delta
    }

    /// The dual vector `y`.
    pub fn dual(&self) -> &DVector<f64> {
        &self.dual
    }

    /// `g - G theta_hat` after adjustment.
    pub fn constraint_residual(&self) -> &DVector<f64> {
        &self.residual
    }

    pub fn solve_path(&self) -> SolvePath {
        self.path
    }
}

/// Dual solution together with the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DualSolution {
    pub y: DVector<f64>,
    pub path: SolvePath,
}

/// Form `A = G V_e G^T + V_epsilon` and `rhs = g - G x`.
pub fn form_system(
    x: &DVector<f64>,
    design: &DMatrix<f64>,
    targets: &DVector<f64>,
    v_e: &DMatrix<f64>,
    v_epsilon: &DMatrix<f64>,
) -> (DMatrix<f64>, DVector<f64>) {
    let a = design * v_e * design.transpose() + v_epsilon;
    let rhs = targets - design * x;
    (a, rhs)
}

/// Solve `a y = rhs`, falling back to `pinv(a) rhs` when `a` is singular.
pub fn solve_dual(a: &DMatrix<f64>, rhs: &DVector<f64>, options: &RakingOptions) -> DualSolution {
    let m = a.nrows();

    if !a.iter().chain(rhs.iter()).all(|v| v.is_finite()) {
        log::warn!("GLS system ({m}x{m}) has non-finite entries; result is NaN");
        return non_finite(m);
    }

    let tol = options.tolerance_for(m);
    match solve_direct(a, rhs, tol) {
        DirectSolve::Solved(y) => {
            log::debug!("GLS system ({m}x{m}) solved directly");
            DualSolution {
                y,
                path: SolvePath::Direct,
            }
        }
        DirectSolve::Singular { pivot_ratio } => {
            log::warn!(
                "GLS system ({m}x{m}) is singular (pivot ratio {pivot_ratio:.3e} <= {tol:.3e}); using pseudo-inverse"
            );
            match solve_pseudo_inverse(a, rhs, tol, options.svd_max_iterations) {
                Some(y) => DualSolution {
                    y,
                    path: SolvePath::PseudoInverse,
                },
                None => {
                    log::warn!(
                        "SVD of GLS system did not converge in {} iterations; result is NaN",
                        options.svd_max_iterations
                    );
                    non_finite(m)
                }
            }
        }
    }
}

/// Run the GLS solve and compose `theta_hat = x + V_e G^T y`.
pub fn solve_gls_raking(
    x: &DVector<f64>,
    design: &DMatrix<f64>,
    targets: &DVector<f64>,
    v_e: &DMatrix<f64>,
    v_epsilon: &DMatrix<f64>,
    options: &RakingOptions,
) -> Adjustment {
    let (a, rhs) = form_system(x, design, targets, v_e, v_epsilon);
    let dual = solve_dual(&a, &rhs, options);

    let delta = v_e * design.transpose() * &dual.y;
    let theta_hat = x + &delta;
    let residual = targets - design * &theta_hat;

    Adjustment {
        theta_hat,
        delta,
        dual: dual.y,
        residual,
        path: dual.path,
    }
}

fn non_finite(m: usize) -> DualSolution {
    DualSolution {
        y: DVector::from_element(m, f64::NAN),
        path: SolvePath::NonFinite,
    }
}
