//! Top-level raking entry points.
//!
//! Keeping the full workflow in one place:
//! validate -> variance matrices -> GLS system -> dual solve -> compose
//!
//! Batch raking reuses `rake_validated` so both paths run identical numerics.

use nalgebra::DVector;

use crate::domain::{Coefficients, IntoDenseMatrix, IntoDenseVector, RakingOptions};
use crate::error::RakingResult;
use crate::math::variance_matrix;
use crate::raking::gls::{Adjustment, solve_gls_raking};
use crate::raking::validation::{ValidatedInputs, validate_inputs};

/// Rake `x` towards the totals `g = G x` with default options.
///
/// - `x`: initial observations (length `n`)
/// - `design`: the `m x n` matrix `G` whose rows define the totals
/// - `targets`: target totals `g` (length `m`)
/// - `cx`, `cg`: variance coefficients for `x` and `g`, either one value for
///   every element or one per element
///
/// Returns the adjusted observations `theta_hat` (length `n`).
///
/// # Errors
/// `ShapeMismatch` if `x`, `g`, `cx` or `cg` do not fit `G`'s shape;
/// `TypeConversion` if an argument is not a dense numeric array.
pub fn adjust<X, M, T>(
    x: X,
    design: M,
    targets: T,
    cx: impl Into<Coefficients>,
    cg: impl Into<Coefficients>,
) -> RakingResult<DVector<f64>>
where
    X: IntoDenseVector,
    M: IntoDenseMatrix,
    T: IntoDenseVector,
{
    adjust_with(x, design, targets, cx, cg, &RakingOptions::default()).map(Adjustment::into_theta_hat)
}

/// Like [`adjust`], with explicit options and the full [`Adjustment`] report.
///
/// If `options.svd_max_iterations` is nonzero and the fallback SVD does not
/// converge within it, `theta_hat` is all NaN and the report's solve path is
/// `SolvePath::NonFinite`. The default options never hit this.
pub fn adjust_with<X, M, T>(
    x: X,
    design: M,
    targets: T,
    cx: impl Into<Coefficients>,
    cg: impl Into<Coefficients>,
    options: &RakingOptions,
) -> RakingResult<Adjustment>
where
    X: IntoDenseVector,
    M: IntoDenseMatrix,
    T: IntoDenseVector,
{
    options.validate()?;
    let inputs = validate_inputs(x, design, targets, &cx.into(), &cg.into())?;
    Ok(rake_validated(&inputs, options))
}

/// Run the numeric part of the pipeline on already validated inputs.
pub(crate) fn rake_validated(inputs: &ValidatedInputs, options: &RakingOptions) -> Adjustment {
    let v_e = variance_matrix(&inputs.cx, &inputs.x);
    let v_epsilon = variance_matrix(&inputs.cg, &inputs.targets);
    solve_gls_raking(
        &inputs.x,
        &inputs.design,
        &inputs.targets,
        &v_e,
        &v_epsilon,
        options,
    )
}
