//! Input normalization and shape checks.
//!
//! The design matrix is the single source of truth for dimensions: with `G`
//! of shape `m x n`, `x` and `cx` must have `n` entries and `g` and `cg` must
//! have `m`. Every check runs before any arithmetic.

use nalgebra::{DMatrix, DVector};

use crate::domain::{Coefficients, InputName, IntoDenseMatrix, IntoDenseVector};
use crate::error::{RakingError, RakingResult};

/// Dense, shape-checked arguments of one raking problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInputs {
    pub x: DVector<f64>,
    pub design: DMatrix<f64>,
    pub targets: DVector<f64>,
    pub cx: DVector<f64>,
    pub cg: DVector<f64>,
}

impl ValidatedInputs {
    /// Number of constraints (rows of `G`).
    pub fn m(&self) -> usize {
        self.design.nrows()
    }

    /// Number of observations (columns of `G`).
    pub fn n(&self) -> usize {
        self.design.ncols()
    }
}

/// Convert and check all arguments of a raking call.
///
/// Order of checks: conversions of `x`, `g` and `G`, then the lengths of `x`
/// and `g`, then `cx` and `cg`. The first failure is returned.
pub fn validate_inputs<X, M, T>(
    x: X,
    design: M,
    targets: T,
    cx: &Coefficients,
    cg: &Coefficients,
) -> RakingResult<ValidatedInputs>
where
    X: IntoDenseVector,
    M: IntoDenseMatrix,
    T: IntoDenseVector,
{
    let x = x.into_dense_vector(InputName::X)?;
    let targets = targets.into_dense_vector(InputName::Targets)?;
    let design = design.into_dense_matrix(InputName::DesignMatrix)?;

    let (m, n) = design.shape();
    if x.len() != n {
        return Err(RakingError::shape_mismatch(InputName::X, x.as_slice(), n));
    }
    if targets.len() != m {
        return Err(RakingError::shape_mismatch(InputName::Targets, targets.as_slice(), m));
    }

    let cx = cx.resolve(n, InputName::Cx)?;
    let cg = cg.resolve(m, InputName::Cg)?;

    log::debug!("validated raking inputs: m={m} constraints, n={n} observations");

    Ok(ValidatedInputs {
        x,
        design,
        targets,
        cx,
        cg,
    })
}
