//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed around by value during a raking call
//! - read from JSON/TOML configuration by callers that store raking setups

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{RakingError, RakingResult};

/// Names of the arguments to a raking call, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputName {
    /// Initial observations `x`.
    #[serde(rename = "x")]
    X,
    /// Design matrix `G`.
    #[serde(rename = "G")]
    DesignMatrix,
    /// Target totals `g`.
    #[serde(rename = "g")]
    Targets,
    /// Variance coefficients for `x`.
    #[serde(rename = "cx")]
    Cx,
    /// Variance coefficients for `g`.
    #[serde(rename = "cg")]
    Cg,
}

impl InputName {
    /// Symbol used for the argument in messages.
    pub fn symbol(self) -> &'static str {
        match self {
            InputName::X => "x",
            InputName::DesignMatrix => "G",
            InputName::Targets => "g",
            InputName::Cx => "cx",
            InputName::Cg => "cg",
        }
    }

    pub fn is_coefficient(self) -> bool {
        matches!(self, InputName::Cx | InputName::Cg)
    }
}

impl std::fmt::Display for InputName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Variance-scaling coefficients for `x` or `g`.
///
/// Callers choose explicitly between one coefficient for every element and a
/// coefficient per element. Both resolve to a plain vector before any matrix
/// arithmetic happens.
///
/// With serde the variant is inferred from the shape: `2.0` is `Uniform`,
/// `[1.0, 2.0]` is `PerElement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coefficients {
    Uniform(f64),
    PerElement(Vec<f64>),
}

impl Coefficients {
    /// Resolve to a vector of exactly `len` entries.
    ///
    /// `Uniform` is broadcast; `PerElement` must already have `len` entries.
    pub fn resolve(&self, len: usize, input: InputName) -> RakingResult<DVector<f64>> {
        match self {
            Coefficients::Uniform(c) => Ok(DVector::from_element(len, *c)),
            Coefficients::PerElement(values) => {
                if values.len() != len {
                    return Err(RakingError::shape_mismatch(input, values, len));
                }
                Ok(DVector::from_column_slice(values))
            }
        }
    }
}

impl From<f64> for Coefficients {
    fn from(value: f64) -> Self {
        Coefficients::Uniform(value)
    }
}

impl From<Vec<f64>> for Coefficients {
    fn from(values: Vec<f64>) -> Self {
        Coefficients::PerElement(values)
    }
}

impl From<&[f64]> for Coefficients {
    fn from(values: &[f64]) -> Self {
        Coefficients::PerElement(values.to_vec())
    }
}

impl From<&Vec<f64>> for Coefficients {
    fn from(values: &Vec<f64>) -> Self {
        Coefficients::PerElement(values.clone())
    }
}

impl<const N: usize> From<[f64; N]> for Coefficients {
    fn from(values: [f64; N]) -> Self {
        Coefficients::PerElement(values.to_vec())
    }
}

impl From<DVector<f64>> for Coefficients {
    fn from(values: DVector<f64>) -> Self {
        Coefficients::PerElement(values.as_slice().to_vec())
    }
}

impl From<&DVector<f64>> for Coefficients {
    fn from(values: &DVector<f64>) -> Self {
        Coefficients::PerElement(values.as_slice().to_vec())
    }
}

/// Default iteration bound for the SVD used by the pseudo-inverse fallback
/// (`0`: iterate until convergence).
pub const DEFAULT_SVD_MAX_ITERATIONS: usize = 0;

/// Numerical knobs for the GLS solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RakingOptions {
    /// Relative cutoff below which the system matrix is treated as singular.
    ///
    /// Applied to the ratio of the smallest to the largest LU pivot of the
    /// diagonally equilibrated matrix when deciding whether the direct solve
    /// is usable, and to `σ / σ_max` when
    /// forming the pseudo-inverse. `None` means `max(m, 1) * f64::EPSILON`.
    pub singular_tolerance: Option<f64>,

    /// Iteration bound for the fallback SVD (`0` means unbounded).
    ///
    /// With a nonzero bound an SVD that does not converge in time yields an
    /// all-NaN result and `SolvePath::NonFinite`.
    pub svd_max_iterations: usize,
}

impl Default for RakingOptions {
    fn default() -> Self {
        Self {
            singular_tolerance: None,
            svd_max_iterations: DEFAULT_SVD_MAX_ITERATIONS,
        }
    }
}

impl RakingOptions {
    pub fn validate(&self) -> RakingResult<()> {
        if let Some(tol) = self.singular_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(RakingError::InvalidOptions(format!(
                    "singular_tolerance must be a finite non-negative number, got {tol}"
                )));
            }
        }
        Ok(())
    }

    /// Effective relative tolerance for an `m x m` system.
    pub fn tolerance_for(&self, m: usize) -> f64 {
        self.singular_tolerance
            .unwrap_or(m.max(1) as f64 * f64::EPSILON)
    }
}

/// Which numeric path produced the dual vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolvePath {
    /// LU solve of `A y = rhs`.
    Direct,
    /// `pinv(A) * rhs`, taken when `A` is singular or numerically so.
    PseudoInverse,
    /// `A` or `rhs` held NaN/inf (or the SVD did not converge); `y` is all NaN.
    NonFinite,
}
