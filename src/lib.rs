//! `tsraking` library crate.
//!
//! Generalized-least-squares raking: adjust a vector of observations `x` so
//! that the totals `G x` match targets `g`, moving each element in proportion
//! to its variance `cx_i * x_i`. Targets can carry their own uncertainty
//! through `cg`; with `cg = 0` the totals are met exactly.
//!
//! ```
//! let theta = tsraking::adjust([10.0, 20.0], [[1.0, 1.0]], [35.0], 1.0, 0.0).unwrap();
//! assert!((theta[0] + theta[1] - 35.0).abs() < 1e-9);
//! ```
//!
//! Every call is pure and independent; nothing is cached between calls.

pub mod domain;
pub mod error;
pub mod math;
pub mod raking;

pub use domain::{Coefficients, InputName, IntoDenseMatrix, IntoDenseVector, RakingOptions, SolvePath};
pub use error::{RakingError, RakingResult};
pub use raking::{Adjustment, RakingProblem, adjust, adjust_batch, adjust_with};
