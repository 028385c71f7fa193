//! Domain types used throughout the raking pipeline.
//!
//! This module defines:
//!
//! - argument names for error reporting (`InputName`)
//! - variance coefficients (`Coefficients`) and solver options (`RakingOptions`)
//! - conversions from array-like inputs (`IntoDenseVector`, `IntoDenseMatrix`)

pub mod input;
pub mod types;

pub use input::*;
pub use types::*;
