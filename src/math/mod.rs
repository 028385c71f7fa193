//! Mathematical utilities: variance matrices and dense linear solves.

pub mod solve;
pub mod variance;

pub use solve::*;
pub use variance::*;
