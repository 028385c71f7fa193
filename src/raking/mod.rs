//! Raking orchestration.
//!
//! Responsibilities:
//!
//! - validate and normalize arguments (`validation`)
//! - form and solve the GLS system, compose `theta_hat` (`gls`)
//! - public entry points (`pipeline`) and parallel batches (`batch`)

pub mod batch;
pub mod gls;
pub mod pipeline;
pub mod validation;

pub use batch::*;
pub use gls::*;
pub use pipeline::*;
pub use validation::*;
