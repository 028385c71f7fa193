//! Raking many independent problems at once.
//!
//! Time-series reconciliation typically rakes every period separately, each
//! against its own totals. Problems share nothing, so they are solved in
//! parallel and returned in input order.

use rayon::prelude::*;

use crate::domain::{Coefficients, IntoDenseMatrix, IntoDenseVector, RakingOptions};
use crate::error::RakingResult;
use crate::raking::gls::Adjustment;
use crate::raking::pipeline::rake_validated;
use crate::raking::validation::{ValidatedInputs, validate_inputs};

/// One validated raking problem.
///
/// Construction performs the same conversions and shape checks as
/// [`adjust`](crate::adjust), so a problem that exists is always solvable.
#[derive(Debug, Clone, PartialEq)]
pub struct RakingProblem {
    inputs: ValidatedInputs,
}

impl RakingProblem {
    pub fn new<X, M, T>(
        x: X,
        design: M,
        targets: T,
        cx: impl Into<Coefficients>,
        cg: impl Into<Coefficients>,
    ) -> RakingResult<Self>
    where
        X: IntoDenseVector,
        M: IntoDenseMatrix,
        T: IntoDenseVector,
    {
        let inputs = validate_inputs(x, design, targets, &cx.into(), &cg.into())?;
        Ok(Self { inputs })
    }

    /// Number of constraints.
    pub fn m(&self) -> usize {
        self.inputs.m()
    }

    /// Number of observations.
    pub fn n(&self) -> usize {
        self.inputs.n()
    }

    pub fn rake(&self, options: &RakingOptions) -> RakingResult<Adjustment> {
        options.validate()?;
        Ok(rake_validated(&self.inputs, options))
    }
}

/// Rake every problem in parallel.
///
/// Output order matches `problems`. Fails only if `options` is invalid.
pub fn adjust_batch(problems: &[RakingProblem], options: &RakingOptions) -> RakingResult<Vec<Adjustment>> {
    options.validate()?;
    log::debug!("raking batch of {} problems", problems.len());

    Ok(problems
        .par_iter()
        .map(|problem| rake_validated(&problem.inputs, options))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputName, SolvePath};
    use crate::error::RakingError;
    use crate::raking::pipeline::adjust;

    fn periods() -> Vec<RakingProblem> {
        (0..12)
            .map(|t| {
                let base = 10.0 + t as f64;
                RakingProblem::new(
                    [base, 2.0 * base, 3.0 * base],
                    [[1.0, 1.0, 1.0]],
                    [6.0 * base + 6.0],
                    1.0,
                    0.0,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn batch_matches_individual_calls_in_order() {
        let problems = periods();
        let results = adjust_batch(&problems, &RakingOptions::default()).unwrap();
        assert_eq!(results.len(), problems.len());

        for (t, adj) in results.iter().enumerate() {
            let base = 10.0 + t as f64;
            let single = adjust(
                [base, 2.0 * base, 3.0 * base],
                [[1.0, 1.0, 1.0]],
                [6.0 * base + 6.0],
                1.0,
                0.0,
            )
            .unwrap();
            assert_eq!(adj.theta_hat(), &single);
            assert_eq!(adj.solve_path(), SolvePath::Direct);
        }
    }

    #[test]
    fn singular_problem_does_not_disturb_neighbours() {
        let mut problems = periods();
        problems.insert(
            3,
            RakingProblem::new([0.0, 0.0], [[1.0, 1.0]], [5.0], 1.0, 0.0).unwrap(),
        );

        let results = adjust_batch(&problems, &RakingOptions::default()).unwrap();
        assert_eq!(results[3].solve_path(), SolvePath::PseudoInverse);
        assert_eq!(results[3].theta_hat().as_slice(), &[0.0, 0.0]);
        assert_eq!(results[4].solve_path(), SolvePath::Direct);
        assert!((results[4].theta_hat().sum() - (6.0 * 13.0 + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn invalid_problem_fails_at_construction() {
        let err = RakingProblem::new([1.0, 2.0], [[1.0, 1.0]], [3.0, 4.0], 1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            RakingError::ShapeMismatch { input: InputName::Targets, .. }
        ));
    }

    #[test]
    fn empty_batch_is_fine() {
        let results = adjust_batch(&[], &RakingOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn batch_rejects_invalid_options() {
        let opts = RakingOptions {
            singular_tolerance: Some(f64::NAN),
            ..RakingOptions::default()
        };
        assert!(adjust_batch(&periods(), &opts).is_err());
        assert!(periods()[0].rake(&opts).is_err());
    }

    #[test]
    fn problem_reports_dimensions() {
        let problem = RakingProblem::new([1.0, 2.0, 3.0], [[1.0, 0.0, 1.0], [0.0, 1.0, 0.0]], [4.0, 2.0], 1.0, 0.0)
            .unwrap();
        assert_eq!((problem.m(), problem.n()), (2, 3));
        let adj = problem.rake(&RakingOptions::default()).unwrap();
        assert!(adj.constraint_residual().iter().all(|r| r.abs() < 1e-12));
    }
}
