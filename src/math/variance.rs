//! Diagonal variance matrices.
//!
//! Both weighting matrices of the GLS problem are diagonal with entries
//! `c_i * v_i`:
//!
//! - `V_e = diag(cx ⊙ x)` for the observations
//! - `V_epsilon = diag(cg ⊙ g)` for the targets
//!
//! Entries are not required to be positive. Zero entries pin the matching
//! element (for `x`) or make the matching target a hard equality (for `g`).

use nalgebra::{DMatrix, DVector};

/// Build `diag(coefficients ⊙ values)`.
///
/// # Panics
/// Panics if the two vectors differ in length. Callers validate lengths first.
pub fn variance_matrix(coefficients: &DVector<f64>, values: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_diagonal(&coefficients.component_mul(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_is_elementwise_product() {
        let c = DVector::from_row_slice(&[1.0, 2.0, 0.5]);
        let v = DVector::from_row_slice(&[10.0, 20.0, 4.0]);
        let m = variance_matrix(&c, &v);

        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m[(0, 0)], 10.0);
        assert_eq!(m[(1, 1)], 40.0);
        assert_eq!(m[(2, 2)], 2.0);
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    assert_eq!(m[(i, j)], 0.0);
                }
            }
        }
    }

    #[test]
    fn zero_coefficients_give_zero_matrix() {
        let c = DVector::zeros(2);
        let v = DVector::from_row_slice(&[35.0, 12.0]);
        assert_eq!(variance_matrix(&c, &v), DMatrix::zeros(2, 2));
    }

    #[test]
    fn empty_inputs_give_empty_matrix() {
        let m = variance_matrix(&DVector::zeros(0), &DVector::zeros(0));
        assert_eq!(m.shape(), (0, 0));
    }
}
