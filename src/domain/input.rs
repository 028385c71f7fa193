//! Conversion of array-like arguments into dense `f64` arrays.
//!
//! Vectors are always flattened: a matrix or nested rows passed where a
//! vector is expected are read row by row. Borrowed inputs are copied, so the
//! caller's data is never touched.

use nalgebra::{DMatrix, DVector};

use crate::domain::InputName;
use crate::error::{RakingError, RakingResult};

/// Anything that can be read as a flat vector of `f64`.
pub trait IntoDenseVector {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>>;
}

/// Anything that can be read as a dense `f64` matrix.
pub trait IntoDenseMatrix {
    fn into_dense_matrix(self, input: InputName) -> RakingResult<DMatrix<f64>>;
}

impl IntoDenseVector for DVector<f64> {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(self)
    }
}

impl IntoDenseVector for &DVector<f64> {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(self.clone())
    }
}

impl IntoDenseVector for Vec<f64> {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(DVector::from_vec(self))
    }
}

impl IntoDenseVector for &Vec<f64> {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(DVector::from_column_slice(self))
    }
}

impl IntoDenseVector for &[f64] {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(DVector::from_column_slice(self))
    }
}

impl<const N: usize> IntoDenseVector for [f64; N] {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(DVector::from_column_slice(&self))
    }
}

impl<const N: usize> IntoDenseVector for &[f64; N] {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        Ok(DVector::from_column_slice(self))
    }
}

impl IntoDenseVector for DMatrix<f64> {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>> {
        (&self).into_dense_vector(input)
    }
}

impl IntoDenseVector for &DMatrix<f64> {
    fn into_dense_vector(self, _input: InputName) -> RakingResult<DVector<f64>> {
        // nalgebra stores column-major; read row-major to match row-wise flattening.
        Ok(DVector::from_column_slice(self.transpose().as_slice()))
    }
}

impl IntoDenseVector for Vec<Vec<f64>> {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>> {
        self.as_slice().into_dense_vector(input)
    }
}

impl IntoDenseVector for &[Vec<f64>] {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>> {
        let cols = rectangular_width(self, input)?;
        let mut flat = Vec::with_capacity(self.len() * cols);
        for row in self {
            flat.extend_from_slice(row);
        }
        Ok(DVector::from_vec(flat))
    }
}

impl IntoDenseVector for &Vec<Vec<f64>> {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>> {
        self.as_slice().into_dense_vector(input)
    }
}

impl IntoDenseVector for &[&str] {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>> {
        let values = self
            .iter()
            .enumerate()
            .map(|(idx, token)| parse_token(token, idx, input))
            .collect::<RakingResult<Vec<f64>>>()?;
        Ok(DVector::from_vec(values))
    }
}

impl IntoDenseVector for Vec<String> {
    fn into_dense_vector(self, input: InputName) -> RakingResult<DVector<f64>> {
        let values = self
            .iter()
            .enumerate()
            .map(|(idx, token)| parse_token(token, idx, input))
            .collect::<RakingResult<Vec<f64>>>()?;
        Ok(DVector::from_vec(values))
    }
}

impl IntoDenseMatrix for DMatrix<f64> {
    fn into_dense_matrix(self, _input: InputName) -> RakingResult<DMatrix<f64>> {
        Ok(self)
    }
}

impl IntoDenseMatrix for &DMatrix<f64> {
    fn into_dense_matrix(self, _input: InputName) -> RakingResult<DMatrix<f64>> {
        Ok(self.clone())
    }
}

impl IntoDenseMatrix for Vec<Vec<f64>> {
    fn into_dense_matrix(self, input: InputName) -> RakingResult<DMatrix<f64>> {
        self.as_slice().into_dense_matrix(input)
    }
}

impl IntoDenseMatrix for &Vec<Vec<f64>> {
    fn into_dense_matrix(self, input: InputName) -> RakingResult<DMatrix<f64>> {
        self.as_slice().into_dense_matrix(input)
    }
}

impl IntoDenseMatrix for &[Vec<f64>] {
    fn into_dense_matrix(self, input: InputName) -> RakingResult<DMatrix<f64>> {
        let cols = rectangular_width(self, input)?;
        Ok(DMatrix::from_fn(self.len(), cols, |i, j| self[i][j]))
    }
}

impl<const R: usize, const C: usize> IntoDenseMatrix for [[f64; C]; R] {
    fn into_dense_matrix(self, input: InputName) -> RakingResult<DMatrix<f64>> {
        self.as_slice().into_dense_matrix(input)
    }
}

impl<const C: usize> IntoDenseMatrix for &[[f64; C]] {
    fn into_dense_matrix(self, _input: InputName) -> RakingResult<DMatrix<f64>> {
        Ok(DMatrix::from_fn(self.len(), C, |i, j| self[i][j]))
    }
}

/// Common row length of nested rows, or a conversion error if they are ragged.
fn rectangular_width(rows: &[Vec<f64>], input: InputName) -> RakingResult<usize> {
    let Some(first) = rows.first() else {
        return Ok(0);
    };
    let cols = first.len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(RakingError::type_conversion(
            input,
            format!(
                "rows are not rectangular: row 0 has {cols} entries but row {idx} has {}",
                row.len()
            ),
        ));
    }
    Ok(cols)
}

fn parse_token(token: &str, idx: usize, input: InputName) -> RakingResult<f64> {
    token.trim().parse::<f64>().map_err(|e| {
        RakingError::type_conversion(input, format!("element {idx} ('{token}') is not a number: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_and_arrays_convert_unchanged() {
        let v = [1.0_f64, 2.0, 3.0].into_dense_vector(InputName::X).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);

        let data: Vec<f64> = vec![4.0, 5.0];
        let v = (&data).into_dense_vector(InputName::Targets).unwrap();
        assert_eq!(v.as_slice(), &[4.0, 5.0]);
        assert_eq!(data, vec![4.0, 5.0]);
    }

    #[test]
    fn matrix_flattens_row_major() {
        let m = DMatrix::<f64>::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v = (&m).into_dense_vector(InputName::X).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn column_matrix_flattens_to_vector() {
        let m = DMatrix::<f64>::from_column_slice(3, 1, &[7.0, 8.0, 9.0]);
        let v = m.into_dense_vector(InputName::Targets).unwrap();
        assert_eq!(v.as_slice(), &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn nested_rows_flatten_row_major() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let v = rows.into_dense_vector(InputName::X).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn nested_rows_build_matrix() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 1.0, 0.0], vec![0.0, 1.0, 1.0]];
        let m = rows.into_dense_matrix(InputName::DesignMatrix).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 1)], 1.0);
        assert_eq!(m[(1, 0)], 0.0);
        assert_eq!(m[(1, 2)], 1.0);
    }

    #[test]
    fn fixed_size_rows_build_matrix() {
        let m = [[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]]
            .into_dense_matrix(InputName::DesignMatrix)
            .unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m[(2, 0)], 5.0);
    }

    #[test]
    fn empty_rows_give_empty_matrix() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let m = rows.into_dense_matrix(InputName::DesignMatrix).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn ragged_rows_are_a_conversion_error() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        let err = rows.clone().into_dense_matrix(InputName::DesignMatrix).unwrap_err();
        assert!(matches!(
            err,
            RakingError::TypeConversion { input: InputName::DesignMatrix, .. }
        ));
        assert!(err.to_string().contains("row 1 has 1"), "{err}");

        let err = rows.into_dense_vector(InputName::X).unwrap_err();
        assert_eq!(err.input(), Some(InputName::X));
    }

    #[test]
    fn numeric_text_parses() {
        let tokens = [" 10", "2.5e1", "-3"];
        let v = tokens.as_slice().into_dense_vector(InputName::X).unwrap();
        assert_eq!(v.as_slice(), &[10.0, 25.0, -3.0]);
    }

    #[test]
    fn non_numeric_text_is_a_conversion_error() {
        let tokens = vec!["1".to_string(), "abc".to_string()];
        let err = tokens.into_dense_vector(InputName::Targets).unwrap_err();
        match err {
            RakingError::TypeConversion { input, message } => {
                assert_eq!(input, InputName::Targets);
                assert!(message.contains("element 1"), "{message}");
                assert!(message.contains("abc"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
