//! Error types for the raking pipeline.
//!
//! Only malformed inputs are errors. A singular GLS system is handled inside
//! the solver and never surfaces here.

use crate::domain::InputName;

pub type RakingResult<T> = Result<T, RakingError>;

/// Number of offending values echoed back in `Display` output.
const PREVIEW_LEN: usize = 6;

#[derive(Clone, PartialEq)]
pub enum RakingError {
    /// An argument does not have the length implied by the design matrix.
    ShapeMismatch {
        input: InputName,
        actual: usize,
        expected: usize,
        values: Vec<f64>,
    },
    /// An argument could not be read as a dense numeric array.
    TypeConversion { input: InputName, message: String },
    /// A caller-supplied `RakingOptions` is unusable.
    InvalidOptions(String),
}

impl RakingError {
    pub fn shape_mismatch(input: InputName, values: &[f64], expected: usize) -> Self {
        Self::ShapeMismatch {
            input,
            actual: values.len(),
            expected,
            values: values.to_vec(),
        }
    }

    pub fn type_conversion(input: InputName, message: impl Into<String>) -> Self {
        Self::TypeConversion {
            input,
            message: message.into(),
        }
    }

    /// The argument this error refers to, if any.
    pub fn input(&self) -> Option<InputName> {
        match self {
            RakingError::ShapeMismatch { input, .. } | RakingError::TypeConversion { input, .. } => {
                Some(*input)
            }
            RakingError::InvalidOptions(_) => None,
        }
    }
}

impl std::fmt::Display for RakingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RakingError::ShapeMismatch {
                input,
                actual,
                expected,
                values,
            } => {
                write!(
                    f,
                    "{input} {} has length {actual}; must have length {expected}",
                    preview(values)
                )?;
                if input.is_coefficient() {
                    write!(f, " (or be a single scalar)")?;
                }
                Ok(())
            }
            RakingError::TypeConversion { input, message } => {
                write!(f, "cannot convert {input} to a float array: {message}")
            }
            RakingError::InvalidOptions(message) => write!(f, "invalid raking options: {message}"),
        }
    }
}

impl std::fmt::Debug for RakingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RakingError::ShapeMismatch {
                input,
                actual,
                expected,
                ..
            } => f
                .debug_struct("ShapeMismatch")
                .field("input", input)
                .field("actual", actual)
                .field("expected", expected)
                .finish_non_exhaustive(),
            RakingError::TypeConversion { input, message } => f
                .debug_struct("TypeConversion")
                .field("input", input)
                .field("message", message)
                .finish(),
            RakingError::InvalidOptions(message) => {
                f.debug_tuple("InvalidOptions").field(message).finish()
            }
        }
    }
}

impl std::error::Error for RakingError {}

fn preview(values: &[f64]) -> String {
    let mut parts: Vec<String> = values.iter().take(PREVIEW_LEN).map(|v| format!("{v}")).collect();
    if values.len() > PREVIEW_LEN {
        parts.push("...".to_string());
    }
    format!("[{}]", parts.join(", "))
}
