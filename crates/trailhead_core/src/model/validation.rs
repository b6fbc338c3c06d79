//! Field validation shared by entity constructors and setters.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entity field validation failures.
///
/// Raised at construction (or setter) time and never partially applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    BlankField(&'static str),
    NegativeSnowBoundary(i64),
    /// Snow boundary does not fit in `u32`.
    SnowBoundaryOutOfRange(i64),
    NegativeDistance(f64),
    /// Numeric field is NaN or infinite.
    NonFiniteNumber(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::NegativeSnowBoundary(value) => {
                write!(f, "snow boundary must not be negative, got {value}")
            }
            Self::SnowBoundaryOutOfRange(value) => {
                write!(f, "snow boundary must be at most {}, got {value}", u32::MAX)
            }
            Self::NegativeDistance(value) => {
                write!(f, "distance must not be negative, got {value}")
            }
            Self::NonFiniteNumber(field) => write!(f, "{field} must be a finite number"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(
    value: impl Into<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_finite(value: f64, field: &'static str) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteNumber(field));
    }
    Ok(value)
}
