use std::{cmp::Ordering, fmt};

use crate::{
    ast::Number,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::{format_real, i64_to_f64_lossy},
};

/// Represents a runtime value in the interpreter.
///
/// Values are what expressions evaluate to and what variables hold. A failed
/// operation produces [`Value::Absent`], which is falsy, prints as `null` and
/// is rejected by every arithmetic operator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A integer value (64 bit integer).
    Integer(i64),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// A string of text.
    Text(String),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// No value: the result of a failed operation or of a function that
    /// returned nothing.
    #[default]
    Absent,
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(n) => Self::Integer(n),
            Number::Real(r) => Self::Real(r),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl Value {
    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// Integers beyond 2^53 are rounded to the nearest representable real.
    ///
    /// # Example
    /// ```
    /// use plainscript::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(10).as_real(1), Ok(10.0));
    /// assert_eq!(Value::Integer(9_007_199_254_740_993).as_real(1), Ok(9_007_199_254_740_992.0));
    /// assert!(Value::from("ten").as_real(1).is_err());
    /// ```
    ///
    /// # Errors
    /// `TypeMismatch` if the value is not a number.
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Real(r) => Ok(*r),
            Self::Integer(n) => Ok(i64_to_f64_lossy(*n)),
            _ => Err(RuntimeError::TypeMismatch { details: format!("expected a number, found {}",
                                                                   self.type_name()),
                                                  line }),
        }
    }

    /// Returns `true` for integers and reals.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }

    /// Maps the value to a boolean for use in conditions.
    ///
    /// Non-zero numbers, non-empty text and `true` are truthy; everything
    /// else, including [`Value::Absent`], is falsy.
    ///
    /// # Example
    /// ```
    /// use plainscript::interpreter::value::core::Value;
    ///
    /// assert!(Value::Integer(-1).is_truthy());
    /// assert!(!Value::Real(0.0).is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(!Value::Absent.is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(n) => *n != 0,
            Self::Real(r) => *r != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Absent => false,
        }
    }

    /// A short name of the value's type for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Real(_) => "real number",
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Absent => "null",
        }
    }

    /// Orders two numbers, mixing integers and reals freely.
    ///
    /// Returns `None` if either side is not a number or a real is NaN.
    #[must_use]
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Real(b)) => i64_to_f64_lossy(*a).partial_cmp(b),
            (Self::Real(a), Self::Integer(b)) => a.partial_cmp(&i64_to_f64_lossy(*b)),
            (Self::Real(a), Self::Real(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => f.write_str(&format_real(*r)),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Absent => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_program_output() {
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::Real(7.0).to_string(), "7.0");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::from("hi there").to_string(), "hi there");
        assert_eq!(Value::Absent.to_string(), "null");
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(Value::Integer(2).numeric_cmp(&Value::Real(2.0)), Some(Ordering::Equal));
        assert_eq!(Value::Real(1.5).numeric_cmp(&Value::Integer(2)), Some(Ordering::Less));
        assert_eq!(Value::from("2").numeric_cmp(&Value::Integer(2)), None);
        assert_eq!(Value::Real(f64::NAN).numeric_cmp(&Value::Real(1.0)), None);
    }
}
