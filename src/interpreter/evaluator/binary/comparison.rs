use std::cmp::Ordering;

use crate::{
    ast::ComparisonOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Maps an ordering to the outcome of a relational operator.
///
/// `None` (an unordered pair, such as a NaN operand) only satisfies `!=`.
#[must_use]
pub fn ordering_satisfies(op: ComparisonOperator, ordering: Option<Ordering>) -> bool {
    use ComparisonOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

    match (op, ordering) {
        (NotEqual, None) => true,
        (_, None) => false,
        (Less, Some(o)) => o == Ordering::Less,
        (Greater, Some(o)) => o == Ordering::Greater,
        (LessEqual, Some(o)) => o != Ordering::Greater,
        (GreaterEqual, Some(o)) => o != Ordering::Less,
        (Equal, Some(o)) => o == Ordering::Equal,
        (NotEqual, Some(o)) => o != Ordering::Equal,
    }
}

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// Numbers compare by value across integers and reals, text compares
    /// lexicographically. `==` and `!=` also accept booleans, and treat any
    /// two values of different kinds as unequal. Ordering anything other than
    /// two numbers or two texts is a type mismatch.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `line`: Current line number used for error reporting.
    ///
    /// # Returns
    /// Whether the comparison holds.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::ComparisonOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::Integer(3);
    /// let b = Value::Real(5.0);
    ///
    /// assert_eq!(Context::eval_comparison(ComparisonOperator::Less, &a, &b, 1), Ok(true));
    /// assert_eq!(Context::eval_comparison(ComparisonOperator::Equal, &a, &Value::from("3"), 1),
    ///            Ok(false));
    /// ```
    pub fn eval_comparison(op: ComparisonOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<bool> {
        use Value::{Absent, Bool, Text};

        let equality = matches!(op, ComparisonOperator::Equal | ComparisonOperator::NotEqual);

        match (left, right) {
            (Absent, _) | (_, Absent) => {
                Err(RuntimeError::InvalidOperands { operator: op.to_string(),
                                                    line })
            },
            (l, r) if l.is_number() && r.is_number() => Ok(ordering_satisfies(op, l.numeric_cmp(r))),
            (Text(a), Text(b)) => Ok(ordering_satisfies(op, Some(a.cmp(b)))),
            (Bool(a), Bool(b)) if equality => Ok(ordering_satisfies(op, Some(a.cmp(b)))),
            _ if equality => Ok(op == ComparisonOperator::NotEqual),
            _ => {
                Err(RuntimeError::TypeMismatch { details: format!("cannot compare {} and {} with '{op}'",
                                                                  left.type_name(),
                                                                  right.type_name()),
                                                 line })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relational_operators_on_numbers() {
        use ComparisonOperator::*;

        let two = Value::Integer(2);
        let three = Value::Real(3.0);
        for (op, expected) in [(Less, true),
                               (Greater, false),
                               (LessEqual, true),
                               (GreaterEqual, false),
                               (Equal, false),
                               (NotEqual, true)]
        {
            assert_eq!(Context::eval_comparison(op, &two, &three, 1), Ok(expected), "{op}");
        }
    }

    #[test]
    fn nan_is_only_unequal() {
        let nan = Value::Real(f64::NAN);
        assert_eq!(Context::eval_comparison(ComparisonOperator::Equal, &nan, &nan, 1), Ok(false));
        assert_eq!(Context::eval_comparison(ComparisonOperator::NotEqual, &nan, &nan, 1), Ok(true));
    }

    #[test]
    fn ordering_text_against_number_is_a_mismatch() {
        let result = Context::eval_comparison(ComparisonOperator::Less,
                                              &Value::from("a"),
                                              &Value::Integer(1),
                                              7);
        assert!(matches!(result, Err(RuntimeError::TypeMismatch { line: 7, .. })));
    }

    #[test]
    fn booleans_support_equality_only() {
        let t = Value::Bool(true);
        assert_eq!(Context::eval_comparison(ComparisonOperator::Equal, &t, &t, 1), Ok(true));
        assert!(Context::eval_comparison(ComparisonOperator::Less, &t, &t, 1).is_err());
    }
}
