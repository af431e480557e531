use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a scalar arithmetic operation.
    ///
    /// Two integers stay integral for `+`, `-` and `*`, with overflow reported
    /// instead of wrapping. Any real operand promotes both sides to reals.
    /// Division always produces a real and checks for a zero divisor first.
    ///
    /// # Parameters
    /// - `op`: The arithmetic operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the computed scalar.
    ///
    /// # Errors
    /// - `InvalidOperands` if either side is absent.
    /// - `TypeMismatch` if either side is text or a boolean.
    /// - `DivisionByZero` for a zero divisor.
    /// - `Overflow` if integer arithmetic leaves the 64-bit range.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let x = Value::Integer(7);
    /// let y = Value::Integer(2);
    ///
    /// assert_eq!(Context::eval_scalar_op(BinaryOperator::Sub, &x, &y, 1), Ok(Value::Integer(5)));
    /// assert_eq!(Context::eval_scalar_op(BinaryOperator::Div, &x, &y, 1), Ok(Value::Real(3.5)));
    /// assert!(Context::eval_scalar_op(BinaryOperator::Div, &x, &Value::Real(0.0), 1).is_err());
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mul, Sub};
        use Value::{Absent, Integer, Real};

        match (left, right) {
            (Absent, _) | (_, Absent) => {
                Err(RuntimeError::InvalidOperands { operator: op.to_string(),
                                                    line })
            },
            (Integer(a), Integer(b)) if op != Div => {
                let result = match op {
                    Add => a.checked_add(*b),
                    Sub => a.checked_sub(*b),
                    _ => a.checked_mul(*b),
                };
                result.map(Integer)
                      .ok_or_else(|| RuntimeError::Overflow { operator: op.to_string(),
                                                              line })
            },
            (l, r) if l.is_number() && r.is_number() => {
                let left = l.as_real(line)?;
                let right = r.as_real(line)?;

                Ok(Real(match op {
                            Add => left + right,
                            Sub => left - right,
                            Mul => left * right,
                            Div => {
                                if right == 0.0 {
                                    return Err(RuntimeError::DivisionByZero { line });
                                }
                                left / right
                            },
                        }))
            },
            _ => {
                Err(RuntimeError::TypeMismatch { details: format!("cannot apply '{op}' to {} and {}",
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
    fn integers_stay_integral() {
        let result = Context::eval_scalar_op(BinaryOperator::Mul,
                                             &Value::Integer(6),
                                             &Value::Integer(7),
                                             1);
        assert_eq!(result, Ok(Value::Integer(42)));
    }

    #[test]
    fn mixed_operands_promote_to_real() {
        let result = Context::eval_scalar_op(BinaryOperator::Add,
                                             &Value::Integer(1),
                                             &Value::Real(0.5),
                                             1);
        assert_eq!(result, Ok(Value::Real(1.5)));
    }

    #[test]
    fn division_by_integer_zero_is_reported() {
        let result = Context::eval_scalar_op(BinaryOperator::Div,
                                             &Value::Integer(5),
                                             &Value::Integer(0),
                                             4);
        assert_eq!(result, Err(RuntimeError::DivisionByZero { line: 4 }));
    }

    #[test]
    fn overflow_is_reported() {
        let result = Context::eval_scalar_op(BinaryOperator::Add,
                                             &Value::Integer(i64::MAX),
                                             &Value::Integer(1),
                                             2);
        assert_eq!(result,
                   Err(RuntimeError::Overflow { operator: "+".to_string(),
                                                line:     2, }));
    }

    #[test]
    fn large_integers_promote_when_mixed() {
        let big = Value::Integer(9_007_199_254_740_993);

        let result = Context::eval_scalar_op(BinaryOperator::Div, &big, &Value::Integer(1), 1);
        assert_eq!(result, Ok(Value::Real(9_007_199_254_740_992.0)));

        let result = Context::eval_scalar_op(BinaryOperator::Add, &Value::Real(0.5), &big, 1);
        assert_eq!(result, Ok(Value::Real(9_007_199_254_740_992.0)));

        let result = Context::eval_scalar_op(BinaryOperator::Sub, &big, &Value::Integer(1), 1);
        assert_eq!(result, Ok(Value::Integer(9_007_199_254_740_992)));
    }

    #[test]
    fn text_and_absent_are_rejected() {
        assert!(matches!(Context::eval_scalar_op(BinaryOperator::Add,
                                                 &Value::from("a"),
                                                 &Value::Integer(1),
                                                 1),
                         Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(Context::eval_scalar_op(BinaryOperator::Add,
                                                 &Value::Absent,
                                                 &Value::Integer(1),
                                                 1),
                         Err(RuntimeError::InvalidOperands { .. })));
    }
}
