use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// `+` is the identity on numbers and `-` negates them. Negating
    /// `i64::MIN` is reported as an overflow.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1);
    /// assert_eq!(v, Ok(Value::Integer(-5)));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Plus, &Value::Real(2.5), 1);
    /// assert_eq!(v, Ok(Value::Real(2.5)));
    ///
    /// assert!(Context::eval_unary(UnaryOperator::Negate, &Value::Bool(true), 1).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match (op, value) {
            (_, Value::Absent) => {
                Err(RuntimeError::InvalidOperands { operator: op.to_string(),
                                                    line })
            },
            (UnaryOperator::Plus, v) if v.is_number() => Ok(v.clone()),
            (UnaryOperator::Negate, Value::Integer(n)) => {
                n.checked_neg()
                 .map(Value::Integer)
                 .ok_or_else(|| RuntimeError::Overflow { operator: op.to_string(),
                                                         line })
            },
            (UnaryOperator::Negate, Value::Real(r)) => Ok(Value::Real(-r)),
            (_, v) => {
                Err(RuntimeError::TypeMismatch { details: format!("cannot apply unary '{op}' to {}",
                                                                  v.type_name()),
                                                 line })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negating_the_smallest_integer_overflows() {
        assert_eq!(Context::eval_unary(UnaryOperator::Negate, &Value::Integer(i64::MIN), 3),
                   Err(RuntimeError::Overflow { operator: "-".to_string(),
                                                line:     3, }));
    }

    #[test]
    fn text_cannot_be_negated() {
        assert!(matches!(Context::eval_unary(UnaryOperator::Negate, &Value::from("a"), 1),
                         Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(Context::eval_unary(UnaryOperator::Plus, &Value::Absent, 1),
                         Err(RuntimeError::InvalidOperands { .. })));
    }
}
