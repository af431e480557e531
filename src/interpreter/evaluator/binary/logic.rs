use crate::{
    ast::{Condition, LogicalOperator},
    interpreter::evaluator::core::{Context, EvalResult},
};

impl Context {
    /// Evaluates a condition to a boolean.
    ///
    /// `and` and `or` short-circuit: the right side is not evaluated (and
    /// cannot fail) once the left side decides the result. A bare expression
    /// used as a condition is tested for truthiness.
    ///
    /// # Errors
    /// The first diagnostic raised by an evaluated operand.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::{Condition, Expr, LogicalOperator},
    ///     interpreter::evaluator::core::Context,
    /// };
    ///
    /// let mut context = Context::new();
    /// let truth = |value| Condition::CondExpr { expr: Expr::BooleanLiteral { value, line: 1 },
    ///                                           line: 1, };
    /// let unknown = Condition::CondExpr { expr: Expr::VarRef { name: "missing".to_string(),
    ///                                                          line: 1, },
    ///                                     line: 1, };
    /// let condition = Condition::LogicalOp { op:    LogicalOperator::Or,
    ///                                        left:  Box::new(truth(true)),
    ///                                        right: Box::new(unknown),
    ///                                        line:  1, };
    ///
    /// assert_eq!(context.eval_condition(&condition), Ok(true));
    /// ```
    pub fn eval_condition(&mut self, condition: &Condition) -> EvalResult<bool> {
        match condition {
            Condition::Compare { op,
                                 left,
                                 right,
                                 line, } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Self::eval_comparison(*op, &left, &right, *line)
            },
            Condition::LogicalOp { op, left, right, .. } => {
                let left = self.eval_condition(left)?;
                match op {
                    LogicalOperator::And if !left => Ok(false),
                    LogicalOperator::Or if left => Ok(true),
                    _ => self.eval_condition(right),
                }
            },
            Condition::Not { operand, .. } => Ok(!self.eval_condition(operand)?),
            Condition::CondExpr { expr, .. } => Ok(self.eval_expr(expr)?.is_truthy()),
            Condition::GroupedCondition { inner, .. } => self.eval_condition(inner),
        }
    }
}
