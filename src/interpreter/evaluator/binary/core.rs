use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an arithmetic expression node.
    ///
    /// Both operands are evaluated left to right before the operator is
    /// applied; the first failing operand aborts the whole expression.
    ///
    /// # Parameters
    /// - `left`: Left operand expression.
    /// - `op`: The arithmetic operator.
    /// - `right`: Right operand expression.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    pub fn eval_binary_op(&mut self,
                          left: &Expr,
                          op: BinaryOperator,
                          right: &Expr,
                          line: usize)
                          -> EvalResult<Value> {
        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;

        Self::eval_scalar_op(op, &left, &right, line)
    }
}
