use crate::{
    ast::{Expr, NaturalOperator},
    interpreter::evaluator::core::{Context, EvalResult},
};

impl Context {
    /// Evaluates `set`, `add`, `sub`, `mult` and `div`.
    ///
    /// `set x to e` behaves exactly like `x = e`. The arithmetic verbs read the
    /// current value of the target first, then the operand, and store the
    /// result. If the arithmetic fails the target keeps its old value.
    ///
    /// # Errors
    /// The target is undeclared or unset, or the arithmetic fails.
    pub fn exec_natural_op(&mut self,
                           op: NaturalOperator,
                           target: &str,
                           operand: &Expr,
                           line: usize)
                           -> EvalResult<()> {
        let Some(arithmetic) = op.arithmetic() else {
            let value = self.eval_or_absent(operand);
            if self.signals.halting {
                return Ok(());
            }
            return self.update(target, value, line);
        };

        let current = self.eval_variable(target, line)?;
        let operand = self.eval_expr(operand)?;
        let value = Self::eval_scalar_op(arithmetic, &current, &operand, line)?;

        self.update(target, value, line)
    }
}
