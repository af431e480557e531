use crate::{
    ast::{ComparisonOperator, Condition, ElsePart, Expr, Statement},
    interpreter::evaluator::core::{Context, EvalResult},
};

impl Context {
    /// Evaluates an `if` statement and its `elseif`/`else` chain.
    ///
    /// Exactly one branch runs: the first whose condition holds, or the
    /// `else` branch if none does. Each branch body gets its own scope. A
    /// condition that fails to evaluate counts as false, but a fatal failure
    /// stops the chain.
    pub fn exec_if(&mut self,
                   condition: &Condition,
                   then_branch: &[Statement],
                   else_part: Option<&ElsePart>) {
        if self.condition_holds(condition) {
            self.scoped(|ctx| ctx.exec_statements(then_branch));
        } else if !self.signals.halting
                  && let Some(else_part) = else_part
        {
            self.exec_else(else_part);
        }
    }

    fn exec_else(&mut self, else_part: &ElsePart) {
        match else_part {
            ElsePart::Else { body, .. } => self.scoped(|ctx| ctx.exec_statements(body)),
            ElsePart::ElseIf { condition,
                               body,
                               else_part,
                               .. } => self.exec_if(condition, body, else_part.as_deref()),
        }
    }

    /// Evaluates `if name is <op> value then ...`.
    ///
    /// The body runs in the enclosing scope, only when the comparison holds.
    ///
    /// # Errors
    /// Reading `name` or evaluating `value` fails, or the comparison is not
    /// defined for the two values.
    pub fn exec_natural_if(&mut self,
                           name: &str,
                           op: ComparisonOperator,
                           value: &Expr,
                           body: &[Statement],
                           line: usize)
                           -> EvalResult<()> {
        let current = self.eval_variable(name, line)?;
        let value = self.eval_expr(value)?;

        if Self::eval_comparison(op, &current, &value, line)? {
            self.exec_statements(body);
        }
        Ok(())
    }
}
