use crate::{
    ast::{Condition, Statement},
    error::RuntimeError,
    interpreter::evaluator::core::{Context, LoopKind},
};

impl Context {
    /// Evaluates a `while` loop.
    ///
    /// The condition is re-evaluated before every iteration. The whole loop
    /// shares one scope, so a `let` in the body re-binds on later iterations
    /// instead of failing as a redeclaration.
    ///
    /// A loop that is still running after `limits.max_while_iterations`
    /// iterations is stopped with an `IterationLimit` diagnostic, and the
    /// program continues after the loop.
    pub fn exec_while(&mut self, condition: &Condition, body: &[Statement], line: usize) {
        let limit = self.limits.max_while_iterations;

        self.push_scope();
        self.loop_stack.push(LoopKind::While);

        let mut iterations = 0;
        while self.condition_holds(condition) {
            if iterations >= limit {
                log::warn!("while loop on line {line} stopped after {limit} iterations");
                self.report(RuntimeError::IterationLimit { limit, line });
                break;
            }
            iterations += 1;

            self.exec_statements(body);
            if self.settle_iteration() {
                break;
            }
        }

        self.loop_stack.pop();
        self.pop_scope();
    }
}
