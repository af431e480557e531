use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{evaluator::core::Context, value::core::Value},
};

impl Context {
    /// Evaluates `return`, handing the value to the enclosing call.
    ///
    /// A failed return expression returns an absent value. At the top level a
    /// `return` ends the program.
    pub fn exec_return(&mut self, value: Option<&Expr>) {
        let value = value.map_or(Value::Absent, |expr| self.eval_or_absent(expr));
        if self.signals.halting {
            return;
        }
        self.signals.return_value = value;
        self.signals.returning = true;
    }

    /// Evaluates `break`.
    ///
    /// Outside a loop the break is reported, and the flag still unwinds to
    /// the end of the enclosing call or program.
    pub fn exec_break(&mut self, line: usize) {
        if self.loop_stack.is_empty() {
            self.report(RuntimeError::BreakOutsideLoop { line });
        }
        self.signals.breaking = true;
    }

    /// Evaluates `continue`. Outside a loop it behaves like a stray `break`.
    pub fn exec_continue(&mut self, line: usize) {
        if self.loop_stack.is_empty() {
            self.report(RuntimeError::ContinueOutsideLoop { line });
        }
        self.signals.continuing = true;
    }

    /// Consumes the loop-owned signals at the end of an iteration.
    ///
    /// Returns `true` if the loop must stop: on `break` (which is consumed
    /// here), or while a `return` or a fatal diagnostic is unwinding.
    pub fn settle_iteration(&mut self) -> bool {
        if self.signals.breaking {
            self.signals.breaking = false;
            return true;
        }
        self.signals.continuing = false;
        self.signals.returning || self.signals.halting
    }
}
