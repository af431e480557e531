use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, Expr, ForLoop, Induction},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, LoopKind},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a counted `for` loop.
    ///
    /// The start, end and step expressions are evaluated once, before the
    /// first iteration. The end bound is inclusive and the sign of the step
    /// picks the direction: a positive step counts up while the counter is
    /// `<= end`, a negative one counts down while it is `>= end`, and a zero
    /// step runs no iterations at all.
    ///
    /// The loop gets its own scope. `for let i = ...` declares `i` there,
    /// while `for i = ...` drives an existing variable, which keeps its final
    /// value after the loop. The counter is kept outside the variable, so
    /// assigning to the loop variable in the body does not change how many
    /// times the body runs.
    ///
    /// # Errors
    /// - `InvalidLoopBounds` if a bound or the step is not a number.
    /// - `UnknownVariable` if `for i = ...` names an undeclared variable.
    /// - `Overflow` if advancing an integer counter leaves the 64-bit range.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::{Expr, ForLoop, Induction, Number, Statement},
    ///     interpreter::evaluator::core::Context,
    /// };
    ///
    /// let number = |n| Expr::NumberLiteral { value: Number::Integer(n),
    ///                                        line:  1, };
    ///
    /// // for let i = 3 to 1 step -1 print(i);
    /// let for_loop = ForLoop { induction: Induction::Declared,
    ///                          var:       "i".to_string(),
    ///                          start:     number(3),
    ///                          end:       number(1),
    ///                          step:      Some(number(-1)),
    ///                          body:      vec![Statement::Print { items: vec![Expr::VarRef { name: "i".to_string(),
    ///                                                                                        line: 1, }],
    ///                                                             line:  1, }],
    ///                          line:      1, };
    ///
    /// let mut context = Context::new();
    /// context.exec_for(&for_loop).unwrap();
    ///
    /// assert_eq!(context.output, ["3", "2", "1"]);
    /// ```
    pub fn exec_for(&mut self, for_loop: &ForLoop) -> EvalResult<()> {
        let line = for_loop.line;
        let start = self.eval_loop_bound(&for_loop.start, "start", line)?;
        let end = self.eval_loop_bound(&for_loop.end, "end", line)?;
        let step = match &for_loop.step {
            Some(step) => self.eval_loop_bound(step, "step", line)?,
            None => Value::Integer(1),
        };

        self.push_scope();
        self.loop_stack.push(LoopKind::For);

        let result = self.run_for(for_loop, start, &end, &step);

        self.loop_stack.pop();
        self.pop_scope();
        result
    }

    fn run_for(&mut self,
               for_loop: &ForLoop,
               start: Value,
               end: &Value,
               step: &Value)
               -> EvalResult<()> {
        let line = for_loop.line;

        match for_loop.induction {
            Induction::Declared => self.declare(&for_loop.var, start.clone(), line)?,
            Induction::Existing if self.lookup(&for_loop.var).is_none() => {
                return Err(RuntimeError::UnknownVariable { name: for_loop.var.clone(),
                                                           line });
            },
            Induction::Existing => {},
        }

        let direction = match step.numeric_cmp(&Value::Integer(0)) {
            Some(Ordering::Greater) => Ordering::Greater,
            Some(Ordering::Less) => Ordering::Less,
            _ => {
                log::debug!("for loop on line {line} has a zero step and does not run");
                return Ok(());
            },
        };

        let mut current = start;
        // Counting up stops once the counter passes `end`, counting down once
        // it drops below it.
        while current.numeric_cmp(end)
                     .is_some_and(|ordering| ordering != direction)
        {
            self.update(&for_loop.var, current.clone(), line)?;
            self.exec_statements(&for_loop.body);
            if self.settle_iteration() {
                break;
            }
            current = Self::eval_scalar_op(BinaryOperator::Add, &current, step, line)?;
        }

        Ok(())
    }

    fn eval_loop_bound(&mut self, expr: &Expr, role: &str, line: usize) -> EvalResult<Value> {
        let value = self.eval_expr(expr)?;
        if value.is_number() {
            Ok(value)
        } else {
            Err(RuntimeError::InvalidLoopBounds { details: format!("the {role} value must be a number, found {}",
                                                                   value.type_name()),
                                                  line })
        }
    }
}
