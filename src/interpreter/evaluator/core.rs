use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{Condition, Expr, FunctionDef, Program, Statement},
    error::RuntimeError,
    interpreter::value::core::Value,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default ceiling on the iterations of a single `while` loop.
pub const DEFAULT_MAX_WHILE_ITERATIONS: usize = 100_000;
/// Default ceiling on nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1_000;

/// Resource ceilings applied while evaluating a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Iterations a single `while` loop may run before it is stopped.
    pub max_while_iterations: usize,
    /// Nested calls allowed before a call is refused.
    pub max_call_depth:       usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_while_iterations: DEFAULT_MAX_WHILE_ITERATIONS,
               max_call_depth:       DEFAULT_MAX_CALL_DEPTH, }
    }
}

/// The kind of loop a `break` or `continue` would leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// A counted `for` loop.
    For,
    /// A `while` loop.
    While,
}

/// Transient control-flow flags.
///
/// Statement lists stop as soon as any flag is raised; the nearest construct
/// that owns the flag (a loop for `breaking` and `continuing`, a call for
/// `returning`) clears it again. `halting` is never cleared: it is raised by
/// fatal diagnostics and unwinds the whole program.
#[derive(Debug, Default)]
pub struct Signals {
    /// A `return` is unwinding to the enclosing call.
    pub returning:    bool,
    /// A `break` is unwinding to the enclosing loop.
    pub breaking:     bool,
    /// A `continue` is unwinding to the enclosing loop.
    pub continuing:   bool,
    /// A fatal diagnostic stopped the program.
    pub halting:      bool,
    /// The value carried by a pending `return`.
    pub return_value: Value,
}

impl Signals {
    /// Returns `true` if any flag should stop the current statement list.
    #[must_use]
    pub const fn interrupted(&self) -> bool {
        self.returning || self.breaking || self.continuing || self.halting
    }
}

/// What running a program produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
    /// Every line printed, in order.
    pub output:      Vec<String>,
    /// Every semantic diagnostic, in order.
    pub diagnostics: Vec<RuntimeError>,
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the scope stack, all user defined
/// functions, the active loops and calls, and what the program printed.
///
/// ## Usage
///
/// A `Context` belongs to exactly one program run. Nothing in it may be
/// carried over to another program, so create a fresh one every time.
pub struct Context {
    /// Variable bindings, innermost scope last. The first entry is the global
    /// scope and is never popped.
    pub scope_stack: Vec<HashMap<String, Value>>,
    /// A mapping from function names to their definitions. Redefining a name
    /// replaces the entry.
    pub functions:   HashMap<String, Rc<FunctionDef>>,
    /// Names of the functions currently executing, innermost last.
    pub call_stack:  Vec<String>,
    /// Loops active in the current call frame, innermost last.
    pub loop_stack:  Vec<LoopKind>,
    /// Pending control-flow flags.
    pub signals:     Signals,
    /// Every line printed so far.
    pub output:      Vec<String>,
    /// Every semantic diagnostic recorded so far.
    pub diagnostics: Vec<RuntimeError>,
    /// Ceilings on loops and calls.
    pub limits:      Limits,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a new evaluation context with an empty global scope, no
    /// user-defined functions and the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Creates a new evaluation context with the given limits.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self { scope_stack: vec![HashMap::new()],
               functions: HashMap::new(),
               call_stack: Vec::new(),
               loop_stack: Vec::new(),
               signals: Signals::default(),
               output: Vec::new(),
               diagnostics: Vec::new(),
               limits }
    }

    /// Runs every top-level statement of `program`.
    ///
    /// A stray top-level `return` (or `break`) simply ends the program.
    pub fn run_program(&mut self, program: &Program) {
        self.exec_statements(&program.statements);
        log::debug!("program finished with {} printed lines and {} semantic diagnostics",
                    self.output.len(),
                    self.diagnostics.len());
    }

    /// Consumes the context and returns what the program produced.
    #[must_use]
    pub fn finish(self) -> Execution {
        Execution { output:      self.output,
                    diagnostics: self.diagnostics, }
    }

    /// Executes statements in order, stopping as soon as a control-flow
    /// signal is raised.
    pub fn exec_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            if self.signals.interrupted() {
                break;
            }
            self.exec_statement(statement);
        }
    }

    /// Evaluates a single statement.
    ///
    /// Errors never escape a statement: the first one is recorded as a
    /// diagnostic and the statement is abandoned.
    pub fn exec_statement(&mut self, statement: &Statement) {
        log::trace!("executing the statement on line {}", statement.line_number());

        let result = match statement {
            Statement::Declare { name, value, line } => self.exec_declare(name, value, *line),
            Statement::Assign { name, value, line } => self.exec_assign(name, value, *line),
            Statement::Expression { expr, .. } => self.eval_expr(expr).map(drop),
            Statement::Print { items, .. } => self.exec_print(items),
            Statement::If { condition,
                            then_branch,
                            else_part,
                            .. } => {
                self.exec_if(condition, then_branch, else_part.as_deref());
                Ok(())
            },
            Statement::For(for_loop) => self.exec_for(for_loop),
            Statement::While { condition, body, line } => {
                self.exec_while(condition, body, *line);
                Ok(())
            },
            Statement::FunctionDef(def) => {
                self.define_function(def);
                Ok(())
            },
            Statement::Return { value, .. } => {
                self.exec_return(value.as_ref());
                Ok(())
            },
            Statement::Break { line } => {
                self.exec_break(*line);
                Ok(())
            },
            Statement::Continue { line } => {
                self.exec_continue(*line);
                Ok(())
            },
            Statement::NaturalLangOp { op,
                                       target,
                                       operand,
                                       line, } => self.exec_natural_op(*op, target, operand, *line),
            Statement::NaturalLangIf { name,
                                       op,
                                       value,
                                       body,
                                       line, } => self.exec_natural_if(name, *op, value, body, *line),
        };

        if let Err(error) = result {
            self.report(error);
        }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches based on expression variant.
    ///
    /// # Errors
    /// The first diagnostic raised anywhere inside the expression.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::{BinaryOperator, Expr, Number},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut context = Context::new();
    /// let expr = Expr::BinaryOp { left:  Box::new(Expr::NumberLiteral { value: Number::Integer(2),
    ///                                                                   line:  1, }),
    ///                             op:    BinaryOperator::Mul,
    ///                             right: Box::new(Expr::NumberLiteral { value: Number::Real(1.5),
    ///                                                                   line:  1, }),
    ///                             line:  1, };
    ///
    /// assert_eq!(context.eval_expr(&expr), Ok(Value::Real(3.0)));
    /// ```
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::NumberLiteral { value, .. } => Ok(Value::from(*value)),
            Expr::StringLiteral { value, .. } => Ok(Value::Text(value.clone())),
            Expr::BooleanLiteral { value, .. } => Ok(Value::Bool(*value)),
            Expr::VarRef { name, line } => self.eval_variable(name, *line),
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => self.eval_binary_op(left, *op, right, *line),
            Expr::UnaryOp { op, operand, line } => {
                let value = self.eval_expr(operand)?;
                Self::eval_unary(*op, &value, *line)
            },
            Expr::Call { name,
                         arguments,
                         line, } => self.eval_call(name, arguments, *line),
        }
    }

    /// Evaluates an expression, recording a failure and yielding
    /// [`Value::Absent`] in its place.
    pub fn eval_or_absent(&mut self, expr: &Expr) -> Value {
        match self.eval_expr(expr) {
            Ok(value) => value,
            Err(error) => {
                self.report(error);
                Value::Absent
            },
        }
    }

    /// Evaluates a condition for `if`, `elseif` and `while`.
    ///
    /// A condition that fails to evaluate is recorded and counts as false.
    pub fn condition_holds(&mut self, condition: &Condition) -> bool {
        match self.eval_condition(condition) {
            Ok(holds) => holds,
            Err(error) => {
                self.report(error);
                false
            },
        }
    }

    /// Records a semantic diagnostic.
    ///
    /// Fatal diagnostics raise the halting signal. Once halting, further
    /// diagnostics are dropped: they would only be follow-up noise.
    pub fn report(&mut self, error: RuntimeError) {
        if self.signals.halting {
            return;
        }
        log::debug!("{error}");
        if error.is_fatal() {
            self.signals.halting = true;
        }
        self.diagnostics.push(error);
    }

    fn exec_declare(&mut self, name: &str, value: &Expr, line: usize) -> EvalResult<()> {
        let value = self.eval_or_absent(value);
        if self.signals.halting {
            return Ok(());
        }

        // Loop bodies run once per iteration in the same scope, so a `let`
        // there re-binds instead of redeclaring.
        if !self.loop_stack.is_empty() && self.is_declared_locally(name) {
            return self.update(name, value, line);
        }
        self.declare(name, value, line)
    }

    fn exec_assign(&mut self, name: &str, value: &Expr, line: usize) -> EvalResult<()> {
        let value = self.eval_or_absent(value);
        if self.signals.halting {
            return Ok(());
        }
        self.update(name, value, line)
    }

    /// Looks up a variable by name.
    ///
    /// # Errors
    /// `UnknownVariable` if no scope binds the name, `NoValue` if it is bound
    /// to [`Value::Absent`].
    pub fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        match self.lookup(name) {
            Some(Value::Absent) => Err(RuntimeError::NoValue { name: name.to_string(),
                                                               line }),
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                        line }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_diagnostics_halt_and_silence_the_rest() {
        let mut context = Context::new();
        context.report(RuntimeError::DivisionByZero { line: 1 });
        assert!(!context.signals.halting);

        context.report(RuntimeError::UnknownVariable { name: "x".to_string(),
                                                       line: 2, });
        context.report(RuntimeError::DivisionByZero { line: 3 });

        assert!(context.signals.halting);
        assert_eq!(context.diagnostics.len(), 2);
    }

    #[test]
    fn unset_variables_have_no_value() {
        let mut context = Context::new();
        context.declare("x", Value::Absent, 1).unwrap();

        assert_eq!(context.eval_variable("x", 2),
                   Err(RuntimeError::NoValue { name: "x".to_string(),
                                               line: 2, }));
        assert!(matches!(context.eval_variable("y", 3),
                         Err(RuntimeError::UnknownVariable { .. })));
    }

    #[test]
    fn signals_interrupt_statement_lists() {
        let mut context = Context::new();
        let print = |n: i64| Statement::Print { items: vec![Expr::NumberLiteral { value: n.into(),
                                                                            line:  1, }],
                                           line:  1, };

        context.exec_statements(&[print(1), Statement::Break { line: 1 }, print(2)]);

        assert_eq!(context.output, ["1"]);
        assert!(context.signals.breaking);
        assert_eq!(context.diagnostics,
                   vec![RuntimeError::BreakOutsideLoop { line: 1 }]);
    }
}
