use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Registers a user-defined function.
    ///
    /// Definitions take effect when the statement executes; a later
    /// definition with the same name replaces the earlier one.
    pub fn define_function(&mut self, def: &FunctionDef) {
        log::trace!("defining function '{}' with {} parameters on line {}",
                    def.name,
                    def.params.len(),
                    def.line);
        self.functions
            .insert(def.name.clone(), Rc::new(def.clone()));
    }

    /// Calls a user-defined function.
    ///
    /// Arguments are evaluated left to right in the caller's scope. The body
    /// then runs in a new scope holding the parameters, pushed on top of the
    /// caller's scopes, so free names resolve against the caller. A wrong
    /// number of arguments is reported but the call still runs: parameters
    /// and arguments are paired up positionally, extra arguments are dropped
    /// and missing parameters stay unbound.
    ///
    /// The call evaluates to the value of the `return` that ended it, or to
    /// an absent value if the body finished without one.
    ///
    /// # Errors
    /// - `UnknownFunction` if no function with this name has been defined.
    /// - `CallDepthExceeded` if the call would nest deeper than
    ///   `limits.max_call_depth`.
    /// - Any error raised while evaluating an argument.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::{BinaryOperator, Expr, FunctionDef, Number, Statement},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// // function double(n) begin return n * 2; end
    /// let n = Expr::VarRef { name: "n".to_string(),
    ///                        line: 1, };
    /// let two = Expr::NumberLiteral { value: Number::Integer(2),
    ///                                 line:  1, };
    /// let body = vec![Statement::Return { value: Some(Expr::BinaryOp { left:  Box::new(n),
    ///                                                                  op:    BinaryOperator::Mul,
    ///                                                                  right: Box::new(two),
    ///                                                                  line:  1, }),
    ///                                     line:  1, }];
    ///
    /// let mut context = Context::new();
    /// context.define_function(&FunctionDef { name: "double".to_string(),
    ///                                        params: vec!["n".to_string()],
    ///                                        body,
    ///                                        line: 1 });
    ///
    /// let argument = Expr::NumberLiteral { value: Number::Integer(21),
    ///                                      line:  2, };
    /// assert_eq!(context.eval_call("double", &[argument], 2), Ok(Value::Integer(42)));
    /// ```
    pub fn eval_call(&mut self, name: &str, arguments: &[Expr], line: usize) -> EvalResult<Value> {
        let Some(function) = self.functions.get(name).cloned() else {
            return Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                                       line });
        };

        let values = arguments.iter()
                              .map(|argument| self.eval_expr(argument))
                              .collect::<EvalResult<Vec<_>>>()?;

        let limit = self.limits.max_call_depth;
        if self.call_stack.len() >= limit {
            return Err(RuntimeError::CallDepthExceeded { name: name.to_string(),
                                                         limit,
                                                         line });
        }

        if values.len() != function.params.len() {
            self.report(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                              expected: function.params.len(),
                                                              found: values.len(),
                                                              line });
        }

        log::trace!("calling '{name}' at depth {} from line {line}", self.call_stack.len() + 1);

        self.push_scope();
        self.call_stack.push(name.to_string());
        let outer_loops = std::mem::take(&mut self.loop_stack);

        let result = self.run_call(&function, values, line);

        self.loop_stack = outer_loops;
        self.call_stack.pop();
        self.pop_scope();
        result
    }

    fn run_call(&mut self,
                function: &FunctionDef,
                values: Vec<Value>,
                line: usize)
                -> EvalResult<Value> {
        for (param, value) in function.params.iter().zip(values) {
            self.declare(param, value, line)?;
        }

        self.exec_statements(&function.body);

        let value = std::mem::take(&mut self.signals.return_value);
        // A break or continue with no loop in this frame must not leak into
        // the caller's loops.
        self.signals.returning = false;
        self.signals.breaking = false;
        self.signals.continuing = false;
        Ok(value)
    }
}
