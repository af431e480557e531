use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Opens a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Closes the innermost scope. The global scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Runs `body` inside a fresh scope that is closed afterwards, whatever
    /// `body` returns.
    pub fn scoped<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        self.push_scope();
        let result = body(self);
        self.pop_scope();
        result
    }

    /// Resolves a name, innermost scope first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    /// Returns `true` if the innermost scope binds `name`.
    #[must_use]
    pub fn is_declared_locally(&self, name: &str) -> bool {
        self.scope_stack
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }

    /// Binds a new name in the innermost scope.
    ///
    /// Shadowing a name from an outer scope is allowed.
    ///
    /// # Errors
    /// `Redeclaration` if the innermost scope already binds `name`.
    pub fn declare(&mut self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        if self.is_declared_locally(name) {
            return Err(RuntimeError::Redeclaration { name: name.to_string(),
                                                     line });
        }
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Rebinds the innermost visible binding of `name`.
    ///
    /// # Errors
    /// `UnknownVariable` if no scope binds `name`.
    pub fn update(&mut self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        match self.scope_stack
                  .iter_mut()
                  .rev()
                  .find_map(|scope| scope.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                Ok(())
            },
            None => Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                        line }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scopes_shadow_and_then_disappear() {
        let mut context = Context::new();
        context.declare("x", Value::Integer(1), 1).unwrap();

        context.scoped(|ctx| {
                   ctx.declare("x", Value::Integer(2), 2).unwrap();
                   assert_eq!(ctx.lookup("x"), Some(&Value::Integer(2)));
               });

        assert_eq!(context.lookup("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn redeclaring_in_the_same_scope_fails() {
        let mut context = Context::new();
        context.declare("x", Value::Integer(1), 1).unwrap();

        assert_eq!(context.declare("x", Value::Integer(2), 3),
                   Err(RuntimeError::Redeclaration { name: "x".to_string(),
                                                     line: 3, }));
    }

    #[test]
    fn update_writes_through_to_the_outer_binding() {
        let mut context = Context::new();
        context.declare("total", Value::Integer(0), 1).unwrap();

        context.scoped(|ctx| ctx.update("total", Value::Integer(9), 2).unwrap());

        assert_eq!(context.lookup("total"), Some(&Value::Integer(9)));
        assert!(context.update("missing", Value::Absent, 4).is_err());
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut context = Context::new();
        context.pop_scope();
        context.pop_scope();
        assert_eq!(context.scope_stack.len(), 1);
    }
}
