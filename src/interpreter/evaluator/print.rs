use crate::{
    ast::Expr,
    interpreter::evaluator::core::{Context, EvalResult},
};

impl Context {
    /// Evaluates `print(...)`.
    ///
    /// Every item is evaluated left to right and the results are joined with
    /// single spaces into one output line. If any item fails nothing is
    /// printed.
    ///
    /// # Example
    /// ```
    /// use plainscript::{
    ///     ast::{Expr, Number},
    ///     interpreter::evaluator::core::Context,
    /// };
    ///
    /// let mut context = Context::new();
    /// context.exec_print(&[Expr::StringLiteral { value: "total".to_string(),
    ///                                            line:  1, },
    ///                      Expr::NumberLiteral { value: Number::Real(4.0),
    ///                                            line:  1, }])
    ///        .unwrap();
    ///
    /// assert_eq!(context.output, ["total 4.0"]);
    /// ```
    ///
    /// # Errors
    /// The first error raised by an item.
    pub fn exec_print(&mut self, items: &[Expr]) -> EvalResult<()> {
        let parts = items.iter()
                         .map(|item| self.eval_expr(item).map(|value| value.to_string()))
                         .collect::<EvalResult<Vec<_>>>()?;

        self.output.push(parts.join(" "));
        Ok(())
    }
}
