use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all diagnostics that can be recorded during evaluation.
pub enum RuntimeError {
    /// Tried to use or assign an undeclared variable.
    #[error("Semantic error on line {line}: Variable '{name}' is not defined.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Read a variable whose value is absent (for example the result of a
    /// failed operation).
    #[error("Semantic error on line {line}: Variable '{name}' does not have a value.")]
    NoValue {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Declared a name that already exists in the current scope.
    #[error("Semantic error on line {line}: Variable '{name}' is already declared in the current scope.")]
    Redeclaration {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function that was never defined.
    #[error("Semantic error on line {line}: Function '{name}' is not defined.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operand had a type the operator does not accept.
    #[error("Semantic error on line {line}: Type mismatch: {details}.")]
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An operand was absent.
    #[error("Semantic error on line {line}: Invalid operands for '{operator}'.")]
    InvalidOperands {
        /// The operator, as written in source.
        operator: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Attempted division by zero.
    #[error("Semantic error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    #[error("Semantic error on line {line}: Integer overflow while computing '{operator}'.")]
    Overflow {
        /// The operator that overflowed, as written in source.
        operator: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Semantic error on line {line}: Function '{name}' expects {expected} arguments, got {found}.")]
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// `break` executed with no enclosing loop.
    #[error("Semantic error on line {line}: Break statement outside of loop.")]
    BreakOutsideLoop {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `continue` executed with no enclosing loop.
    #[error("Semantic error on line {line}: Continue statement outside of loop.")]
    ContinueOutsideLoop {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `while` loop ran into the iteration ceiling.
    #[error("Semantic error on line {line}: Maximum iterations ({limit}) exceeded in while loop.")]
    IterationLimit {
        /// The configured ceiling.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Too many nested function calls.
    #[error("Semantic error on line {line}: Maximum call depth ({limit}) exceeded while calling '{name}'.")]
    CallDepthExceeded {
        /// The function being called.
        name:  String,
        /// The configured ceiling.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A `for` loop bound or step is not a number.
    #[error("Semantic error on line {line}: Invalid loop bounds: {details}.")]
    InvalidLoopBounds {
        /// Details describing why the bounds are invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl RuntimeError {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::NoValue { line, .. }
            | Self::Redeclaration { line, .. }
            | Self::UnknownFunction { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::InvalidOperands { line, .. }
            | Self::DivisionByZero { line }
            | Self::Overflow { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::BreakOutsideLoop { line }
            | Self::ContinueOutsideLoop { line }
            | Self::IterationLimit { line, .. }
            | Self::CallDepthExceeded { line, .. }
            | Self::InvalidLoopBounds { line, .. } => *line,
        }
    }

    /// Returns `true` when the error stops the whole program.
    ///
    /// Binding failures leave the program in a state where later statements
    /// would only produce follow-up noise, so they raise the halting signal.
    /// Everything else yields an absent value and evaluation carries on.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self,
                 Self::UnknownVariable { .. }
                 | Self::Redeclaration { .. }
                 | Self::UnknownFunction { .. }
                 | Self::CallDepthExceeded { .. })
    }
}
