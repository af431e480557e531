/// Lexical errors.
///
/// Raised by the tokenizer for characters that cannot start any token. The
/// tokenizer records them and keeps going, so a single bad character never
/// hides the rest of the program.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree,
/// including the distinguished reserved-word diagnostics.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all diagnostics that can be recorded during evaluation, such as
/// undeclared variables, type mismatches or division by zero.
pub mod runtime_error;

use thiserror::Error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// A diagnostic from any phase of the pipeline.
///
/// The pipeline only ever surfaces the diagnostics of the first phase that
/// failed, but callers can still match on the concrete family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An illegal character found by the tokenizer.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A grammar mismatch found by the parser.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A semantic problem found while evaluating the program.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// The core panicked or could not be started.
    #[error("Compilation failed: {0}")]
    Internal(String),
}

impl CompileError {
    /// The source line the diagnostic points at, if it has one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Lex(e) => Some(e.line()),
            Self::Parse(e) => Some(e.line()),
            Self::Runtime(e) => Some(e.line()),
            Self::Internal(_) => None,
        }
    }
}
