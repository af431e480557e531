use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Syntax error on line {line}: Unexpected token '{found}' of type {kind}, expected {expected}.")]
    UnexpectedToken {
        /// The literal text of the token encountered.
        found:    String,
        /// The category name of the token encountered.
        kind:     &'static str,
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Syntax error on line {line}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A keyword was used where a declared or referenced name was required.
    #[error("Syntax error on line {line}: '{word}' is a reserved keyword and cannot be used as a name.")]
    ReservedName {
        /// The reserved word.
        word: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A keyword showed up where the grammar does not allow it.
    #[error("Syntax error on line {line}: '{word}' is a reserved keyword and cannot be used in this context.")]
    ReservedWord {
        /// The reserved word.
        word: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Comparisons are non-associative, so `a < b < c` is rejected.
    #[error("Syntax error on line {line}: Comparison operators cannot be chained.")]
    ChainedComparison {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tokens left over after the closing `end` of a `begin ... end` program.
    #[error("Syntax error on line {line}: Unexpected '{found}' after the end of the program.")]
    TrailingTokens {
        /// The first extra token.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Parentheses, operators or blocks nest deeper than the configured
    /// ceiling. Parsing stops here.
    #[error("Syntax error on line {line}: Nesting exceeds the maximum depth of {limit}.")]
    NestingTooDeep {
        /// The configured ceiling.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ParseError {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::ReservedName { line, .. }
            | Self::ReservedWord { line, .. }
            | Self::ChainedComparison { line }
            | Self::TrailingTokens { line, .. }
            | Self::NestingTooDeep { line, .. } => *line,
        }
    }

    /// Returns `true` for the reserved-word diagnostics.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self, Self::ReservedName { .. } | Self::ReservedWord { .. })
    }
}
