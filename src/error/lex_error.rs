use thiserror::Error;

/// Represents all errors that can occur while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("Lexical error on line {line}: Illegal character '{character}' at position {position}.")]
    IllegalCharacter {
        /// The offending character.
        character: char,
        /// The source line where the error occurred.
        line:      usize,
        /// The 1-based column within the line.
        column:    usize,
        /// The absolute byte offset into the source.
        position:  usize,
    },
    /// An integer literal that does not fit into 64 bits.
    #[error("Lexical error on line {line}: Integer literal {literal} is too large.")]
    IntegerTooLarge {
        /// The literal as written.
        literal:  String,
        /// The source line where the error occurred.
        line:     usize,
        /// The 1-based column within the line.
        column:   usize,
        /// The absolute byte offset into the source.
        position: usize,
    },
}

impl LexError {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::IllegalCharacter { line, .. } | Self::IntegerTooLarge { line, .. } => *line,
        }
    }
}
