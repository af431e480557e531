/// Core parsing entry points.
///
/// Contains the top-level `parse` function, the program rule and the
/// expression entry point shared by every other parser module.
pub mod core;

/// Statement lists and blocks.
///
/// Owns error recovery: a failing statement is recorded and the parser skips
/// ahead to the next statement boundary.
pub mod block;

/// Conventional statements such as `let`, `print`, `if`, `for` and `while`.
pub mod statement;

/// Natural-language statements (`set`, `add`, `sub`, `mult`, `div` and
/// `if ... is ... then`).
pub mod natural;

/// Conditions: comparisons, `and`, `or`, `not` and grouping.
pub mod condition;

/// Binary arithmetic operators.
pub mod binary;

/// Unary operators and primary expressions.
pub mod unary;

/// Utility functions for the parser.
///
/// Token matching helpers, identifier parsing with the reserved-word guard and
/// comma-separated lists.
pub mod utils;

pub use self::core::{
    DEFAULT_MAX_NESTING_DEPTH, Nesting, ParseOutcome, ParseResult, parse, parse_expression,
    parse_with_limit,
};
