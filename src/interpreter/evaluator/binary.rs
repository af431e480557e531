/// Dispatch of binary expressions to their handlers.
pub mod core;

/// Arithmetic on integers and reals.
pub mod scalar;

/// Relational and equality comparisons.
pub mod comparison;

/// Conditions: `and`, `or`, `not` and grouped conditions.
pub mod logic;
