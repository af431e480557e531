/// Core evaluation logic and context management.
///
/// Contains the runtime context, the statement and expression dispatchers,
/// control-flow signals and diagnostic recording.
pub mod core;

/// Scope stack management: declaring, updating and resolving variables.
pub mod scope;

/// `if`/`elseif`/`else` and the natural-language conditional.
pub mod branch;

/// Evaluation of counted `for` loops.
///
/// Manages the induction variable and executes the loop body in its own
/// scope.
pub mod for_loop;

/// Evaluation of `while` loops and the iteration ceiling.
pub mod while_loop;

/// Function evaluation.
///
/// Handles definitions, calls, argument binding and return values.
pub mod function;

/// `return`, `break` and `continue`.
pub mod control;

/// The `print` statement.
pub mod print;

/// Natural-language updates (`set`, `add`, `sub`, `mult`, `div`).
pub mod natural;

/// Unary operator evaluation logic.
pub mod unary;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, comparisons and the logical condition combinators.
pub mod binary;
