/// The evaluator module executes a parsed program.
///
/// The evaluator walks the syntax tree statement by statement, manages the
/// scope stack and the function table, and collects printed lines and
/// semantic diagnostics. It never stops at the first problem: each failure
/// is recorded against its source line and evaluation carries on.
///
/// # Responsibilities
/// - Evaluates statements, expressions and conditions.
/// - Handles variables, functions, loops and the control-flow signals.
/// - Records semantic diagnostics such as undeclared names or division by
///   zero.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each carrying its line, column and absolute position. Keywords of
/// both the conventional and the natural-language syntax are recognised here.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source location.
/// - Handles numeric and string literals, identifiers, operators and comments.
/// - Reports illegal characters and resumes right after each one.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser is a hand-written recursive descent parser with statement level
/// error recovery, so a single run reports every independent syntax error.
///
/// # Responsibilities
/// - Converts tokens into statements, expressions and conditions.
/// - Rejects reserved words used as names.
/// - Resynchronises after an error at the next statement boundary.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// Values are integers, reals, text, booleans and the absent value produced
/// by failed operations.
pub mod value;
