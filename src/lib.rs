//! # plainscript
//!
//! plainscript is a small teaching language with two surface syntaxes: a
//! conventional one (`let x = x + 1;`) and a natural-language one
//! (`add 1 to x;`). This crate tokenizes, parses and evaluates programs,
//! reporting lexical, syntax and semantic diagnostics against source lines.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::CompileError,
    pipeline::{CompileResult, Compiler},
};

/// Defines the structure of parsed code.
///
/// This module declares the statement, expression and condition types that
/// represent a program as a tree. The tree is built by the parser, walked by
/// the evaluator and serialised for callers that want to display it.
///
/// # Responsibilities
/// - Defines one node type per language construct.
/// - Attaches the source line to every node for error reporting.
pub mod ast;
/// Provides unified error types for every phase.
///
/// This module defines all diagnostics that can be raised while tokenizing,
/// parsing or evaluating code. Their `Display` text is the message shown to
/// users and always names the source line.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Aggregates them into [`error::CompileError`] for the pipeline.
pub mod error;
/// Natural-language explanations of programs.
///
/// The explainer is an optional, possibly slow collaborator. It runs on its
/// own thread with a bounded wait, and its failure never affects the rest of
/// a compile result.
pub mod explain;
/// The lexer, parser, evaluator and runtime values.
///
/// # Responsibilities
/// - Coordinates the core components: lexer, parser, evaluator and values.
/// - Exposes each phase for callers that want to drive them separately.
pub mod interpreter;
/// Sequences the phases for one request and assembles the structured result.
pub mod pipeline;
/// General utilities for safe numeric conversion and text handling.
///
/// # Responsibilities
/// - Convert between `i64` and `f64` without silent data loss.
/// - Format reals for program output.
/// - Decode escape sequences in string literals and transported source.
pub mod util;

/// Compiles and runs `source` with the default configuration and no
/// explainer.
///
/// # Example
/// ```
/// use plainscript::compile;
///
/// let result = compile("let x = 10; div x by 4; print(x);");
/// assert!(result.is_success());
/// assert_eq!(result.output, ["2.5"]);
/// ```
#[must_use]
pub fn compile(source: &str) -> CompileResult {
    Compiler::default().compile(source)
}

/// Runs `source` and returns its printed lines.
///
/// This is the convenient entry point when only the program's behaviour
/// matters: tokens, the syntax tree and the explanation are dropped.
///
/// # Errors
/// Returns the diagnostics of the first phase that failed.
///
/// # Examples
/// ```
/// use plainscript::run;
///
/// let output = run("for let i = 1 to 3 print(i);").unwrap();
/// assert_eq!(output, ["1", "2", "3"]);
///
/// // 'y' is not defined.
/// let errors = run("let x = y + 1;").unwrap_err();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].line(), Some(1));
/// ```
pub fn run(source: &str) -> Result<Vec<String>, Vec<CompileError>> {
    let result = compile(source);
    if result.is_success() {
        Ok(result.output)
    } else {
        Err(result.diagnostics)
    }
}
