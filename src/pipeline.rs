use std::{sync::Arc, thread, time::Duration};

use serde::Serialize;

use crate::{
    ast::Program,
    error::CompileError,
    explain::{self, Explainer, UNCONFIGURED},
    interpreter::{
        evaluator::core::{Context, DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_WHILE_ITERATIONS, Limits},
        lexer::{TokenRecord, tokenize},
        parser::{DEFAULT_MAX_NESTING_DEPTH, parse_with_limit},
    },
};

/// Tunables for one [`Compiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Iterations a single `while` loop may run before it is stopped.
    pub max_while_iterations: usize,
    /// Nested calls allowed before a call is refused.
    pub max_call_depth:       usize,
    /// Levels of nesting the parser accepts before rejecting the program.
    pub max_nesting_depth:    usize,
    /// How long to wait for the explainer once the program has run.
    pub explain_timeout:      Duration,
    /// Stack size of the thread that tokenizes, parses and evaluates.
    pub worker_stack_size:    usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self { max_while_iterations: DEFAULT_MAX_WHILE_ITERATIONS,
               max_call_depth:       DEFAULT_MAX_CALL_DEPTH,
               max_nesting_depth:    DEFAULT_MAX_NESTING_DEPTH,
               explain_timeout:      Duration::from_secs(15),
               worker_stack_size:    256 * 1024 * 1024, }
    }
}

impl CompilerConfig {
    /// The evaluator limits this configuration asks for.
    #[must_use]
    pub const fn limits(&self) -> Limits {
        Limits { max_while_iterations: self.max_while_iterations,
                 max_call_depth:       self.max_call_depth, }
    }
}

/// How far a program got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The program ran without a single diagnostic.
    Success,
    /// The tokenizer found illegal characters; nothing was parsed.
    LexicalError,
    /// The parser found grammar errors; nothing was evaluated.
    SyntaxError,
    /// Evaluation recorded at least one semantic diagnostic.
    SemanticError,
    /// The compiler itself failed.
    InternalError,
}

/// Everything one compile-and-run request produces.
///
/// `output` holds either the printed lines (on success) or the messages of
/// the first phase that failed, never a mix of both.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    /// Every valid token, present even when later phases failed.
    pub tokens:      Vec<TokenRecord>,
    /// The syntax tree, or `null` when parsing was skipped or failed.
    pub parse_tree:  Option<Program>,
    /// The explainer's answer, or a placeholder saying why there is none.
    pub explanation: String,
    /// Printed lines, or diagnostic messages.
    pub output:      Vec<String>,
    /// Which phase, if any, failed.
    pub outcome:     Outcome,
    /// The diagnostics behind `output` when the run failed.
    #[serde(skip)]
    pub diagnostics: Vec<CompileError>,
}

impl CompileResult {
    /// Returns `true` if the program ran without diagnostics.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    fn failed(tokens: Vec<TokenRecord>,
              parse_tree: Option<Program>,
              outcome: Outcome,
              diagnostics: Vec<CompileError>)
              -> Self {
        Self { tokens,
               parse_tree,
               explanation: String::new(),
               output: diagnostics.iter().map(ToString::to_string).collect(),
               outcome,
               diagnostics }
    }

    fn internal(message: String) -> Self {
        log::warn!("compilation failed: {message}");
        Self::failed(Vec::new(),
                     None,
                     Outcome::InternalError,
                     vec![CompileError::Internal(message)])
    }
}

/// Runs source programs through the tokenizer, parser and evaluator.
///
/// Every call to [`Compiler::compile`] starts from a blank slate: no
/// variable, function or control-flow state survives from one program to
/// the next.
#[derive(Clone, Default)]
pub struct Compiler {
    config:    CompilerConfig,
    explainer: Option<Arc<dyn Explainer>>,
}

impl Compiler {
    /// Creates a compiler without an explainer.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        Self { config,
               explainer: None }
    }

    /// Asks `explainer` to describe every compiled program.
    #[must_use]
    pub fn with_explainer(mut self, explainer: Arc<dyn Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    /// Compiles and runs `source`.
    ///
    /// The explainer, if any, works on its own thread while the program
    /// runs. Its answer is awaited for at most `explain_timeout`; a slow or
    /// failing explainer only changes the `explanation` field.
    ///
    /// # Example
    /// ```
    /// use plainscript::pipeline::{Compiler, CompilerConfig, Outcome};
    ///
    /// let compiler = Compiler::new(CompilerConfig::default());
    ///
    /// let result = compiler.compile("let x = 2 + 3 * 4; print(x);");
    /// assert_eq!(result.outcome, Outcome::Success);
    /// assert_eq!(result.output, ["14"]);
    ///
    /// let result = compiler.compile("let x = 1 $ 2;");
    /// assert_eq!(result.outcome, Outcome::LexicalError);
    /// assert!(result.parse_tree.is_none());
    /// ```
    #[must_use]
    pub fn compile(&self, source: &str) -> CompileResult {
        let pending = self.explainer
                          .clone()
                          .map(|explainer| explain::spawn(explainer, source));

        let mut result = self.run_isolated(source);

        result.explanation = match pending {
            None => UNCONFIGURED.to_string(),
            Some(pending) => match pending.wait(self.config.explain_timeout) {
                Ok(text) => text,
                Err(error) => {
                    log::warn!("explanation unavailable: {error}");
                    explain::placeholder(&error)
                },
            },
        };

        result
    }

    /// Runs the core on a worker thread with a large stack, turning a panic
    /// into an internal error.
    fn run_isolated(&self, source: &str) -> CompileResult {
        let config = &self.config;

        thread::scope(|scope| {
            let worker = thread::Builder::new().name("compiler".to_string())
                                               .stack_size(self.config.worker_stack_size)
                                               .spawn_scoped(scope, || run_core(source, config));
            match worker {
                Ok(handle) => handle.join().unwrap_or_else(|_| {
                                                CompileResult::internal("the compiler panicked".to_string())
                                            }),
                Err(error) => {
                    CompileResult::internal(format!("could not start the compiler thread: {error}"))
                },
            }
        })
    }
}

/// Tokenizes, parses and evaluates `source` on the current thread.
///
/// Stops after the first phase that reports diagnostics. The result has an
/// empty `explanation`.
#[must_use]
pub fn run_core(source: &str, config: &CompilerConfig) -> CompileResult {
    let stream = tokenize(source);
    let tokens = stream.lexemes
                       .iter()
                       .map(TokenRecord::from)
                       .collect::<Vec<_>>();

    if !stream.errors.is_empty() {
        let diagnostics = stream.errors.into_iter().map(CompileError::from).collect();
        return CompileResult::failed(tokens, None, Outcome::LexicalError, diagnostics);
    }

    let parsed = parse_with_limit(&stream.lexemes, config.max_nesting_depth);
    let program = match parsed.program {
        Some(program) if parsed.diagnostics.is_empty() => program,
        _ => {
            let diagnostics = parsed.diagnostics.into_iter().map(CompileError::from).collect();
            return CompileResult::failed(tokens, None, Outcome::SyntaxError, diagnostics);
        },
    };

    let mut context = Context::with_limits(config.limits());
    context.run_program(&program);
    let execution = context.finish();

    if execution.diagnostics.is_empty() {
        CompileResult { tokens,
                        parse_tree: Some(program),
                        explanation: String::new(),
                        output: execution.output,
                        outcome: Outcome::Success,
                        diagnostics: Vec::new() }
    } else {
        let diagnostics = execution.diagnostics.into_iter().map(CompileError::from).collect();
        CompileResult::failed(tokens, Some(program), Outcome::SemanticError, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_errors_skip_parsing() {
        let result = run_core("let x = 1 @ 2;", &CompilerConfig::default());
        assert_eq!(result.outcome, Outcome::LexicalError);
        assert!(result.parse_tree.is_none());
        assert_eq!(result.tokens.len(), 6);
        assert_eq!(result.output.len(), 1);
    }

    #[test]
    fn syntax_errors_skip_evaluation() {
        let result = run_core("print(1); let = 2;", &CompilerConfig::default());
        assert_eq!(result.outcome, Outcome::SyntaxError);
        assert!(result.parse_tree.is_none());
        assert!(result.output[0].starts_with("Syntax error on line 1"));
    }

    #[test]
    fn semantic_errors_replace_printed_output() {
        let result = run_core("print(1); print(y);", &CompilerConfig::default());
        assert_eq!(result.outcome, Outcome::SemanticError);
        assert!(result.parse_tree.is_some());
        assert_eq!(result.output,
                   ["Semantic error on line 1: Variable 'y' is not defined."]);
    }

    #[test]
    fn results_serialize_with_camel_case_fields() {
        let result = Compiler::default().compile("print(1);");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["outcome"], "success");
        assert_eq!(json["output"][0], "1");
        assert_eq!(json["tokens"][0]["kind"], "KEYWORD_PRINT");
        assert!(json["parseTree"]["statements"].is_array());
        assert_eq!(json["explanation"], UNCONFIGURED);
        assert!(json.get("diagnostics").is_none());
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let compiler = Compiler::default();
        for depth in [300, 100_000] {
            let source = format!("print({}1{});", "(".repeat(depth), ")".repeat(depth));
            let result = compiler.compile(&source);

            assert_eq!(result.outcome, Outcome::SyntaxError);
            assert_eq!(result.output,
                       ["Syntax error on line 1: Nesting exceeds the maximum depth of 256."]);
        }

        let source = format!("if {}true print(1);", "not ".repeat(400_000));
        assert_eq!(compiler.compile(&source).outcome, Outcome::SyntaxError);

        let config = CompilerConfig { max_nesting_depth: 400,
                                      ..CompilerConfig::default() };
        let source = format!("print({}1{});", "(".repeat(300), ")".repeat(300));
        assert_eq!(Compiler::new(config).compile(&source).output, ["1"]);
    }

    #[test]
    fn custom_limits_reach_the_evaluator() {
        let config = CompilerConfig { max_while_iterations: 3,
                                      ..CompilerConfig::default() };
        let result = Compiler::new(config).compile("let i = 0; while i < 10 begin i = i + 1; end");

        assert_eq!(result.outcome, Outcome::SemanticError);
        assert!(result.output[0].contains("Maximum iterations (3)"));
    }
}
