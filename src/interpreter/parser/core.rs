use std::iter::Peekable;

use crate::{
    ast::{Expr, Program},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            binary::parse_additive,
            block::parse_statement_list,
            utils::{expect, next_is, unexpected_token},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Default ceiling on how deeply constructs may nest.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// How deeply the rule being parsed sits inside other constructs.
///
/// Every parenthesis, prefix operator, chained binary operator and compound
/// statement adds a level. The parser and the evaluator both recurse once per
/// level, so the ceiling bounds their stack use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nesting {
    depth: usize,
    limit: usize,
}

impl Nesting {
    /// The outermost level, allowing `limit` levels below it.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    /// Enters one more level.
    ///
    /// # Errors
    /// `NestingTooDeep` once the ceiling is passed.
    pub const fn enter(self, line: usize) -> ParseResult<Self> {
        if self.depth >= self.limit {
            return Err(ParseError::NestingTooDeep { limit: self.limit,
                                                    line });
        }
        Ok(Self { depth: self.depth + 1,
                  limit: self.limit, })
    }
}

/// The result of parsing a token sequence.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// The syntax tree, present only when no syntax error was found.
    pub program:     Option<Program>,
    /// Every syntax error, in the order it was found.
    pub diagnostics: Vec<ParseError>,
}

/// Parses a complete token sequence into a [`Program`].
///
/// Parsing never stops at the first error. A statement that fails to parse
/// is recorded and skipped, so one run reports every independent mistake.
///
/// ## Example
/// ```
/// use plainscript::interpreter::{lexer::tokenize, parser::parse};
///
/// let outcome = parse(&tokenize("let x = 1; print(x);").lexemes);
/// assert!(outcome.diagnostics.is_empty());
/// assert_eq!(outcome.program.map(|p| p.statements.len()), Some(2));
///
/// let outcome = parse(&tokenize("let = 1; print(;").lexemes);
/// assert_eq!(outcome.diagnostics.len(), 2);
/// assert!(outcome.program.is_none());
/// ```
#[must_use]
pub fn parse(lexemes: &[Lexeme]) -> ParseOutcome {
    parse_with_limit(lexemes, DEFAULT_MAX_NESTING_DEPTH)
}

/// Parses like [`parse`], allowing at most `max_nesting_depth` levels of
/// nesting.
///
/// Input that nests deeper is rejected with a single `NestingTooDeep`
/// diagnostic; nothing after it is parsed.
///
/// ## Example
/// ```
/// use plainscript::{
///     error::ParseError,
///     interpreter::{lexer::tokenize, parser::parse_with_limit},
/// };
///
/// let outcome = parse_with_limit(&tokenize("print(((1)));").lexemes, 2);
/// assert_eq!(outcome.diagnostics,
///            [ParseError::NestingTooDeep { limit: 2,
///                                          line:  1, }]);
/// ```
#[must_use]
pub fn parse_with_limit(lexemes: &[Lexeme], max_nesting_depth: usize) -> ParseOutcome {
    let mut tokens = lexemes.iter().peekable();
    let mut diagnostics = Vec::new();
    let program = parse_program(&mut tokens, &mut diagnostics, Nesting::new(max_nesting_depth));

    // Everything reported after the ceiling was hit is fallout from the
    // abandoned input.
    if let Some(index) = diagnostics.iter()
                                    .position(|e| matches!(e, ParseError::NestingTooDeep { .. }))
    {
        diagnostics.truncate(index + 1);
    }

    // End-of-input errors are raised without a token to take the line from.
    let last_line = lexemes.last().map_or(1, |lexeme| lexeme.line);
    for error in &mut diagnostics {
        if let ParseError::UnexpectedEndOfInput { line, .. } = error {
            *line = last_line;
        }
    }

    log::debug!("parsed {} top-level statements with {} syntax errors",
                program.statements.len(),
                diagnostics.len());

    ParseOutcome { program: diagnostics.is_empty().then_some(program),
                   diagnostics }
}

/// Parses the program rule.
///
/// Grammar: `program := "begin" statement* "end" | statement*`
///
/// A stray `end` in an unwrapped program is reported and parsing carries on
/// after it.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>,
                            diagnostics: &mut Vec<ParseError>,
                            nesting: Nesting)
                            -> Program
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let line = tokens.peek().map_or(1, |lexeme| lexeme.line);
    let wrapped = next_is(tokens, &Token::Begin);
    if wrapped {
        tokens.next();
    }

    let mut statements = parse_statement_list(tokens, diagnostics, nesting);

    if wrapped {
        match expect(tokens, &Token::End, "'end' to close the program") {
            Ok(_) => {
                if let Some(extra) = tokens.peek() {
                    diagnostics.push(ParseError::TrailingTokens { found: extra.token.to_string(),
                                                                  line:  extra.line, });
                }
            },
            Err(error) => diagnostics.push(error),
        }
    } else {
        while let Some(stray) = tokens.next() {
            diagnostics.push(unexpected_token(stray, "a statement"));
            statements.extend(parse_statement_list(tokens, diagnostics, nesting));
        }
    }

    Program { statements,
              wrapped,
              line }
}

/// Parses a full arithmetic expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, addition, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := additive`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_additive(tokens, nesting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{BinaryOperator, Condition, ElsePart, Induction, Number, Statement},
        interpreter::lexer::tokenize,
    };

    fn parse_source(source: &str) -> ParseOutcome {
        parse(&tokenize(source).lexemes)
    }

    fn statements(source: &str) -> Vec<Statement> {
        let outcome = parse_source(source);
        assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
        outcome.program.map(|p| p.statements).unwrap_or_default()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let parsed = statements("print(1 + 2 * 3);");
        let Statement::Print { items, .. } = &parsed[0] else {
            panic!("expected print, got {parsed:?}");
        };
        let Expr::BinaryOp { op, right, .. } = &items[0] else {
            panic!("expected binary op");
        };
        assert_eq!(*op, BinaryOperator::Add);
        assert!(matches!(**right, Expr::BinaryOp { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let parsed = statements("x = 10 - 4 - 3;");
        let Statement::Assign { value: Expr::BinaryOp { left, right, .. }, .. } = &parsed[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(**left, Expr::BinaryOp { op: BinaryOperator::Sub, .. }));
        assert!(matches!(**right,
                         Expr::NumberLiteral { value: Number::Integer(3),
                                               .. }));
    }

    #[test]
    fn program_may_be_wrapped() {
        let outcome = parse_source("begin\nlet x = 1;\nend");
        let program = outcome.program.expect("program");
        assert!(program.wrapped);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn tokens_after_wrapped_program_are_rejected() {
        let outcome = parse_source("begin let x = 1; end print(x);");
        assert!(matches!(outcome.diagnostics.as_slice(),
                         [ParseError::TrailingTokens { .. }]));
    }

    #[test]
    fn missing_end_reports_end_of_input_on_last_line() {
        let outcome = parse_source("begin\nlet x = 1;\nprint(x);");
        assert!(matches!(outcome.diagnostics.as_slice(),
                         [ParseError::UnexpectedEndOfInput { line: 3, .. }]));
    }

    #[test]
    fn recovery_reports_every_bad_statement() {
        let outcome = parse_source("let = 5;\nprint(1);\nlet y 3;\nprint(2)\nlet z = 1;");
        let lines: Vec<_> = outcome.diagnostics.iter().map(ParseError::line).collect();
        assert_eq!(lines, [1, 3, 5]);
    }

    #[test]
    fn keywords_cannot_be_names() {
        let outcome = parse_source("let while = 3;");
        assert!(matches!(outcome.diagnostics.as_slice(),
                         [ParseError::ReservedName { word, line: 1 }] if word == "while"));

        let outcome = parse_source("function then(a) return a;");
        assert!(outcome.diagnostics[0].is_reserved());
    }

    #[test]
    fn chained_comparison_is_an_error() {
        let outcome = parse_source("if 1 < 2 < 3 print(1);");
        assert!(outcome.diagnostics
                       .iter()
                       .any(|e| matches!(e, ParseError::ChainedComparison { .. })));
    }

    #[test]
    fn parenthesised_condition_or_expression() {
        let parsed = statements("if (x > 1) and y print(1);\nif (x + 1) > 2 print(2);");
        let Statement::If { condition, .. } = &parsed[0] else {
            panic!("expected if");
        };
        let Condition::LogicalOp { left, .. } = condition else {
            panic!("expected logical op, got {condition:?}");
        };
        assert!(matches!(**left, Condition::GroupedCondition { .. }));

        let Statement::If { condition, .. } = &parsed[1] else {
            panic!("expected if");
        };
        assert!(matches!(condition, Condition::Compare { left: Expr::BinaryOp { .. }, .. }));
    }

    #[test]
    fn else_if_chains_nest() {
        let parsed = statements("if x > 1 print(1); elseif x > 0 print(2); else print(3);");
        let Statement::If { else_part: Some(else_part), .. } = &parsed[0] else {
            panic!("expected if with else part");
        };
        let ElsePart::ElseIf { else_part: Some(last), .. } = else_part.as_ref() else {
            panic!("expected elseif");
        };
        assert!(matches!(last.as_ref(), ElsePart::Else { .. }));
    }

    #[test]
    fn for_loop_forms() {
        let parsed = statements("for i = 1 to 3 print(i);\n\
                                 for let j = 1; to 9 step 2 begin print(j); end\n\
                                 for let k = 5 to 1 step -1 print(k);");
        let inductions: Vec<_> = parsed.iter()
                                       .filter_map(|s| match s {
                                           Statement::For(f) => Some((f.induction, f.step.is_some())),
                                           _ => None,
                                       })
                                       .collect();
        assert_eq!(inductions,
                   [(Induction::Existing, false),
                    (Induction::Declared, true),
                    (Induction::Declared, true)]);
    }

    #[test]
    fn natural_if_body_runs_to_end() {
        let parsed = statements("begin if x is > 3 then print(1); print(2); end");
        assert_eq!(parsed.len(), 1);
        let Statement::NaturalLangIf { body, .. } = &parsed[0] else {
            panic!("expected natural if");
        };
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn glued_minus_is_a_literal() {
        assert!(!parse_source("let y = x-1;").diagnostics.is_empty());
        assert!(parse_source("let y = x - 1;").diagnostics.is_empty());
        assert!(parse_source("let y = x + -1;").diagnostics.is_empty());
    }

    #[test]
    fn nesting_is_limited() {
        let limited = |source: &str| parse_with_limit(&tokenize(source).lexemes, 16).diagnostics;
        let parens = |n: usize| format!("print({}1{});", "(".repeat(n), ")".repeat(n));

        assert!(limited(&parens(16)).is_empty());

        let cases = [parens(17),
                     format!("print({}1);", "- ".repeat(17)),
                     format!("if {}x print(1);", "not ".repeat(17)),
                     format!("if {}x print(1);", "x or ".repeat(17)),
                     format!("while x {}print(1);", "while x ".repeat(17)),
                     format!("{}end", "if x begin ".repeat(17)),
                     format!("print({}1);", "1 + ".repeat(17))];
        for source in &cases {
            let diagnostics = limited(source);
            assert!(matches!(diagnostics.as_slice(),
                             [ParseError::NestingTooDeep { limit: 16, line: 1 }]),
                    "{source}: {diagnostics:?}");
        }
    }
}
