use std::iter::Peekable;

use crate::{
    ast::{NaturalOperator, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            block::{parse_block, parse_statement_list},
            condition::comparison_operator,
            core::{Nesting, ParseResult, parse_expression},
            utils::{expect, next_is, parse_identifier, unexpected},
        },
    },
};

/// Maps the verb of a natural-language statement to its operator.
pub(in crate::interpreter::parser) const fn natural_operator(token: &Token)
                                                             -> Option<NaturalOperator> {
    match token {
        Token::Set => Some(NaturalOperator::Set),
        Token::Add => Some(NaturalOperator::Add),
        Token::Sub => Some(NaturalOperator::Sub),
        Token::Mult => Some(NaturalOperator::Mult),
        Token::Div => Some(NaturalOperator::Div),
        _ => None,
    }
}

/// `if NAME is` selects the natural-language form over the conventional one.
pub(in crate::interpreter::parser) fn is_natural_if<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();
    matches!(ahead.next().map(|lexeme| &lexeme.token), Some(Token::Identifier(_)))
    && matches!(ahead.next().map(|lexeme| &lexeme.token), Some(Token::Is))
}

/// Parses a natural-language update after its verb.
///
/// Syntax:
/// ```text
///     set NAME to <expr>;
///     add <expr> to NAME;
///     sub <expr> from NAME;
///     mult NAME by <expr>;
///     div NAME by <expr>;
/// ```
pub(in crate::interpreter::parser) fn parse_natural_op<'a, I>(tokens: &mut Peekable<I>,
                                                              nesting: Nesting,
                                                              op: NaturalOperator,
                                                              line: usize)
                                                              -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let (target, operand) = match op {
        NaturalOperator::Set => {
            let target = parse_identifier(tokens, "a variable name after 'set'")?;
            expect(tokens, &Token::To, "'to' after the variable name")?;
            (target, parse_expression(tokens, nesting)?)
        },
        NaturalOperator::Add => {
            let operand = parse_expression(tokens, nesting)?;
            expect(tokens, &Token::To, "'to' after the added value")?;
            (parse_identifier(tokens, "a variable name after 'to'")?, operand)
        },
        NaturalOperator::Sub => {
            let operand = parse_expression(tokens, nesting)?;
            expect(tokens, &Token::From, "'from' after the subtracted value")?;
            (parse_identifier(tokens, "a variable name after 'from'")?, operand)
        },
        NaturalOperator::Mult | NaturalOperator::Div => {
            let target = parse_identifier(tokens, "a variable name")?;
            expect(tokens, &Token::By, "'by' after the variable name")?;
            (target, parse_expression(tokens, nesting)?)
        },
    };
    expect(tokens, &Token::Semicolon, "';' to end the statement")?;

    Ok(Statement::NaturalLangOp { op,
                                  target,
                                  operand,
                                  line })
}

/// Parses `if NAME is <op> <expr> then ...` after the `if` keyword.
///
/// The body is either an explicit `begin ... end` block or every statement
/// up to the enclosing `end` (or the end of input).
pub(in crate::interpreter::parser) fn parse_natural_if<'a, I>(tokens: &mut Peekable<I>,
                                                              diagnostics: &mut Vec<ParseError>,
                                                              nesting: Nesting,
                                                              line: usize)
                                                              -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let name = parse_identifier(tokens, "a variable name")?;
    expect(tokens, &Token::Is, "'is' after the variable name")?;

    let Some(op) = tokens.peek().and_then(|lexeme| comparison_operator(&lexeme.token)) else {
        return Err(unexpected(tokens, "a comparison operator after 'is'"));
    };
    tokens.next();

    let value = parse_expression(tokens, nesting)?;
    expect(tokens, &Token::Then, "'then' after the compared value")?;

    let body = if next_is(tokens, &Token::Begin) {
        parse_block(tokens, diagnostics, nesting)?
    } else {
        parse_statement_list(tokens, diagnostics, nesting)
    };

    Ok(Statement::NaturalLangIf { name,
                                  op,
                                  value,
                                  body,
                                  line })
}
