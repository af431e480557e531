use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{Nesting, ParseResult},
            statement::parse_statement,
            utils::expect,
        },
    },
};

/// Parses statements until `end` or the end of input.
///
/// Errors do not escape this function. Each failing statement is pushed onto
/// `diagnostics` and the parser resynchronises at the next statement
/// boundary, so the rest of the list is still checked. Input nested past the
/// ceiling is the exception: the rest of the stream is discarded.
pub fn parse_statement_list<'a, I>(tokens: &mut Peekable<I>,
                                   diagnostics: &mut Vec<ParseError>,
                                   nesting: Nesting)
                                   -> Vec<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut statements = Vec::new();

    while let Some(first) = tokens.peek().copied() {
        if first.token == Token::End {
            break;
        }
        match parse_statement(tokens, diagnostics, nesting) {
            Ok(statement) => statements.push(statement),
            Err(error @ ParseError::NestingTooDeep { .. }) => {
                log::debug!("giving up: {error}");
                diagnostics.push(error);
                tokens.by_ref().for_each(drop);
            },
            Err(error) => {
                log::debug!("recovering from: {error}");
                diagnostics.push(error);
                synchronize(tokens, first.position);
            },
        }
    }

    statements
}

/// Skips to the next statement boundary after an error.
///
/// Stops after a `;`, or in front of `end` or a keyword that starts a
/// statement. At least one token is consumed when the failing statement
/// consumed nothing, so recovery always makes progress.
fn synchronize<'a, I>(tokens: &mut Peekable<I>, start: usize)
    where I: Iterator<Item = &'a Lexeme>
{
    if let Some(stuck) = tokens.next_if(|lexeme| lexeme.position == start)
       && stuck.token == Token::Semicolon
    {
        return;
    }

    while let Some(lexeme) = tokens.peek().copied() {
        match &lexeme.token {
            Token::Semicolon => {
                tokens.next();
                return;
            },
            token if *token == Token::End || token.starts_statement() => return,
            _ => {
                tokens.next();
            },
        }
    }
}

/// Parses a statement body.
///
/// Grammar: `block := "begin" statement* "end" | statement`
///
/// # Errors
/// A missing `end`, or the error of the single statement.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>,
                          diagnostics: &mut Vec<ParseError>,
                          nesting: Nesting)
                          -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    if tokens.next_if(|lexeme| lexeme.token == Token::Begin).is_some() {
        let body = parse_statement_list(tokens, diagnostics, nesting);
        expect(tokens, &Token::End, "'end' to close the block")?;
        return Ok(body);
    }

    Ok(vec![parse_statement(tokens, diagnostics, nesting)?])
}
