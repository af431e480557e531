use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::core::ParseResult,
    },
};

/// Returns `true` if the next token equals `token`, without consuming it.
pub(in crate::interpreter::parser) fn next_is<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a Lexeme>
{
    tokens.peek().is_some_and(|lexeme| lexeme.token == *token)
}

/// Looks `n` tokens past the next one without consuming anything.
pub(in crate::interpreter::parser) fn peek_nth<'a, I>(tokens: &Peekable<I>, n: usize) -> Option<&'a Lexeme>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    tokens.clone().nth(n)
}

/// Consumes the next token if it equals `token`.
///
/// # Errors
/// The error produced by [`unexpected`] when the next token is anything
/// else, including the end of input.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    token: &Token,
                                                    expected: &str)
                                                    -> ParseResult<&'a Lexeme>
    where I: Iterator<Item = &'a Lexeme>
{
    match tokens.next_if(|lexeme| lexeme.token == *token) {
        Some(lexeme) => Ok(lexeme),
        None => Err(unexpected(tokens, expected)),
    }
}

/// Builds the error for whatever comes next in the stream.
pub(in crate::interpreter::parser) fn unexpected<'a, I>(tokens: &mut Peekable<I>,
                                                        expected: &str)
                                                        -> ParseError
    where I: Iterator<Item = &'a Lexeme>
{
    match tokens.peek() {
        Some(lexeme) => unexpected_token(lexeme, expected),
        None => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                   line:     0, },
    }
}

/// Builds the error for a token the grammar does not allow here.
///
/// A misplaced keyword gets the reserved-word message instead of the generic
/// one.
pub(in crate::interpreter::parser) fn unexpected_token(lexeme: &Lexeme, expected: &str) -> ParseError {
    if lexeme.token.is_keyword() {
        ParseError::ReservedWord { word: lexeme.token.to_string(),
                                   line: lexeme.line, }
    } else {
        ParseError::UnexpectedToken { found:    lexeme.token.to_string(),
                                      kind:     lexeme.token.kind(),
                                      expected: expected.to_string(),
                                      line:     lexeme.line, }
    }
}

/// Parses a plain identifier and returns its name.
///
/// `role` names what the identifier is for and shows up in the error message.
///
/// # Errors
/// - `ReservedName` if the next token is a keyword.
/// - `UnexpectedToken` / `UnexpectedEndOfInput` otherwise.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              role: &str)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a Lexeme>
{
    let Some(lexeme) = tokens.peek().copied() else {
        return Err(unexpected(tokens, role));
    };

    match &lexeme.token {
        Token::Identifier(name) => {
            tokens.next();
            Ok(name.clone())
        },
        token if token.is_keyword() => {
            // The keyword stands where a name belongs; recovery resumes after it.
            tokens.next();
            Err(ParseError::ReservedName { word: token.to_string(),
                                           line: lexeme.line, })
        },
        _ => Err(unexpected_token(lexeme, role)),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by call arguments, `print` items and parameter
/// lists. An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut items = Vec::new();
    if tokens.next_if(|lexeme| lexeme.token == *closing).is_some() {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        if tokens.next_if(|lexeme| lexeme.token == Token::Comma).is_some() {
            continue;
        }
        expect(tokens, closing, &format!("',' or '{closing}'"))?;
        return Ok(items);
    }
}
