use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{Nesting, ParseResult},
            unary::parse_unary,
        },
    },
};

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// Each operator deepens the left-leaning tree, so each one counts as a
/// nesting level.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut nesting = nesting;
    let mut left = parse_multiplicative(tokens, nesting)?;
    loop {
        if let Some(lexeme) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&lexeme.token)
           && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
        {
            tokens.next();
            nesting = nesting.enter(lexeme.line)?;
            let right = parse_multiplicative(tokens, nesting)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line: lexeme.line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := unary (("*" | "/") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut nesting = nesting;
    let mut left = parse_unary(tokens, nesting)?;
    loop {
        if let Some(lexeme) = tokens.peek().copied()
           && let Some(op) = token_to_binary_operator(&lexeme.token)
           && matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
        {
            tokens.next();
            nesting = nesting.enter(lexeme.line)?;
            let right = parse_unary(tokens, nesting)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line: lexeme.line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Maps an arithmetic token to its operator.
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        _ => None,
    }
}
