use std::iter::Peekable;

use crate::{
    ast::{ComparisonOperator, Condition, LogicalOperator},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::core::{Nesting, ParseResult, parse_expression},
    },
};

/// Maps a relational token to its operator.
pub(in crate::interpreter::parser) const fn comparison_operator(token: &Token)
                                                                -> Option<ComparisonOperator> {
    match token {
        Token::Less => Some(ComparisonOperator::Less),
        Token::Greater => Some(ComparisonOperator::Greater),
        Token::LessEqual => Some(ComparisonOperator::LessEqual),
        Token::GreaterEqual => Some(ComparisonOperator::GreaterEqual),
        Token::EqualEqual => Some(ComparisonOperator::Equal),
        Token::BangEqual => Some(ComparisonOperator::NotEqual),
        _ => None,
    }
}

/// Tokens that can only continue an arithmetic expression or comparison.
const fn continues_expression(token: &Token) -> bool {
    matches!(token, Token::Plus | Token::Minus | Token::Star | Token::Slash)
    || comparison_operator(token).is_some()
}

/// Parses a condition.
///
/// Precedence from loosest to tightest: `or`, `and`, `not`, comparison.
///
/// Grammar:
/// ```text
///     condition  := and ("or" and)*
///     and        := not ("and" not)*
///     not        := "not" not | comparison
///     comparison := "(" condition ")" | expression (relop expression)?
/// ```
///
/// # Errors
/// `ChainedComparison` for `a < b < c`, or any error of the operands.
pub fn parse_condition<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Condition>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut nesting = nesting;
    let mut left = parse_and(tokens, nesting)?;
    while let Some(lexeme) = tokens.next_if(|lexeme| lexeme.token == Token::Or) {
        nesting = nesting.enter(lexeme.line)?;
        let right = parse_and(tokens, nesting)?;
        left = Condition::LogicalOp { op:    LogicalOperator::Or,
                                      left:  Box::new(left),
                                      right: Box::new(right),
                                      line:  lexeme.line, };
    }
    Ok(left)
}

fn parse_and<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Condition>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut nesting = nesting;
    let mut left = parse_not(tokens, nesting)?;
    while let Some(lexeme) = tokens.next_if(|lexeme| lexeme.token == Token::And) {
        nesting = nesting.enter(lexeme.line)?;
        let right = parse_not(tokens, nesting)?;
        left = Condition::LogicalOp { op:    LogicalOperator::And,
                                      left:  Box::new(left),
                                      right: Box::new(right),
                                      line:  lexeme.line, };
    }
    Ok(left)
}

fn parse_not<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Condition>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    if let Some(lexeme) = tokens.next_if(|lexeme| lexeme.token == Token::Not) {
        let operand = parse_not(tokens, nesting.enter(lexeme.line)?)?;
        return Ok(Condition::Not { operand: Box::new(operand),
                                   line:    lexeme.line, });
    }
    parse_comparison(tokens, nesting)
}

fn parse_comparison<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Condition>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    if let Some(grouped) = parse_grouped(tokens, nesting)? {
        return Ok(grouped);
    }

    let line = tokens.peek().map_or(0, |lexeme| lexeme.line);
    let left = parse_expression(tokens, nesting)?;

    let Some(op) = tokens.peek().and_then(|lexeme| comparison_operator(&lexeme.token)) else {
        return Ok(Condition::CondExpr { expr: left, line });
    };
    tokens.next();
    let right = parse_expression(tokens, nesting)?;

    if let Some(extra) = tokens.peek()
       && comparison_operator(&extra.token).is_some()
    {
        return Err(ParseError::ChainedComparison { line: extra.line });
    }

    Ok(Condition::Compare { op,
                            left,
                            right,
                            line })
}

/// Tries to read `( condition )` as a grouped condition.
///
/// A parenthesis may also open an arithmetic expression such as
/// `(a + b) > c`. The attempt runs on a copy of the stream and is only kept
/// when the closing parenthesis is not followed by an operator; otherwise the
/// stream is left untouched and `Ok(None)` is returned.
fn parse_grouped<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Option<Condition>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut attempt = tokens.clone();
    let Some(open) = attempt.next_if(|lexeme| lexeme.token == Token::LParen) else {
        return Ok(None);
    };

    let inner = match parse_condition(&mut attempt, nesting.enter(open.line)?) {
        Ok(inner) => inner,
        Err(error @ (ParseError::ChainedComparison { .. } | ParseError::NestingTooDeep { .. })) => {
            return Err(error);
        },
        Err(_) => return Ok(None),
    };
    if attempt.next_if(|lexeme| lexeme.token == Token::RParen).is_none()
       || attempt.peek().is_some_and(|lexeme| continues_expression(&lexeme.token))
    {
        return Ok(None);
    }

    *tokens = attempt;
    Ok(Some(Condition::GroupedCondition { inner: Box::new(inner),
                                          line:  open.line, }))
}
