use std::iter::Peekable;

use crate::{
    ast::{Expr, Number, UnaryOperator},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{Nesting, ParseResult, parse_expression},
            utils::{expect, parse_comma_separated, unexpected, unexpected_token},
        },
    },
};

/// Parses prefix `+` and `-`.
///
/// The rule is: `unary := ("+" | "-") unary | primary`
///
/// Note that `-` directly followed by digits never reaches this rule; the
/// tokenizer already folded it into a negative literal.
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let op = match tokens.peek().copied().map(|lexeme| &lexeme.token) {
        Some(Token::Minus) => UnaryOperator::Negate,
        Some(Token::Plus) => UnaryOperator::Plus,
        _ => return parse_primary(tokens, nesting),
    };
    let line = tokens.next().map_or(0, |lexeme| lexeme.line);
    let operand = parse_unary(tokens, nesting.enter(line)?)?;

    Ok(Expr::UnaryOp { op,
                       operand: Box::new(operand),
                       line })
}

/// Parses literals, variable references, calls and parenthesised
/// expressions.
///
/// Parentheses and argument lists are one nesting level deeper than the
/// expression around them.
///
/// # Errors
/// `ReservedWord` for a keyword in expression position, `NestingTooDeep`
/// past the ceiling, otherwise the usual unexpected-token errors.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(lexeme) = tokens.peek().copied() else {
        return Err(unexpected(tokens, "an expression"));
    };
    let line = lexeme.line;

    let expr = match &lexeme.token {
        Token::Integer(value) => Expr::NumberLiteral { value: Number::Integer(*value),
                                                       line },
        Token::Float(value) => Expr::NumberLiteral { value: Number::Real(*value),
                                                     line },
        Token::Str(value) => Expr::StringLiteral { value: value.clone(),
                                                   line },
        Token::True => Expr::BooleanLiteral { value: true,
                                              line },
        Token::False => Expr::BooleanLiteral { value: false,
                                               line },
        Token::Identifier(name) => {
            tokens.next();
            if tokens.next_if(|lexeme| lexeme.token == Token::LParen).is_some() {
                let inner = nesting.enter(line)?;
                let arguments = parse_comma_separated(tokens,
                                                      |tokens| parse_expression(tokens, inner),
                                                      &Token::RParen)?;
                return Ok(Expr::Call { name: name.clone(),
                                       arguments,
                                       line });
            }
            return Ok(Expr::VarRef { name: name.clone(),
                                     line });
        },
        Token::LParen => {
            tokens.next();
            let inner = parse_expression(tokens, nesting.enter(line)?)?;
            expect(tokens, &Token::RParen, "')' to close the expression")?;
            return Ok(inner);
        },
        _ => return Err(unexpected_token(lexeme, "an expression")),
    };

    tokens.next();
    Ok(expr)
}
