use std::iter::Peekable;

use crate::{
    ast::{ElsePart, ForLoop, FunctionDef, Induction, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            block::parse_block,
            condition::parse_condition,
            core::{Nesting, ParseResult, parse_expression},
            natural::{is_natural_if, natural_operator, parse_natural_if, parse_natural_op},
            utils::{
                expect, next_is, parse_comma_separated, parse_identifier, peek_nth, unexpected,
            },
        },
    },
};

/// Parses a single statement, dispatching on its first token.
///
/// An identifier followed by `=` is an assignment; anything that does not
/// start with a statement keyword is an expression statement. Compound
/// statements parse their parts one nesting level deeper.
///
/// # Errors
/// Propagates the first syntax error inside the statement.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>,
                              diagnostics: &mut Vec<ParseError>,
                              nesting: Nesting)
                              -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(lexeme) = tokens.peek().copied() else {
        return Err(unexpected(tokens, "a statement"));
    };
    let line = lexeme.line;

    if let Some(op) = natural_operator(&lexeme.token) {
        tokens.next();
        return parse_natural_op(tokens, nesting, op, line);
    }

    match &lexeme.token {
        Token::Let => {
            tokens.next();
            parse_declaration(tokens, nesting, line)
        },
        Token::Print => {
            tokens.next();
            parse_print(tokens, nesting, line)
        },
        Token::If if is_natural_if(tokens) => {
            tokens.next();
            parse_natural_if(tokens, diagnostics, nesting.enter(line)?, line)
        },
        Token::If => {
            tokens.next();
            parse_if(tokens, diagnostics, nesting.enter(line)?, line)
        },
        Token::For => {
            tokens.next();
            parse_for(tokens, diagnostics, nesting.enter(line)?, line)
        },
        Token::While => {
            tokens.next();
            let nesting = nesting.enter(line)?;
            let condition = parse_condition(tokens, nesting)?;
            let body = parse_block(tokens, diagnostics, nesting)?;
            Ok(Statement::While { condition,
                                  body,
                                  line })
        },
        Token::Function => {
            tokens.next();
            parse_function(tokens, diagnostics, nesting.enter(line)?, line)
        },
        Token::Return => {
            tokens.next();
            let value = if next_is(tokens, &Token::Semicolon) {
                None
            } else {
                Some(parse_expression(tokens, nesting)?)
            };
            expect(tokens, &Token::Semicolon, "';' after the return value")?;
            Ok(Statement::Return { value, line })
        },
        Token::Break => {
            tokens.next();
            expect(tokens, &Token::Semicolon, "';' after 'break'")?;
            Ok(Statement::Break { line })
        },
        Token::Continue => {
            tokens.next();
            expect(tokens, &Token::Semicolon, "';' after 'continue'")?;
            Ok(Statement::Continue { line })
        },
        Token::Identifier(name)
            if peek_nth(tokens, 1).is_some_and(|next| next.token == Token::Assign) =>
        {
            tokens.next();
            tokens.next();
            let value = parse_expression(tokens, nesting)?;
            expect(tokens, &Token::Semicolon, "';' after the assignment")?;
            Ok(Statement::Assign { name: name.clone(),
                                   value,
                                   line })
        },
        _ => {
            let expr = parse_expression(tokens, nesting)?;
            expect(tokens, &Token::Semicolon, "';' after the expression")?;
            Ok(Statement::Expression { expr, line })
        },
    }
}

/// Parses `let NAME = expr;` after the `let` keyword.
fn parse_declaration<'a, I>(tokens: &mut Peekable<I>,
                            nesting: Nesting,
                            line: usize)
                            -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let name = parse_identifier(tokens, "a variable name after 'let'")?;
    expect(tokens, &Token::Assign, "'=' after the variable name")?;
    let value = parse_expression(tokens, nesting)?;
    expect(tokens, &Token::Semicolon, "';' after the declaration")?;

    Ok(Statement::Declare { name, value, line })
}

/// Parses `print(expr, ...);` after the `print` keyword. At least one item is
/// required.
fn parse_print<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    expect(tokens, &Token::LParen, "'(' after 'print'")?;
    if next_is(tokens, &Token::RParen) {
        return Err(unexpected(tokens, "a value to print"));
    }
    let items = parse_comma_separated(tokens,
                                      |tokens| parse_expression(tokens, nesting),
                                      &Token::RParen)?;
    expect(tokens, &Token::Semicolon, "';' after the print statement")?;

    Ok(Statement::Print { items, line })
}

/// Parses a conventional `if` statement after the `if` keyword.
///
/// Syntax:
/// ```text
///     if <condition> <block>
///     elseif <condition> <block>
///     else <block>
/// ```
fn parse_if<'a, I>(tokens: &mut Peekable<I>,
                   diagnostics: &mut Vec<ParseError>,
                   nesting: Nesting,
                   line: usize)
                   -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let condition = parse_condition(tokens, nesting)?;
    let then_branch = parse_block(tokens, diagnostics, nesting)?;
    let else_part = parse_else_part(tokens, diagnostics, nesting)?;

    Ok(Statement::If { condition,
                       then_branch,
                       else_part,
                       line })
}

/// Parses the `elseif` / `else` tail of an `if`. Every `elseif` nests the
/// rest of the chain one level deeper.
fn parse_else_part<'a, I>(tokens: &mut Peekable<I>,
                          diagnostics: &mut Vec<ParseError>,
                          nesting: Nesting)
                          -> ParseResult<Option<Box<ElsePart>>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(lexeme) = tokens.peek().copied() else {
        return Ok(None);
    };
    let line = lexeme.line;

    let else_part = match lexeme.token {
        Token::Else => {
            tokens.next();
            ElsePart::Else { body: parse_block(tokens, diagnostics, nesting)?,
                             line }
        },
        Token::ElseIf => {
            tokens.next();
            let nesting = nesting.enter(line)?;
            let condition = parse_condition(tokens, nesting)?;
            let body = parse_block(tokens, diagnostics, nesting)?;
            let else_part = parse_else_part(tokens, diagnostics, nesting)?;
            ElsePart::ElseIf { condition,
                               body,
                               else_part,
                               line }
        },
        _ => return Ok(None),
    };

    Ok(Some(Box::new(else_part)))
}

/// Parses a counted loop after the `for` keyword.
///
/// Syntax:
/// ```text
///     for i = <start> to <end> [step <step>] <block>
///     for let i = <start>[;] to <end> [step <step>] <block>
/// ```
fn parse_for<'a, I>(tokens: &mut Peekable<I>,
                    diagnostics: &mut Vec<ParseError>,
                    nesting: Nesting,
                    line: usize)
                    -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let induction = if tokens.next_if(|lexeme| lexeme.token == Token::Let).is_some() {
        Induction::Declared
    } else {
        Induction::Existing
    };
    let var = parse_identifier(tokens, "a loop variable name")?;
    expect(tokens, &Token::Assign, "'=' after the loop variable")?;
    let start = parse_expression(tokens, nesting)?;

    if induction == Induction::Declared {
        tokens.next_if(|lexeme| lexeme.token == Token::Semicolon);
    }

    expect(tokens, &Token::To, "'to' after the start value")?;
    let end = parse_expression(tokens, nesting)?;
    let step = if tokens.next_if(|lexeme| lexeme.token == Token::Step).is_some() {
        Some(parse_expression(tokens, nesting)?)
    } else {
        None
    };
    let body = parse_block(tokens, diagnostics, nesting)?;

    Ok(Statement::For(ForLoop { induction,
                                var,
                                start,
                                end,
                                step,
                                body,
                                line }))
}

/// Parses `function NAME(params) <block>` after the `function` keyword.
fn parse_function<'a, I>(tokens: &mut Peekable<I>,
                         diagnostics: &mut Vec<ParseError>,
                         nesting: Nesting,
                         line: usize)
                         -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let name = parse_identifier(tokens, "a function name")?;
    expect(tokens, &Token::LParen, "'(' after the function name")?;
    let params = parse_comma_separated(tokens,
                                       |tokens| parse_identifier(tokens, "a parameter name"),
                                       &Token::RParen)?;
    let body = parse_block(tokens, diagnostics, nesting)?;

    Ok(Statement::FunctionDef(FunctionDef { name,
                                            params,
                                            body,
                                            line }))
}
