use std::fmt;

use logos::{Lexer, Logos, Skip};
use serde::Serialize;

use crate::{error::LexError, util::text::unescape};

/// Conventional keywords, in the order the language documentation lists them.
pub const KEYWORDS: [&str; 20] = ["begin", "end", "let", "if", "else", "elseif", "for", "while",
                                  "print", "to", "step", "and", "or", "not", "true", "false",
                                  "function", "return", "break", "continue"];

/// Keywords of the natural-language statement forms.
pub const NATURAL_KEYWORDS: [&str; 9] =
    ["set", "add", "sub", "mult", "div", "from", "by", "is", "then"];

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexFault)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Real literal tokens, such as `3.14` or `-0.5`.
    #[regex(r"-?[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42` or `-7`.
    ///
    /// A leading minus directly attached to the digits is part of the
    /// literal, which is why `x-1` does not read as a subtraction.
    #[regex(r"-?[0-9]+", parse_integer)]
    Integer(i64),
    /// Double-quoted string literals with their escapes already decoded.
    #[token("\"", lex_string)]
    Str(String),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `begin`
    #[token("begin")]
    Begin,
    /// `end`
    #[token("end")]
    End,
    /// `let`
    #[token("let")]
    Let,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `elseif`
    #[token("elseif")]
    ElseIf,
    /// `for`
    #[token("for")]
    For,
    /// `while`
    #[token("while")]
    While,
    /// `print`
    #[token("print")]
    Print,
    /// `to`
    #[token("to")]
    To,
    /// `step`
    #[token("step")]
    Step,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `function`
    #[token("function")]
    Function,
    /// `return`
    #[token("return")]
    Return,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,

    /// `set`
    #[token("set")]
    Set,
    /// `add`
    #[token("add")]
    Add,
    /// `sub`
    #[token("sub")]
    Sub,
    /// `mult`
    #[token("mult")]
    Mult,
    /// `div`
    #[token("div")]
    Div,
    /// `from`
    #[token("from")]
    From,
    /// `by`
    #[token("by")]
    By,
    /// `is`
    #[token("is")]
    Is,
    /// `then`
    #[token("then")]
    Then,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `=`
    #[token("=")]
    Assign,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,

    /// `// Comments.`
    #[token("//", skip_line_comment)]
    Comment,
    /// ```
    /// /* Multi line comments. */
    /// ```
    #[token("/*", skip_block_comment)]
    MultiLineComment,
    /// Line breaks only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line      += 1;
        lex.extras.line_start = lex.extras.base + lex.span().end;
        Skip
    })]
    NewLine,
}

impl Token {
    /// The category name reported for the token in token listings and
    /// syntax errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "FLOAT",
            Self::Integer(_) => "INTEGER",
            Self::Str(_) => "STRING",
            Self::Identifier(_) => "IDENTIFIER",
            Self::Begin => "KEYWORD_BEGIN",
            Self::End => "KEYWORD_END",
            Self::Let => "KEYWORD_LET",
            Self::If => "KEYWORD_IF",
            Self::Else => "KEYWORD_ELSE",
            Self::ElseIf => "KEYWORD_ELSEIF",
            Self::For => "KEYWORD_FOR",
            Self::While => "KEYWORD_WHILE",
            Self::Print => "KEYWORD_PRINT",
            Self::To => "KEYWORD_TO",
            Self::Step => "KEYWORD_STEP",
            Self::And => "KEYWORD_AND",
            Self::Or => "KEYWORD_OR",
            Self::Not => "KEYWORD_NOT",
            Self::True => "KEYWORD_TRUE",
            Self::False => "KEYWORD_FALSE",
            Self::Function => "KEYWORD_FUNCTION",
            Self::Return => "KEYWORD_RETURN",
            Self::Break => "KEYWORD_BREAK",
            Self::Continue => "KEYWORD_CONTINUE",
            Self::Set => "SET_KEYWORD_NATURAL_LANG",
            Self::Add => "ADD_KEYWORD_NATURAL_LANG",
            Self::Sub => "SUB_KEYWORD_NATURAL_LANG",
            Self::Mult => "MULT_KEYWORD_NATURAL_LANG",
            Self::Div => "DIV_KEYWORD_NATURAL_LANG",
            Self::From => "FROM_KEYWORD_NATURAL_LANG",
            Self::By => "BY_KEYWORD_NATURAL_LANG",
            Self::Is => "IS_KEYWORD_NATURAL_LANG",
            Self::Then => "THEN_KEYWORD_NATURAL_LANG",
            Self::Plus => "PLUS_OP",
            Self::Minus => "MINUS_OP",
            Self::Star => "TIMES_OP",
            Self::Slash => "DIVIDE_OP",
            Self::Assign => "ASSIGNMENT_OP",
            Self::Less => "LT_OP",
            Self::Greater => "GT_OP",
            Self::LessEqual => "LE_OP",
            Self::GreaterEqual => "GE_OP",
            Self::EqualEqual => "EQ_OP",
            Self::BangEqual => "NE_OP",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::Comment | Self::MultiLineComment => "COMMENT",
            Self::NewLine => "NEWLINE",
        }
    }

    /// Returns `true` for tokens spelled like an identifier but reserved by
    /// the language.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self,
                 Self::Begin
                 | Self::End
                 | Self::Let
                 | Self::If
                 | Self::Else
                 | Self::ElseIf
                 | Self::For
                 | Self::While
                 | Self::Print
                 | Self::To
                 | Self::Step
                 | Self::And
                 | Self::Or
                 | Self::Not
                 | Self::True
                 | Self::False
                 | Self::Function
                 | Self::Return
                 | Self::Break
                 | Self::Continue
                 | Self::Set
                 | Self::Add
                 | Self::Sub
                 | Self::Mult
                 | Self::Div
                 | Self::From
                 | Self::By
                 | Self::Is
                 | Self::Then)
    }

    /// Returns `true` for tokens that can only appear at the start of a
    /// statement. Error recovery stops in front of them.
    #[must_use]
    pub const fn starts_statement(&self) -> bool {
        matches!(self,
                 Self::Let
                 | Self::If
                 | Self::For
                 | Self::While
                 | Self::Print
                 | Self::Function
                 | Self::Return
                 | Self::Break
                 | Self::Continue
                 | Self::Set
                 | Self::Add
                 | Self::Sub
                 | Self::Mult
                 | Self::Div)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Float(value) => return write!(f, "{value:?}"),
            Self::Integer(value) => return write!(f, "{value}"),
            Self::Str(value) | Self::Identifier(value) => return f.write_str(value),
            Self::Begin => "begin",
            Self::End => "end",
            Self::Let => "let",
            Self::If => "if",
            Self::Else => "else",
            Self::ElseIf => "elseif",
            Self::For => "for",
            Self::While => "while",
            Self::Print => "print",
            Self::To => "to",
            Self::Step => "step",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::True => "true",
            Self::False => "false",
            Self::Function => "function",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Set => "set",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mult => "mult",
            Self::Div => "div",
            Self::From => "from",
            Self::By => "by",
            Self::Is => "is",
            Self::Then => "then",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Assign => "=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Comment => "//",
            Self::MultiLineComment => "/*",
            Self::NewLine => "\\n",
        };
        f.write_str(text)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and where it starts so every token can report a
/// line and column. `base` is the absolute offset of the slice the lexer is
/// currently running over; it changes when the tokenizer restarts after an
/// illegal character.
#[derive(Debug, Clone, Copy)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Absolute byte offset of the first character of the current line.
    pub line_start: usize,
    /// Absolute byte offset of the lexer's input slice.
    pub base:       usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0,
               base:       0, }
    }
}

/// The raw failure reported by the generated lexer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LexFault {
    /// No token pattern matches at the current position.
    #[default]
    IllegalCharacter,
    /// An integer literal does not fit into an `i64`.
    IntegerOverflow,
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
///
/// # Errors
/// `LexFault::IntegerOverflow` if the literal is outside the `i64` range.
fn parse_integer(lex: &Lexer<Token>) -> Result<i64, LexFault> {
    lex.slice().parse().map_err(|_| LexFault::IntegerOverflow)
}

/// Scans the body of a string literal after its opening quote.
///
/// Returns `None` for an unterminated literal so that the quote itself is
/// reported as illegal and scanning resumes right after it.
fn lex_string(lex: &mut Lexer<Token>) -> Option<String> {
    let remainder = lex.remainder();
    let mut escaped = false;

    for (index, c) in remainder.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                lex.bump(index + 1);
                return Some(unescape(&remainder[..index]));
            },
            _ => escaped = false,
        }
    }

    None
}

fn skip_line_comment(lex: &mut Lexer<Token>) -> Skip {
    let remainder = lex.remainder();
    lex.bump(remainder.find('\n').unwrap_or(remainder.len()));
    Skip
}

/// Skips a block comment, counting the lines it spans. An unterminated
/// comment runs to the end of the input.
fn skip_block_comment(lex: &mut Lexer<Token>) -> Skip {
    let remainder = lex.remainder();
    let length = remainder.find("*/").map_or(remainder.len(), |end| end + 2);
    let body = &remainder[..length];

    if let Some(last) = body.rfind('\n') {
        lex.extras.line += body.matches('\n').count();
        lex.extras.line_start = lex.extras.base + lex.span().end + last + 1;
    }

    lex.bump(length);
    Skip
}

/// A token together with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token itself.
    pub token:    Token,
    /// 1-based line of the first character.
    pub line:     usize,
    /// 1-based column of the first character.
    pub column:   usize,
    /// Absolute byte offset of the first character.
    pub position: usize,
}

/// One entry of the token listing handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    /// The category name, for example `KEYWORD_LET` or `IDENTIFIER`.
    pub kind:     &'static str,
    /// The literal text of the token.
    pub value:    String,
    /// 1-based line.
    pub line:     usize,
    /// 1-based column.
    pub column:   usize,
    /// Absolute byte offset.
    pub position: usize,
}

impl From<&Lexeme> for TokenRecord {
    fn from(lexeme: &Lexeme) -> Self {
        Self { kind:     lexeme.token.kind(),
               value:    lexeme.token.to_string(),
               line:     lexeme.line,
               column:   lexeme.column,
               position: lexeme.position, }
    }
}

/// Iterator over the lexemes of a source text.
///
/// Illegal characters are yielded as errors. After each one the underlying
/// lexer is restarted exactly one character further, so no valid token is
/// ever swallowed by an error.
pub struct Tokenizer<'src> {
    source: &'src str,
    lexer:  Lexer<'src, Token>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source,
               lexer: Token::lexer_with_extras(source, LexerExtras::default()) }
    }

    fn resume_at(&mut self, offset: usize) {
        let extras = LexerExtras { base: offset,
                                   ..self.lexer.extras };
        self.lexer = Token::lexer_with_extras(&self.source[offset..], extras);
    }

    /// String literals may span lines; keep the counter in step with them.
    fn track_string_lines(&mut self) {
        let slice = self.lexer.slice();
        if let Some(last) = slice.rfind('\n') {
            let start = self.lexer.extras.base + self.lexer.span().start;
            self.lexer.extras.line += slice.matches('\n').count();
            self.lexer.extras.line_start = start + last + 1;
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Lexeme, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.lexer.next()?;
        let extras = self.lexer.extras;
        let position = extras.base + self.lexer.span().start;
        let line = extras.line;
        let column = position - extras.line_start + 1;

        match result {
            Ok(token) => {
                if matches!(token, Token::Str(_)) {
                    self.track_string_lines();
                }
                Some(Ok(Lexeme { token,
                                 line,
                                 column,
                                 position }))
            },
            Err(LexFault::IntegerOverflow) => {
                Some(Err(LexError::IntegerTooLarge { literal: self.lexer.slice().to_string(),
                                                     line,
                                                     column,
                                                     position }))
            },
            Err(LexFault::IllegalCharacter) => {
                let character = self.source[position..].chars().next()?;
                self.resume_at(position + character.len_utf8());
                Some(Err(LexError::IllegalCharacter { character,
                                                      line,
                                                      column,
                                                      position }))
            },
        }
    }
}

/// Everything the tokenizer produced for one source text.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    /// The valid tokens, in source order.
    pub lexemes: Vec<Lexeme>,
    /// The lexical errors, in source order.
    pub errors:  Vec<LexError>,
}

/// Tokenizes a whole source text, collecting valid tokens and errors
/// separately.
///
/// ## Example
/// ```
/// use plainscript::interpreter::lexer::{Token, tokenize};
///
/// let stream = tokenize("let x = 5;");
/// assert!(stream.errors.is_empty());
/// assert_eq!(stream.lexemes[0].token, Token::Let);
/// assert_eq!(stream.lexemes[3].token, Token::Integer(5));
/// ```
#[must_use]
pub fn tokenize(source: &str) -> TokenStream {
    let mut stream = TokenStream::default();

    for item in Tokenizer::new(source) {
        match item {
            Ok(lexeme) => {
                log::trace!("token {} '{}' at {}:{}",
                            lexeme.token.kind(),
                            lexeme.token,
                            lexeme.line,
                            lexeme.column);
                stream.lexemes.push(lexeme);
            },
            Err(error) => {
                log::debug!("{error}");
                stream.errors.push(error);
            },
        }
    }

    log::debug!("tokenized {} tokens with {} errors",
                stream.lexemes.len(),
                stream.errors.len());
    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).lexemes.into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn keywords_win_over_identifiers_only_on_exact_words() {
        assert_eq!(tokens("let letter is island"),
                   vec![Token::Let,
                        Token::Identifier("letter".into()),
                        Token::Is,
                        Token::Identifier("island".into())]);
    }

    #[test]
    fn minus_glues_to_digits() {
        assert_eq!(tokens("x-1"),
                   vec![Token::Identifier("x".into()), Token::Integer(-1)]);
        assert_eq!(tokens("x - 1"),
                   vec![Token::Identifier("x".into()), Token::Minus, Token::Integer(1)]);
        assert_eq!(tokens("-2.5"), vec![Token::Float(-2.5)]);
    }

    #[test]
    fn comments_are_skipped_but_lines_counted() {
        let stream = tokenize("// one\n/* two\nthree */ let\nx");
        assert_eq!(stream.lexemes[0].token, Token::Let);
        assert_eq!(stream.lexemes[0].line, 3);
        assert_eq!(stream.lexemes[0].column, 10);
        assert_eq!(stream.lexemes[1].line, 4);
        assert_eq!(stream.lexemes[1].column, 1);
    }

    #[test]
    fn each_illegal_character_is_reported_once() {
        let stream = tokenize("let x = 5 @ 3 $;");
        assert_eq!(stream.errors.len(), 2);
        assert_eq!(stream.errors[0],
                   LexError::IllegalCharacter { character: '@',
                                                line:      1,
                                                column:    11,
                                                position:  10, });
        assert_eq!(stream.lexemes.last().map(|l| &l.token), Some(&Token::Semicolon));
        assert_eq!(stream.lexemes.len(), 6);
    }

    #[test]
    fn unterminated_string_reports_the_quote() {
        let stream = tokenize("print(\"oops);");
        assert_eq!(stream.errors.len(), 1);
        assert!(matches!(stream.errors[0], LexError::IllegalCharacter { character: '"', .. }));
        assert!(stream.lexemes
                      .iter()
                      .any(|l| l.token == Token::Identifier("oops".into())));
    }

    #[test]
    fn strings_decode_escapes_and_track_lines() {
        let stream = tokenize("\"a\\n\\\"b\\\"\" \"two\nlines\" x");
        assert_eq!(stream.lexemes[0].token, Token::Str("a\n\"b\"".into()));
        assert_eq!(stream.lexemes[1].token, Token::Str("two\nlines".into()));
        assert_eq!(stream.lexemes[2].line, 2);
        assert_eq!(stream.lexemes[2].column, 8);
    }

    #[test]
    fn oversized_integer_is_an_error() {
        let stream = tokenize("let x = 99999999999999999999;");
        assert!(matches!(stream.errors.as_slice(), [LexError::IntegerTooLarge { .. }]));
    }

    #[test]
    fn records_use_category_names() {
        let stream = tokenize("set x to 3;");
        let kinds: Vec<_> = stream.lexemes.iter().map(|l| TokenRecord::from(l).kind).collect();
        assert_eq!(kinds,
                   ["SET_KEYWORD_NATURAL_LANG", "IDENTIFIER", "KEYWORD_TO", "INTEGER", "SEMICOLON"]);
    }

    #[test]
    fn reserved_word_tables_match_tokens() {
        for word in KEYWORDS.iter().chain(NATURAL_KEYWORDS.iter()) {
            let lexed = tokens(word);
            assert_eq!(lexed.len(), 1);
            assert!(lexed[0].is_keyword(), "{word}");
            assert_eq!(lexed[0].to_string(), *word);
        }
    }
}
