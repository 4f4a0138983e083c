// recursive descent over a pull-based lexer, with a single token of lookahead
use crate::{
    expr::{Expression, Int},
    lexer::{Lexer, ReaderChars, Token, TokenKind},
    prelude::*,
};
use std::{io::BufRead, str::Chars};
use thiserror::Error;

/// Enum representing parser errors.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    #[error("unexpected token {kind} {text:?}")]
    UnexpectedToken { kind: TokenKind, text: String },
    #[error("Unclosed list!")]
    UnclosedList,
    #[error("cannot quote a non-list expression: {0}")]
    QuoteNonList(String),
    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
    #[error("expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

impl From<Token> for ParseError {
    fn from(tok: Token) -> Self {
        Self::UnexpectedToken {
            kind: tok.kind,
            text: tok.text,
        }
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Deepest nesting of lists and quotes a single expression may have.
///
/// Parsing, evaluating and dropping a tree all recurse once per level, so the
/// limit keeps hostile input from overflowing the stack.
pub const MAX_DEPTH: usize = 256;

/// Parses the digit run of a number token, underscores are ignored.
fn parse_number(digits: &str, negative: bool) -> Result<Int> {
    let sign = if negative { "-" } else { "" };
    let cleaned = format!("{}{}", sign, digits.replace('_', ""));
    cleaned
        .parse::<Int>()
        .map_err(|_| ParseError::InvalidNumber(format!("{}{}", sign, digits)))
}

/// Strips the surrounding quotes kept by the lexer. A string cut short by the
/// end of input has no closing quote to strip.
fn unquote(tok: &Token) -> &str {
    let inner = tok.text.strip_prefix('"').unwrap_or(&tok.text);
    if tok.truncated {
        return inner;
    }
    inner.strip_suffix('"').unwrap_or(inner)
}

#[derive(Debug)]
pub struct Parser<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    /// one token pushback slot
    peeked: Option<Token>,
    depth: usize,
}

impl<I: Iterator<Item = char>> Parser<I> {
    pub fn new(lexer: Lexer<I>) -> Self {
        Self {
            lexer,
            peeked: None,
            depth: 0,
        }
    }

    fn next_token(&mut self) -> Token {
        self.peeked
            .take()
            .unwrap_or_else(|| self.lexer.next_token())
    }

    fn unread(&mut self, tok: Token) {
        debug_assert!(self.peeked.is_none(), "pushback slot already taken");
        self.peeked = Some(tok);
    }

    /// Returns `true` once nothing but end of input is left.
    pub fn at_end(&mut self) -> bool {
        let tok = self.next_token();
        let end = tok.is_eof();
        self.unread(tok);
        end
    }

    /// Parses exactly one expression, leaving everything after it unread.
    /// Fails with [`ParseError::TooDeep`] past [`MAX_DEPTH`] levels of nesting.
    pub fn parse_expression(&mut self) -> Result<Expression> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep);
        }
        self.depth += 1;
        let res = self.parse_nested();
        self.depth -= 1;
        res
    }

    fn parse_nested(&mut self) -> Result<Expression> {
        let tok = self.next_token();
        match tok.kind {
            TokenKind::Atom => Ok(Expression::Atom(tok.text)),
            TokenKind::Number => parse_number(&tok.text, false).map(Expression::Number),
            TokenKind::Minus => self.parse_minus(tok),
            TokenKind::Str => unquote(&tok).pipe(Expression::string).pipe(Ok),
            TokenKind::LParen => self.parse_list().map(Expression::List),
            TokenKind::Quote => {
                let quoted = self.parse_expression()?;
                let rendered = quoted.to_string();
                quoted.quote().ok_or(ParseError::QuoteNonList(rendered))
            }
            TokenKind::RParen | TokenKind::Comment | TokenKind::Eof | TokenKind::Error => {
                Err(tok.into())
            }
        }
    }

    /// `-` directly followed by a number is a negative literal, otherwise it
    /// is the atom `-`.
    fn parse_minus(&mut self, minus: Token) -> Result<Expression> {
        let next = self.next_token();
        if next.kind == TokenKind::Number {
            return parse_number(&next.text, true).map(Expression::Number);
        }
        self.unread(next);
        Ok(Expression::Atom(minus.text))
    }

    /// Parses list items up to and including the closing `)`.
    fn parse_list(&mut self) -> Result<Vec<Expression>> {
        let mut list = vec![];
        loop {
            let tok = self.next_token();
            match tok.kind {
                TokenKind::RParen => return Ok(list),
                TokenKind::Eof => return Err(ParseError::UnclosedList),
                _ => {
                    self.unread(tok);
                    list.push(self.parse_expression()?);
                }
            }
        }
    }
}

impl<'a> From<&'a str> for Parser<Chars<'a>> {
    fn from(source: &'a str) -> Self {
        Self::new(Lexer::from(source))
    }
}

impl<R: BufRead> Parser<ReaderChars<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(Lexer::from_reader(reader))
    }
}

/// Yields top-level expressions until the input runs out.
impl<I: Iterator<Item = char>> Iterator for Parser<I> {
    type Item = Result<Expression>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at_end() {
            return None;
        }
        Some(self.parse_expression())
    }
}

/// Parses the first expression of `source`, ignoring whatever follows it.
pub fn parse_expr(source: &str) -> Result<Expression> {
    Parser::from(source).parse_expression()
}

/// Parses every top-level expression of `source`.
pub fn parse_script(source: &str) -> Result<Vec<Expression>> {
    Parser::from(source).collect()
}
