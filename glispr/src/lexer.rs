use crate::prelude::*;
use std::{fmt, io, io::BufRead, iter, iter::Peekable, str::Chars, vec};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    /// Any other group of characters, e.g. `print`, `+` or `#foo`
    Atom,
    /// -
    Minus,
    /// non-negative digit run, underscores kept verbatim
    Number,
    /// string literal, surrounding quotes kept
    Str,
    /// from `;` to the end of the line
    Comment,
    /// (
    LParen,
    /// )
    RParen,
    /// '
    Quote,
    Eof,
    /// never produced by [`Lexer`]
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atom => "<atom>",
            Self::Minus => "-",
            Self::Number => "<number>",
            Self::Str => "<string>",
            Self::Comment => "<comment>",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Quote => "'",
            Self::Eof => "<EOF>",
            Self::Error => "<error>",
        })
    }
}

/// A lexical token together with the literal text it was read from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// string literal cut short by the end of input, no closing quote in `text`
    pub truncated: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            truncated: false,
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.text)
    }
}

#[inline]
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n')
}

#[inline]
fn ends_atom(ch: char) -> bool {
    matches!(ch, '(' | ')' | '"' | ';') || is_space(ch)
}

/// Lazy character stream over a [`BufRead`].
///
/// Input is pulled one line at a time, so whatever follows the line the
/// consumer stopped on is left unread. Invalid UTF-8 decodes to U+FFFD and
/// lexing goes on; any other read error counts as end of input.
#[derive(Debug)]
pub struct ReaderChars<R> {
    reader: R,
    line: vec::IntoIter<char>,
}

impl<R: BufRead> ReaderChars<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new().into_iter(),
        }
    }
}

impl<R: BufRead> Iterator for ReaderChars<R> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(ch) = self.line.next() {
                return Some(ch);
            }
            let mut buf = vec![];
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line = String::from_utf8_lossy(&buf).chars().collect_vec().into_iter()
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Turns a character stream into [`Token`]s, one at a time.
#[derive(Debug)]
pub struct Lexer<I: Iterator<Item = char>> {
    chars: Peekable<I>,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(chars: I) -> Self {
        Self {
            chars: chars.peekable(),
        }
    }

    /// Reads the next token. Once the input is exhausted every call returns
    /// [`TokenKind::Eof`] with empty text.
    pub fn next_token(&mut self) -> Token {
        while self.chars.next_if(|&ch| is_space(ch)).is_some() {}

        let Some(&ch) = self.chars.peek() else {
            return Token::eof();
        };
        let single = match ch {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '\'' => Some(TokenKind::Quote),
            '-' => Some(TokenKind::Minus),
            _ => None,
        };
        if let Some(kind) = single {
            self.chars.next();
            return Token::new(kind, ch);
        }

        match ch {
            '0'..='9' => Token::new(
                TokenKind::Number,
                self.read_while(|c| c.is_ascii_digit() || c == '_'),
            ),
            ';' => self.comment(),
            '"' => self.string(),
            _ => Token::new(TokenKind::Atom, self.read_while(|c| !ends_atom(c))),
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut buf = String::new();
        while let Some(ch) = self.chars.next_if(|&c| pred(c)) {
            buf.push(ch);
        }
        buf
    }

    /// The terminating newline is consumed but not kept.
    fn comment(&mut self) -> Token {
        let text: String = self.chars.by_ref().take_while(|&c| c != '\n').collect();
        Token::new(TokenKind::Comment, text)
    }

    /// A backslash is dropped and the character after it copied verbatim.
    /// Running out of input before the closing quote just ends the token.
    fn string(&mut self) -> Token {
        let mut text = String::new();
        text.extend(self.chars.next());
        let mut closed = false;
        while let Some(ch) = self.chars.next() {
            match ch {
                '\\' => text.extend(self.chars.next()),
                '"' => {
                    text.push(ch);
                    closed = true;
                    break;
                }
                _ => text.push(ch),
            }
        }
        Token {
            truncated: !closed,
            ..Token::new(TokenKind::Str, text)
        }
    }
}

impl<'a> From<&'a str> for Lexer<Chars<'a>> {
    fn from(source: &'a str) -> Self {
        Self::new(source.chars())
    }
}

impl<R: BufRead> Lexer<ReaderChars<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderChars::new(reader))
    }
}

/// Yields every token before the end of input.
impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token().pipe(Some).filter(|tok| !tok.is_eof())
    }
}

/// Tokenizes the whole source, the trailing [`TokenKind::Eof`] included.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::from(source).chain(iter::once(Token::eof())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use TokenKind::*;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text)
    }

    /// macro to setup test boilerplate for lexer::tokenize
    macro_rules! lexer_test {
        ($fn_name:ident, $code:literal, $expected:expr) => {
            #[test]
            fn $fn_name() {
                let tokens = tokenize($code);
                assert_eq!(tokens, $expected);
            }
        };
    }

    lexer_test!(empty, "", vec![tok(Eof, "")]);

    lexer_test!(only_whitespace, " \t\n  ", vec![tok(Eof, "")]);

    lexer_test!(atom, "foo", vec![tok(Atom, "foo"), tok(Eof, "")]);

    lexer_test!(
        atoms,
        "foo bar baz",
        vec![
            tok(Atom, "foo"),
            tok(Atom, "bar"),
            tok(Atom, "baz"),
            tok(Eof, "")
        ]
    );

    lexer_test!(
        quoted_list,
        "(foo '(bar))",
        vec![
            tok(LParen, "("),
            tok(Atom, "foo"),
            tok(Quote, "'"),
            tok(LParen, "("),
            tok(Atom, "bar"),
            tok(RParen, ")"),
            tok(RParen, ")"),
            tok(Eof, "")
        ]
    );

    lexer_test!(
        numbers,
        "-1234 1_000",
        vec![
            tok(Minus, "-"),
            tok(Number, "1234"),
            tok(Number, "1_000"),
            tok(Eof, "")
        ]
    );

    lexer_test!(
        hash_atom_and_string,
        r#"#foo      "bar()""#,
        vec![tok(Atom, "#foo"), tok(Str, r#""bar()""#), tok(Eof, "")]
    );

    lexer_test!(
        escaped_quote,
        r#""back\"sla;sh""#,
        vec![tok(Str, r#""back"sla;sh""#), tok(Eof, "")]
    );

    lexer_test!(
        truncated_string,
        r#""abc"#,
        vec![
            Token {
                truncated: true,
                ..tok(Str, r#""abc"#)
            },
            tok(Eof, "")
        ]
    );

    lexer_test!(
        truncated_after_escaped_quote,
        r#""ab\""#,
        vec![
            Token {
                truncated: true,
                ..tok(Str, r#""ab""#)
            },
            tok(Eof, "")
        ]
    );

    lexer_test!(
        comment,
        "; hello (world)\nfoo",
        vec![
            tok(Comment, "; hello (world)"),
            tok(Atom, "foo"),
            tok(Eof, "")
        ]
    );

    lexer_test!(
        comment_at_end,
        "foo ;bar",
        vec![tok(Atom, "foo"), tok(Comment, ";bar"), tok(Eof, "")]
    );

    lexer_test!(
        atom_stops_at_structure,
        "bar-baz(+\"x\";",
        vec![
            tok(Atom, "bar-baz"),
            tok(LParen, "("),
            tok(Atom, "+"),
            tok(Str, "\"x\""),
            tok(Comment, ";"),
            tok(Eof, "")
        ]
    );

    lexer_test!(
        minus_before_atom,
        "-foo",
        vec![tok(Minus, "-"), tok(Atom, "foo"), tok(Eof, "")]
    );

    lexer_test!(
        number_then_atom,
        "12ab",
        vec![tok(Number, "12"), tok(Atom, "ab"), tok(Eof, "")]
    );

    lexer_test!(
        multiplication,
        "(* (+ 1 2) 3)",
        vec![
            tok(LParen, "("),
            tok(Atom, "*"),
            tok(LParen, "("),
            tok(Atom, "+"),
            tok(Number, "1"),
            tok(Number, "2"),
            tok(RParen, ")"),
            tok(Number, "3"),
            tok(RParen, ")"),
            tok(Eof, "")
        ]
    );

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::from("x");
        assert_eq!(lexer.next_token(), tok(Atom, "x"));
        for _ in 0..3 {
            assert_eq!(lexer.next_token(), Token::eof());
        }
    }

    #[test]
    fn reader_chars_keep_input() {
        let chars: String = ReaderChars::new(Cursor::new("ab\ncd")).collect();
        assert_eq!(chars, "ab\ncd");
    }

    #[test]
    fn reader_is_pulled_line_by_line() {
        let mut input = Cursor::new("(print 1)\n(print 2)\n");
        {
            let mut lexer = Lexer::from_reader(&mut input);
            assert_eq!(lexer.next_token(), tok(LParen, "("));
        }
        assert_eq!(input.position(), "(print 1)\n".len() as u64);
    }

    #[test]
    fn reader_chars_replace_invalid_utf8() {
        let input = Cursor::new(b"caf\xe9\n\xffx".as_slice());
        let chars: String = ReaderChars::new(input).collect();
        assert_eq!(chars, "caf\u{FFFD}\n\u{FFFD}x");
    }

    #[test]
    fn invalid_utf8_inside_string() {
        let input = Cursor::new(b"(print \"caf\xe9\")\n".as_slice());
        let tokens: Vec<Token> = Lexer::from_reader(input).collect();
        assert_eq!(
            tokens,
            vec![
                tok(LParen, "("),
                tok(Atom, "print"),
                tok(Str, "\"caf\u{FFFD}\""),
                tok(RParen, ")"),
            ]
        );
    }

    #[test]
    fn display() {
        assert_eq!(tok(Atom, "foo").to_string(), r#"<atom> "foo""#);
        assert_eq!(Token::eof().to_string(), r#"<EOF> """#);
    }
}
