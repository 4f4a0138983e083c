use crate::{eval, expr, parser};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ParseErr(#[from] parser::ParseError),
    #[error(transparent)]
    EvalErr(#[from] eval::EvalError),
    #[error(transparent)]
    IOErr(#[from] io::Error),
}

pub type Result<T = expr::Value> = std::result::Result<T, Error>;

/// Evaluates one expression, flushing whatever it printed.
fn eval_flush(exp: &expr::Expression, out: &mut impl Write) -> Result {
    let value = eval::eval(exp, out)?;
    out.flush()?;
    Ok(value)
}

/// Parses and evaluates single top-level expressions against an output stream.
#[derive(Debug)]
pub struct Interpreter<W: Write = io::Stdout> {
    out: W,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Evaluates the first expression of `code`; the rest is ignored.
    pub fn eval(&mut self, code: &str) -> Result {
        let exp = parser::parse_expr(code)?;
        eval_flush(&exp, &mut self.out)
    }

    /// Reads the first expression from `source` and evaluates it. Input after
    /// the line the expression ends on is left unread.
    pub fn run(&mut self, source: impl BufRead) -> Result {
        let exp = parser::Parser::from_reader(source).parse_expression()?;
        eval_flush(&exp, &mut self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn eval(code: &str) -> Result {
    Interpreter::default().eval(code)
}

pub fn run(source: impl BufRead) -> Result {
    Interpreter::default().run(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expression;
    use std::io::Cursor;

    #[test]
    fn eval_prints_to_output() -> anyhow::Result<()> {
        let mut ip = Interpreter::new(Vec::<u8>::new());
        let value = ip.eval("(print \"6 * 7 = \" (* 6 7))")?;
        assert_eq!(value, None);
        assert_eq!(String::from_utf8(ip.into_inner())?, "6 * 7 = 42");
        Ok(())
    }

    #[test]
    fn run_reads_first_expression_only() -> anyhow::Result<()> {
        let mut input = Cursor::new("(+ 1\n 2)\n(print \"never\")\n");
        let mut ip = Interpreter::new(Vec::<u8>::new());
        assert_eq!(ip.run(&mut input)?, Some(Expression::Number(3)));
        assert!(ip.into_inner().is_empty());
        assert_eq!(input.position(), "(+ 1\n 2)\n".len() as u64);
        Ok(())
    }

    fn run_bytes(input: &[u8]) -> anyhow::Result<String> {
        let mut ip = Interpreter::new(Vec::<u8>::new());
        ip.run(Cursor::new(input))?;
        Ok(String::from_utf8(ip.into_inner())?)
    }

    #[test]
    fn invalid_utf8_is_replaced() -> anyhow::Result<()> {
        assert_eq!(run_bytes(b"(print \"caf\xe9\")")?, "caf\u{FFFD}");
        Ok(())
    }

    #[test]
    fn invalid_utf8_on_later_line() -> anyhow::Result<()> {
        assert_eq!(run_bytes(b"(print 1\n\"\xe9\")")?, "1\u{FFFD}");
        Ok(())
    }

    #[test]
    fn parse_error_surfaces() {
        let err = Interpreter::new(Vec::<u8>::new()).eval("(print 1").unwrap_err();
        assert!(matches!(
            err,
            Error::ParseErr(parser::ParseError::UnclosedList)
        ));
    }

    #[test]
    fn eval_error_surfaces() {
        let err = Interpreter::new(Vec::<u8>::new()).eval("(print foo)").unwrap_err();
        assert!(matches!(err, Error::EvalErr(eval::EvalError::BareAtom(_))));
        assert_eq!(err.to_string(), "cannot evaluate atom: foo");
    }
}
