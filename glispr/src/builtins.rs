use crate::{
    eval::EvalError,
    expr::{Expression, Value},
};
use std::{io::Write, str::FromStr};

type ProcFn = fn(&[Value], &mut dyn Write) -> Result<Value, EvalError>;

/// Procedures known to the evaluator, matched case-sensitively by name.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Builtin {
    Print,
    Add,
    Mul,
}

impl FromStr for Builtin {
    type Err = (); // no need for more here for now

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "print" => Self::Print,
            "+" => Self::Add,
            "*" => Self::Mul,
            _ => return Err(()),
        })
    }
}

impl Builtin {
    fn proc(self) -> ProcFn {
        match self {
            Self::Print => core::print,
            Self::Add => math::add,
            Self::Mul => math::mul,
        }
    }

    /// Calls the procedure on already evaluated arguments.
    pub fn call(self, args: &[Value], out: &mut dyn Write) -> Result<Value, EvalError> {
        self.proc()(args, out)
    }
}

pub mod core {
    use super::*;

    /// Writes the arguments back to back: strings raw, anything else
    /// rendered, absent values as `()`.
    pub fn print(args: &[Value], out: &mut dyn Write) -> Result<Value, EvalError> {
        for arg in args {
            match arg {
                Some(Expression::Text(s)) => out.write_all(s.as_bytes())?,
                Some(exp) => write!(out, "{}", exp)?,
                None => out.write_all(b"()")?,
            }
        }
        Ok(None)
    }
}

/// NOTE: math ops wrap on overflow
pub mod math {
    use super::*;
    use crate::expr::Int;

    /// QUIRK: anything but a number counts as zero
    #[inline]
    fn int(arg: &Value) -> Int {
        match arg {
            Some(Expression::Number(i)) => *i,
            _ => 0,
        }
    }

    pub fn add(args: &[Value], _out: &mut dyn Write) -> Result<Value, EvalError> {
        let sum = args.iter().map(int).fold(0, Int::wrapping_add);
        Ok(Some(Expression::Number(sum)))
    }

    /// A single non-number argument makes the whole product zero.
    pub fn mul(args: &[Value], _out: &mut dyn Write) -> Result<Value, EvalError> {
        let product = args.iter().map(int).fold(1, Int::wrapping_mul);
        Ok(Some(Expression::Number(product)))
    }
}
