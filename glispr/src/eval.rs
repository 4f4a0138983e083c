use crate::{
    builtins::Builtin,
    expr::{Expression, Value},
    prelude::*,
};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("cannot evaluate atom: {0}")]
    BareAtom(String),
    #[error("not implemented: evaluating literal list {0}")]
    LiteralList(String),
    #[error("expected an atom as a function name in list: {0}")]
    NotAProc(String),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T = Value, E = EvalError> = std::result::Result<T, E>;

fn eval_list(list: &[Expression], out: &mut dyn Write) -> Result {
    let [head, rest @ ..] = list else {
        return Ok(None);
    };

    let Expression::Atom(name) = head else {
        // covers (1) and ("foo")
        if rest.is_empty() {
            return eval(head, out);
        }
        return Err(EvalError::NotAProc(format!("({})", list.iter().join(" "))));
    };

    // arguments are evaluated eagerly, even for unknown procedures
    let args = rest
        .iter()
        .map(|exp| eval(exp, out))
        .collect::<Result<Vec<_>>>()?;

    // QUIRK: an unknown procedure is a silent no-op
    let Ok(builtin) = name.parse::<Builtin>() else {
        return Ok(None);
    };
    builtin.call(&args, out)
}

/// Evaluates `exp`, writing any side effects to `out`.
///
/// Numbers and strings evaluate to themselves, a call-form list dispatches to
/// a [`Builtin`]. Bare atoms and quoted lists cannot be evaluated.
pub fn eval(exp: &Expression, out: &mut dyn Write) -> Result {
    match exp {
        Expression::Atom(a) => Err(EvalError::BareAtom(a.clone())),
        Expression::Number(_) | Expression::Text(_) => Ok(Some(exp.clone())),
        Expression::LiteralList(_) => Err(EvalError::LiteralList(exp.to_string())),
        Expression::List(l) => eval_list(l, out),
    }
}
