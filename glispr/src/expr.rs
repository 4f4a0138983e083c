use crate::prelude::*;
use std::fmt;
use variantly::Variantly;

// alias for quickly changing the implementation
pub type Int = i64;

/// Result of evaluating an [`Expression`], [`None`] being the absent value.
pub type Value = Option<Expression>;

#[derive(Variantly, Debug, Clone, Eq, PartialEq)]
pub enum Expression {
    /// identifier, only meaningful as the head of a call-form
    Atom(String),
    Number(Int),
    /// string literal with escapes already resolved
    Text(String),
    /// call-form
    List(Vec<Expression>),
    /// quoted list, data that is not evaluated as a call-form
    LiteralList(Vec<Expression>),
}

impl Expression {
    pub fn sym(s: &str) -> Self {
        Self::Atom(s.to_owned())
    }

    pub fn string(s: &str) -> Self {
        Self::Text(s.to_owned())
    }

    pub fn new_list() -> Self {
        Self::List(vec![])
    }

    /// Turns a list into its quoted form, [`None`] for any other expression.
    pub fn quote(self) -> Option<Self> {
        match self {
            Self::List(items) | Self::LiteralList(items) => Some(Self::LiteralList(items)),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => f.write_str(a),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(t) => write!(f, "\"{}\"", t),
            Self::List(items) => write!(f, "({})", items.iter().join(" ")),
            Self::LiteralList(items) => write!(f, "'({})", items.iter().join(" ")),
        }
    }
}

/// Creates a [`Expression::List`] like `vec!`.
///
/// A thin wrapper around `vec!`, expands to `Expression::List(vec![/*...*/])`.
///
/// ```
/// # use glispr::expr::{list, Expression};
/// let l = list![Expression::Number(1), Expression::sym("x")];
/// assert_eq!(l.to_string(), "(1 x)");
/// assert_eq!(list![].to_string(), "()");
/// ```
#[macro_export]
macro_rules! list {
    [] => (
        $crate::expr::Expression::new_list()
    );
    [$($x:expr),+ $(,)?] => (
        $crate::expr::Expression::List(vec![$($x),+])
    );
}

/// Same as [`list!`] but for [`Expression::LiteralList`].
#[macro_export]
macro_rules! literal_list {
    [] => (
        $crate::expr::Expression::LiteralList(vec![])
    );
    [$($x:expr),+ $(,)?] => (
        $crate::expr::Expression::LiteralList(vec![$($x),+])
    );
}

pub use list;
pub use literal_list;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! render_test {
        ($fn_name:ident, $exp:expr, $expected:literal) => {
            #[test]
            fn $fn_name() {
                assert_eq!($exp.to_string(), $expected);
            }
        };
    }

    render_test!(atom, Expression::sym("bar-baz"), "bar-baz");

    render_test!(number, Expression::Number(-42), "-42");

    render_test!(text, Expression::string("hi there"), "\"hi there\"");

    render_test!(empty_list, list![], "()");

    render_test!(empty_literal_list, literal_list![], "'()");

    render_test!(
        nested,
        list![
            Expression::sym("print"),
            literal_list![Expression::sym("foo"), Expression::Number(1)],
            list![list![]],
        ],
        "(print '(foo 1) (()))"
    );

    #[test]
    fn quote_lists_only() {
        assert_eq!(
            list![Expression::Number(1)].quote(),
            Some(literal_list![Expression::Number(1)])
        );
        assert_eq!(literal_list![].quote(), Some(literal_list![]));
        assert_eq!(Expression::sym("x").quote(), None);
        assert_eq!(Expression::Number(3).quote(), None);
    }
}
