//! lispy - a small Lisp-family expression interpreter
//!
//! This crate reads parenthesized textual expressions, parses them into a
//! tree of [`ast::Expr`] values, and evaluates that tree against a mutable,
//! lexically scoped environment chain.
//!
//! ```text
//! (def! square (lambda (n) (* n n)))
//! (square 12)              ; => 144
//! (if (> 3 2) 1 2)         ; => 1
//! (show (+ 1 2))           ; => (+ 1 2), unevaluated
//! ```
//!
//! ## Pipeline
//!
//! text → [`reader::tokenize`] → [`reader::read_from_tokens`] → [`evaluator::eval`]
//! → result value → `Display` (the inverse of parsing).
//!
//! ## Modules
//!
//! - `ast`: the universal expression/value type and its textual rendering
//! - `reader`: tokenizer and recursive-descent parser
//! - `evaluator`: environment chain, closures and the tree-walking evaluator
//! - `builtinops`: special-form table and native builtin registry
//! - `repl`: helpers for the interactive driver (control commands, line evaluation)

use crate::builtinops::Arity;

/// Categorizes the different kinds of syntax errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorKind {
    /// Input ended while a token was still expected (empty input, unclosed parens)
    UnexpectedEof,
    /// A `)` appeared with no matching `(`
    UnexpectedCloseParen,
    /// Extra tokens found after a complete expression
    TrailingContent,
    /// The tokenizer could not split the input
    Lexical,
}

/// A structured error describing a tokenizer or parser failure.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("{message}{}", found_suffix(.found))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// The offending token, if identifiable
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, found: Option<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            found,
        }
    }
}

/// Error types for the interpreter
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("SyntaxError: {0}")]
    SyntaxError(#[from] ParseError),
    #[error("EvaluationError: {0}")]
    EvalError(String),
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Unbound name: {0}")]
    UnboundName(String),
    #[error("ArityError: {}", arity_message(.expected, .got, .expression))]
    ArityError {
        expected: Arity,
        got: usize,
        expression: Option<String>,
    },
}

impl Error {
    /// Create an ArityError without expression context
    pub fn arity_error(expected: impl Into<Arity>, got: usize) -> Self {
        Error::ArityError {
            expected: expected.into(),
            got,
            expression: None,
        }
    }

    /// Create an ArityError with expression context
    pub fn arity_error_with_expr(expected: impl Into<Arity>, got: usize, expression: String) -> Self {
        Error::ArityError {
            expected: expected.into(),
            got,
            expression: Some(expression),
        }
    }

    /// Shorthand for a syntax error built from its parts
    pub(crate) fn syntax(kind: ParseErrorKind, message: impl Into<String>, found: Option<String>) -> Self {
        Error::SyntaxError(ParseError::new(kind, message, found))
    }
}

fn found_suffix(found: &Option<String>) -> String {
    match found {
        Some(token) => format!(" (found '{token}')"),
        None => String::new(),
    }
}

fn arity_message(expected: &Arity, got: &usize, expression: &Option<String>) -> String {
    match expression {
        Some(expr) => format!("expression {expr}: expected {expected} arguments, got {got}"),
        None => format!("function expected {expected} arguments but got {got}"),
    }
}

pub mod ast;
pub mod builtinops;
pub mod evaluator;
pub mod reader;
pub mod repl;

pub use ast::Expr;
pub use evaluator::{Environment, create_global_env, eval};
pub use reader::{parse, parse_program, tokenize};
