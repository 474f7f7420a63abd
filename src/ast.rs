//! This module defines the core expression type shared by the reader and the
//! evaluator. The main enum, [`Expr`], is both the abstract syntax tree produced
//! by parsing and the value type produced by evaluation: numbers (integer and
//! float), symbols, lists, booleans, interpreted closures and native builtins.
//! Ergonomic helpers such as [`val`], [`sym`] and [`nil`] build trees in code and
//! tests. `Display` renders an expression back to source text and is the inverse
//! of parsing for every tree the reader can produce.

use std::rc::Rc;

use crate::Error;
use crate::evaluator::procedure::{Builtin, Procedure};

/// Integer subkind of numbers
pub type IntType = i64;

/// Float subkind of numbers
pub type FloatType = f64;

/// Shared list storage
pub type ListRef = Rc<Vec<Expr>>;

/// Core expression type of the interpreter
///
/// Lists share their storage through an `Rc`, so cloning a list is cheap and
/// `eq?` can tell two structurally equal lists apart by identity.
#[derive(Clone)]
pub enum Expr {
    /// Integer numbers
    Integer(IntType),
    /// Floating-point numbers
    Float(FloatType),
    /// Symbols (identifiers)
    Symbol(String),
    /// Lists; the empty list is the falsy, null-like value
    List(ListRef),
    /// Result of comparisons and predicates
    Bool(bool),
    /// User-defined closures
    Procedure(Rc<Procedure>),
    /// Native functions registered in an environment
    Builtin(Builtin),
    /// "No value", e.g. the result of `def!`.
    /// Never equals itself or any other value.
    Unspecified,
}

/// A number extracted from an [`Expr`], used by numeric builtins.
///
/// Comparisons are numeric across subkinds: `Int(1) == Float(1.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(IntType),
    Float(FloatType),
}

impl Number {
    pub fn as_float(self) -> FloatType {
        match self {
            Number::Int(n) => n as FloatType,
            Number::Float(f) => f,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(std::cmp::Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            _ => self.as_float().partial_cmp(&other.as_float()),
        }
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Expr::Integer(i),
            Number::Float(f) => Expr::Float(f),
        }
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Integer(n) => write!(f, "Integer({n})"),
            Expr::Float(x) => write!(f, "Float({x:?})"),
            Expr::Symbol(s) => write!(f, "Symbol({s})"),
            Expr::List(list) => {
                write!(f, "List(")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, ")")
            }
            Expr::Bool(b) => write!(f, "Bool({b})"),
            Expr::Procedure(proc) => {
                write!(f, "Procedure(params={:?}, body={:?})", proc.params, proc.body)
            }
            Expr::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
            Expr::Unspecified => write!(f, "Unspecified"),
        }
    }
}

// From trait implementations for Expr - enables .into() conversion
impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Bool(b)
    }
}

impl From<FloatType> for Expr {
    fn from(x: FloatType) -> Self {
        Expr::Float(x)
    }
}

macro_rules! impl_from_integer {
    ($int_type:ty) => {
        impl From<$int_type> for Expr {
            fn from(n: $int_type) -> Self {
                Expr::Integer(n as IntType)
            }
        }
    };
}

impl_from_integer!(i8);
impl_from_integer!(i16);
impl_from_integer!(i32);
impl_from_integer!(IntType);
impl_from_integer!(u8);
impl_from_integer!(u16);
impl_from_integer!(u32);

impl<T: Into<Expr>> From<Vec<T>> for Expr {
    fn from(v: Vec<T>) -> Self {
        Expr::list(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Expr>, const N: usize> From<[T; N]> for Expr {
    fn from(arr: [T; N]) -> Self {
        Expr::list(arr.into_iter().map(Into::into).collect())
    }
}

// Fallible conversions from `Expr` back into primitive Rust types.

impl TryFrom<Expr> for Number {
    type Error = Error;

    fn try_from(expr: Expr) -> Result<Number, Error> {
        match expr {
            Expr::Integer(n) => Ok(Number::Int(n)),
            Expr::Float(x) => Ok(Number::Float(x)),
            other => Err(Error::TypeError(format!("expected number, got {other}"))),
        }
    }
}

impl TryFrom<Expr> for IntType {
    type Error = Error;

    fn try_from(expr: Expr) -> Result<IntType, Error> {
        match expr {
            Expr::Integer(n) => Ok(n),
            other => Err(Error::TypeError(format!("expected integer, got {other}"))),
        }
    }
}

impl TryFrom<Expr> for ListRef {
    type Error = Error;

    fn try_from(expr: Expr) -> Result<ListRef, Error> {
        match expr {
            Expr::List(items) => Ok(items),
            other => Err(Error::TypeError(format!("expected list, got {other}"))),
        }
    }
}

/// Helper function for creating symbols
pub fn sym<S: AsRef<str>>(name: S) -> Expr {
    Expr::Symbol(name.as_ref().to_owned())
}

/// Helper function for creating expressions from Rust values
pub fn val<T: Into<Expr>>(value: T) -> Expr {
    value.into()
}

/// Helper function for creating the empty list
pub fn nil() -> Expr {
    Expr::list(Vec::new())
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Integer(n) => write!(f, "{n}"),
            // Debug formatting keeps a float marker ("3.0", "1e300") so the
            // rendering reads back as a float rather than an integer.
            Expr::Float(x) => write!(f, "{x:?}"),
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::List(elements) => {
                write!(f, "(")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Procedure(proc) => write!(f, "#<procedure ({})>", proc.params.join(" ")),
            Expr::Builtin(builtin) => write!(f, "#<builtin:{}>", builtin.name),
            Expr::Unspecified => write!(f, "#<unspecified>"),
        }
    }
}

impl Expr {
    /// Build a list expression from its elements
    pub fn list(elements: Vec<Expr>) -> Expr {
        Expr::List(Rc::new(elements))
    }

    /// Check if an expression is the empty list
    pub fn is_nil(&self) -> bool {
        matches!(self, Expr::List(list) if list.is_empty())
    }

    /// Truthiness used by `if` and the boolean builtins: `false`, zero,
    /// the empty list and "no value" are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Expr::Bool(b) => *b,
            Expr::Integer(n) => *n != 0,
            Expr::Float(x) => *x != 0.0,
            Expr::List(list) => !list.is_empty(),
            Expr::Unspecified => false,
            Expr::Symbol(_) | Expr::Procedure(_) | Expr::Builtin(_) => true,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Expr::Integer(_) | Expr::Float(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Expr::Procedure(_) | Expr::Builtin(_))
    }

    /// Identity comparison (`eq?`): atoms compare by value, lists,
    /// procedures and builtins by the identity of their shared storage.
    /// Two empty lists are always identical.
    pub fn is_identical(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::List(a), Expr::List(b)) => {
                Rc::ptr_eq(a, b) || (a.is_empty() && b.is_empty())
            }
            (Expr::Procedure(a), Expr::Procedure(b)) => Rc::ptr_eq(a, b),
            (Expr::Builtin(a), Expr::Builtin(b)) => a.ptr_eq(b),
            (Expr::Integer(_) | Expr::Float(_) | Expr::Symbol(_) | Expr::Bool(_), _) => {
                self == other
            }
            _ => false,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Integer(a), Expr::Integer(b)) => a == b,
            // Structural equality: a NaN read back from its rendering is the same tree
            (Expr::Float(a), Expr::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Expr::Symbol(a), Expr::Symbol(b)) => a == b,
            (Expr::List(a), Expr::List(b)) => a == b,
            (Expr::Bool(a), Expr::Bool(b)) => a == b,
            (Expr::Procedure(a), Expr::Procedure(b)) => Rc::ptr_eq(a, b),
            // Compare builtins by registered name, not function pointer
            (Expr::Builtin(a), Expr::Builtin(b)) => a.name == b.name,
            (Expr::Unspecified, _) | (_, Expr::Unspecified) => false,
            _ => false,
        }
    }
}
