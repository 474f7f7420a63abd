//! Callable values: interpreted closures and native builtins.
//!
//! Both implement [`Callable`], the single "applicable" interface the
//! evaluator's application path goes through.

use std::sync::Arc;

use crate::Error;
use crate::ast::Expr;
use crate::builtinops::Arity;
use crate::evaluator::environment::Environment;
use crate::evaluator::eval;
use crate::evaluator::intooperation::OperationFn;

/// Anything that can be applied to a list of evaluated arguments.
pub trait Callable {
    fn call(&self, args: Vec<Expr>) -> Result<Expr, Error>;
}

/// A user-defined closure: parameter names, an unevaluated body and the
/// environment active when the `lambda` was evaluated.
///
/// The environment is held by reference, so later `def!`/`set!` in the
/// defining scope are visible to the body.
pub struct Procedure {
    pub params: Vec<String>,
    pub body: Expr,
    pub env: Environment,
}

impl Procedure {
    pub fn new(params: Vec<String>, body: Expr, env: Environment) -> Self {
        Procedure { params, body, env }
    }
}

impl Callable for Procedure {
    fn call(&self, args: Vec<Expr>) -> Result<Expr, Error> {
        let frame = Environment::with_bindings(&self.params, args, &self.env)?;
        eval(&self.body, &frame)
    }
}

/// A native function bound under a name.
#[derive(Clone)]
pub struct Builtin {
    pub name: String,
    pub arity: Arity,
    // Stored as an Arc to allow dynamic wrapping of typed Rust functions/closures.
    func: Arc<OperationFn>,
}

impl Builtin {
    pub fn new(name: impl Into<String>, arity: Arity, func: Arc<OperationFn>) -> Self {
        Builtin {
            name: name.into(),
            arity,
            func,
        }
    }

    /// Identity comparison of the underlying function object
    pub fn ptr_eq(&self, other: &Builtin) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Callable for Builtin {
    fn call(&self, args: Vec<Expr>) -> Result<Expr, Error> {
        self.arity.validate(args.len())?;
        (self.func)(args)
    }
}
