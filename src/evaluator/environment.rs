use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tracing::trace;

use crate::Error;
use crate::ast::Expr;
use crate::builtinops::Arity;
use crate::evaluator::intooperation::{IntoOperation, OperationFn};
use crate::evaluator::procedure::Builtin;

/// Environment for variable bindings
///
/// An `Environment` is a cheap, shared handle to one frame of the chain.
/// Cloning it clones the handle, not the bindings: every closure and call
/// frame holding a clone observes later `define`/`assign` on that frame.
#[derive(Clone, Default)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

#[derive(Default)]
struct Frame {
    bindings: HashMap<String, Expr>,
    parent: Option<Environment>,
}

impl Environment {
    /// Create an empty environment with no parent
    pub fn new() -> Self {
        Environment::default()
    }

    /// Create an empty environment whose outer link is `parent`
    pub fn with_parent(parent: &Environment) -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings: HashMap::new(),
                parent: Some(parent.clone()),
            })),
        }
    }

    /// Create a frame binding `params` positionally to `args`, chained to
    /// `outer`. Used when applying a procedure.
    pub fn with_bindings(
        params: &[String],
        args: Vec<Expr>,
        outer: &Environment,
    ) -> Result<Self, Error> {
        if params.len() != args.len() {
            return Err(Error::arity_error(params.len(), args.len()));
        }

        let env = Environment::with_parent(outer);
        {
            let mut frame = env.frame.borrow_mut();
            for (param, arg) in params.iter().zip(args) {
                frame.bindings.insert(param.clone(), arg);
            }
        }
        Ok(env)
    }

    /// Bind `name` in this frame only, overwriting any existing binding here.
    pub fn define(&self, name: impl Into<String>, value: Expr) {
        self.frame.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Resolve `name` by walking the chain from this frame outward.
    pub fn lookup(&self, name: &str) -> Result<Expr, Error> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let frame = env.frame.borrow();
            if let Some(value) = frame.bindings.get(name) {
                return Ok(value.clone());
            }
            current = frame.parent.clone();
        }
        Err(Error::UnboundName(name.to_owned()))
    }

    /// Overwrite the binding of `name` in the innermost frame that already
    /// binds it. Assigning a name bound nowhere is an error.
    pub fn assign(&self, name: &str, value: Expr) -> Result<(), Error> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let mut frame = env.frame.borrow_mut();
            if let Some(slot) = frame.bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            current = frame.parent.clone();
        }
        Err(Error::UnboundName(name.to_owned()))
    }

    /// Whether this frame (ignoring parents) binds `name`
    pub fn contains_local(&self, name: &str) -> bool {
        self.frame.borrow().bindings.contains_key(name)
    }

    /// The outer environment, if any
    pub fn parent(&self) -> Option<Environment> {
        self.frame.borrow().parent.clone()
    }

    /// Whether two handles refer to the same frame
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }

    /// Register a custom builtin function in this environment.
    ///
    /// This is the low-level API: it accepts a function that already
    /// works on `&[Expr]` and returns `Result<Expr, Error>`. The given
    /// [`Arity`] is validated on every call before `func` runs.
    ///
    /// # Example
    /// ```
    /// use lispy::builtinops::Arity;
    /// use lispy::{Error, Expr, create_global_env, eval, parse};
    ///
    /// fn count_args(args: &[Expr]) -> Result<Expr, Error> {
    ///     Ok(Expr::Integer(args.len() as i64))
    /// }
    ///
    /// let env = create_global_env();
    /// env.register_builtin_function("count", Arity::Any, count_args);
    /// let result = eval(&parse("(count 1 2 3)").unwrap(), &env).unwrap();
    /// assert_eq!(result, Expr::Integer(3));
    /// ```
    pub fn register_builtin_function(
        &self,
        name: &str,
        arity: Arity,
        func: fn(&[Expr]) -> Result<Expr, Error>,
    ) {
        let wrapped: Arc<OperationFn> = Arc::new(move |args: Vec<Expr>| func(&args));
        self.define(name, Expr::Builtin(Builtin::new(name, arity, wrapped)));
    }

    /// Register a strongly-typed Rust function as a builtin using
    /// automatic argument extraction and result conversion.
    ///
    /// ```
    /// use lispy::{Expr, create_global_env, eval, parse};
    ///
    /// fn double(n: i64) -> i64 {
    ///     n * 2
    /// }
    ///
    /// let env = create_global_env();
    /// env.register_builtin_operation::<_, (i64,), i64>("double", double);
    /// let result = eval(&parse("(double 21)").unwrap(), &env).unwrap();
    /// assert_eq!(result, Expr::Integer(42));
    /// ```
    ///
    /// Supported parameter types: `Expr`, `i64`, [`crate::ast::Number`] and
    /// [`crate::ast::ListRef`]. Supported return types are anything
    /// `Into<Expr>`, or `Result<R, Error>` of such a type. Arity is
    /// enforced automatically and conversion failures yield `TypeError`.
    pub fn register_builtin_operation<F, Args, R>(&self, name: &str, func: F)
    where
        F: IntoOperation<Args, R>,
    {
        let arity = Arity::Exact(F::ARITY);
        let wrapped = func.into_operation();
        self.define(name, Expr::Builtin(Builtin::new(name, arity, wrapped)));
    }

    /// Get all bindings in this environment and its parents.
    /// Returns a Vec of (name, value) pairs sorted by name; inner
    /// bindings shadow outer ones.
    pub fn get_all_bindings(&self) -> Vec<(String, Expr)> {
        let mut bindings = HashMap::new();

        // Start with parent bindings (so they can be overridden by local bindings)
        if let Some(parent) = self.parent() {
            for (name, value) in parent.get_all_bindings() {
                bindings.insert(name, value);
            }
        }

        for (name, value) in &self.frame.borrow().bindings {
            bindings.insert(name.clone(), value.clone());
        }

        let mut result: Vec<_> = bindings.into_iter().collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }

    /// Bind every `(name, value)` pair in this frame
    pub(crate) fn extend(&self, bindings: impl IntoIterator<Item = (String, Expr)>) {
        let mut frame = self.frame.borrow_mut();
        for (name, value) in bindings {
            trace!(name = %name, "bind");
            frame.bindings.insert(name, value);
        }
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// Bindings may hold closures that point back at this frame, so the
// Debug output stays shallow.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        let mut names: Vec<_> = frame.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("has_parent", &frame.parent.is_some())
            .finish()
    }
}
