//! Built-in operations registry.
//!
//! This module holds the two static tables the evaluator consults:
//!
//! - **Special forms** (`show`, `if`, `def!`, `set!`, `lambda`): receive their
//!   operands unevaluated together with the current environment. They are
//!   recognized by keyword before any procedure application and cannot be
//!   shadowed by a binding of the same name.
//! - **Functions**: native callables that receive evaluated arguments. They
//!   are bound into the global environment by
//!   [`create_global_env`](crate::evaluator::create_global_env) and resolved
//!   like any other name, so user code may rebind them.
//!
//! ## Numbers
//!
//! Arithmetic keeps integers as integers and promotes to float as soon as
//! one operand is a float. `/`, `pow` and the transcendental functions always
//! produce floats. Integer overflow is reported as an error instead of
//! wrapping.
//!
//! ## Adding New Operations
//!
//! 1. Implement the function, either typed (`fn(Number) -> Result<Number, Error>`)
//!    or over the raw argument slice (`fn(&[Expr]) -> Result<Expr, Error>`)
//! 2. Add it to `BUILTIN_OPS` with its name and arity
//! 3. Add test cases to the table at the bottom of this file

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, LazyLock};

use crate::Error;
use crate::ast::{Expr, FloatType, IntType, ListRef, Number};
use crate::evaluator::intooperation::{IntoOperation, OperationFn};
use crate::evaluator::{Environment, apply, eval_define, eval_if, eval_lambda, eval_set, eval_show};

/// Number of arguments an operation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly n arguments
    Exact(usize),
    /// At least n arguments
    AtLeast(usize),
    /// Between min and max arguments (inclusive)
    Range(usize, usize),
    /// Any number of arguments
    Any,
}

impl Arity {
    /// Check if the given number of arguments is valid for this arity
    pub fn validate(&self, count: usize) -> Result<(), Error> {
        let ok = match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::Any => true,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::arity_error(*self, count))
        }
    }
}

impl From<usize> for Arity {
    fn from(n: usize) -> Self {
        Arity::Exact(n)
    }
}

impl PartialEq<usize> for Arity {
    fn eq(&self, other: &usize) -> bool {
        *self == Arity::Exact(*other)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

/// Evaluation hook of a special form: unevaluated operands plus the
/// environment the form appears in.
pub type SpecialFormFn = fn(&[Expr], &Environment) -> Result<Expr, Error>;

/// A keyword handled directly by the evaluator
#[derive(Clone, Copy)]
pub struct SpecialForm {
    pub name: &'static str,
    /// Number of operands, validated before `eval` runs
    pub arity: Arity,
    pub eval: SpecialFormFn,
}

impl fmt::Debug for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecialForm")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

static SPECIAL_FORMS: [SpecialForm; 5] = [
    SpecialForm {
        name: "show",
        arity: Arity::Exact(1),
        eval: eval_show,
    },
    SpecialForm {
        name: "if",
        arity: Arity::Exact(3),
        eval: eval_if,
    },
    SpecialForm {
        name: "def!",
        arity: Arity::Exact(2),
        eval: eval_define,
    },
    SpecialForm {
        name: "set!",
        arity: Arity::Exact(2),
        eval: eval_set,
    },
    SpecialForm {
        name: "lambda",
        arity: Arity::Exact(2),
        eval: eval_lambda,
    },
];

/// Definition of a native built-in function
#[derive(Clone)]
pub struct BuiltinOp {
    /// The name this function is bound to in the global environment
    pub name: &'static str,
    /// Expected number of arguments
    pub arity: Arity,
    /// The implementation, via the canonical erased builtin signature
    pub func: Arc<OperationFn>,
}

impl fmt::Debug for BuiltinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinOp")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for BuiltinOp {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

//
// Numeric helpers
//

fn to_numbers(args: &[Expr]) -> Result<Vec<Number>, Error> {
    args.iter().cloned().map(Number::try_from).collect()
}

/// Combine two numbers, staying integral when both are integers
fn combine(
    a: Number,
    b: Number,
    int_op: fn(IntType, IntType) -> Option<IntType>,
    float_op: fn(FloatType, FloatType) -> FloatType,
    what: &str,
) -> Result<Number, Error> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => int_op(x, y)
            .map(Number::Int)
            .ok_or_else(|| Error::EvalError(format!("Integer overflow in {what}"))),
        _ => Ok(Number::Float(float_op(a.as_float(), b.as_float()))),
    }
}

/// Convert an already-rounded float into an integer, rejecting NaN,
/// infinities and values outside the integer range.
fn float_to_int(x: FloatType, name: &str) -> Result<IntType, Error> {
    // IntType::MAX as f64 rounds up to 2^63, which is itself out of range
    if x.is_finite() && x >= IntType::MIN as FloatType && x < IntType::MAX as FloatType {
        Ok(x as IntType)
    } else {
        Err(Error::EvalError(format!(
            "{name}: cannot convert {x:?} to an integer"
        )))
    }
}

//
// Builtin Function Implementations
//

fn builtin_add(args: &[Expr]) -> Result<Expr, Error> {
    let mut sum = Number::Int(0);
    for n in to_numbers(args)? {
        sum = combine(sum, n, IntType::checked_add, |x, y| x + y, "addition")?;
    }
    Ok(sum.into())
}

fn builtin_sub(args: &[Expr]) -> Result<Expr, Error> {
    let numbers = to_numbers(args)?;
    match numbers.as_slice() {
        [] => Err(Error::arity_error(Arity::AtLeast(1), 0)),
        [Number::Int(n)] => n
            .checked_neg()
            .map(Expr::Integer)
            .ok_or_else(|| Error::EvalError("Integer overflow in negation".into())),
        [Number::Float(x)] => Ok(Expr::Float(-x)),
        [first, rest @ ..] => {
            let mut result = *first;
            for n in rest {
                result = combine(result, *n, IntType::checked_sub, |x, y| x - y, "subtraction")?;
            }
            Ok(result.into())
        }
    }
}

fn builtin_mul(args: &[Expr]) -> Result<Expr, Error> {
    let mut product = Number::Int(1);
    for n in to_numbers(args)? {
        product = combine(product, n, IntType::checked_mul, |x, y| x * y, "multiplication")?;
    }
    Ok(product.into())
}

fn builtin_div(args: &[Expr]) -> Result<Expr, Error> {
    let numbers = to_numbers(args)?;
    let Some((first, rest)) = numbers.split_first() else {
        return Err(Error::arity_error(Arity::AtLeast(2), 0));
    };

    let mut quotient = first.as_float();
    for divisor in rest {
        let divisor = divisor.as_float();
        if divisor == 0.0 {
            return Err(Error::EvalError("division by zero".into()));
        }
        quotient /= divisor;
    }
    Ok(Expr::Float(quotient))
}

fn builtin_abs(n: Number) -> Result<Number, Error> {
    match n {
        Number::Int(i) => i
            .checked_abs()
            .map(Number::Int)
            .ok_or_else(|| Error::EvalError("Integer overflow in abs".into())),
        Number::Float(x) => Ok(Number::Float(x.abs())),
    }
}

fn builtin_pow(base: Number, exponent: Number) -> FloatType {
    base.as_float().powf(exponent.as_float())
}

/// `(round x)` rounds half to even and yields an integer;
/// `(round x n)` keeps `n` decimal digits.
fn builtin_round(args: &[Expr]) -> Result<Expr, Error> {
    let numbers = to_numbers(args)?;
    match numbers.as_slice() {
        [Number::Int(n)] => Ok(Expr::Integer(*n)),
        [Number::Float(x)] => float_to_int(x.round_ties_even(), "round").map(Expr::Integer),
        [Number::Int(n), Number::Int(digits)] if *digits >= 0 => Ok(Expr::Integer(*n)),
        [Number::Int(n), Number::Int(digits)] => round_int_to_tens(*n, digits.unsigned_abs()),
        [Number::Float(x), Number::Int(digits)] => {
            let digits = i32::try_from(*digits)
                .map_err(|_| Error::EvalError("round: digit count out of range".into()))?;
            let factor = FloatType::powi(10.0, digits.saturating_abs());
            let rounded = if digits >= 0 {
                (x * factor).round_ties_even() / factor
            } else {
                (x / factor).round_ties_even() * factor
            };
            Ok(Expr::Float(rounded))
        }
        [_, Number::Float(_)] => Err(Error::TypeError(
            "round: digit count must be an integer".into(),
        )),
        _ => Err(Error::arity_error(Arity::Range(1, 2), numbers.len())),
    }
}

/// Round an integer to a multiple of `10^places`, ties to even, without
/// going through floating point.
fn round_int_to_tens(n: IntType, places: u64) -> Result<Expr, Error> {
    let Some(factor) = u32::try_from(places)
        .ok()
        .and_then(|places| IntType::checked_pow(10, places))
    else {
        // Every integer is closer to zero than to the next multiple
        return Ok(Expr::Integer(0));
    };
    let (quotient, remainder) = (n.div_euclid(factor), n.rem_euclid(factor));
    let rounds_up = match (2 * remainder).cmp(&factor) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => quotient % 2 != 0,
        std::cmp::Ordering::Less => false,
    };
    let quotient = if rounds_up { quotient + 1 } else { quotient };
    quotient
        .checked_mul(factor)
        .map(Expr::Integer)
        .ok_or_else(|| Error::EvalError("Integer overflow in round".into()))
}

macro_rules! extremum {
    ($name:ident, $better:tt) => {
        fn $name(args: &[Expr]) -> Result<Expr, Error> {
            let numbers = to_numbers(args)?;
            let Some((first, rest)) = numbers.split_first() else {
                return Err(Error::arity_error(Arity::AtLeast(1), 0));
            };
            let mut best = *first;
            for n in rest {
                if *n $better best {
                    best = *n;
                }
            }
            Ok(best.into())
        }
    };
}

extremum!(builtin_max, >);
extremum!(builtin_min, <);

fn shift_amount(amount: IntType) -> Result<u32, Error> {
    u32::try_from(amount).map_err(|_| Error::EvalError("negative shift count".into()))
}

fn builtin_shl(value: IntType, amount: IntType) -> Result<IntType, Error> {
    let amount = shift_amount(amount)?;
    if value == 0 {
        return Ok(0);
    }
    value
        .checked_shl(amount)
        .filter(|shifted| shifted >> amount == value)
        .ok_or_else(|| Error::EvalError("Integer overflow in <<".into()))
}

fn builtin_shr(value: IntType, amount: IntType) -> Result<IntType, Error> {
    let amount = shift_amount(amount)?;
    // Arithmetic shift: everything past the width collapses to the sign
    Ok(value.checked_shr(amount).unwrap_or(if value < 0 { -1 } else { 0 }))
}

// Macro to generate chained numeric comparison functions
macro_rules! numeric_comparison {
    ($name:ident, $op:tt) => {
        fn $name(args: &[Expr]) -> Result<Expr, Error> {
            let numbers = to_numbers(args)?;
            if numbers.len() < 2 {
                return Err(Error::arity_error(Arity::AtLeast(2), numbers.len()));
            }
            // All adjacent pairs must satisfy the comparison
            Ok(Expr::Bool(numbers.windows(2).all(|pair| pair[0] $op pair[1])))
        }
    };
}

numeric_comparison!(builtin_gt, >);
numeric_comparison!(builtin_lt, <);
numeric_comparison!(builtin_ge, >=);
numeric_comparison!(builtin_le, <=);

/// Structural equality where numbers compare by value across subkinds
fn values_equal(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Integer(_) | Expr::Float(_), Expr::Integer(_) | Expr::Float(_)) => {
            Number::try_from(a.clone()).ok() == Number::try_from(b.clone()).ok()
        }
        (Expr::List(xs), Expr::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => a == b,
    }
}

fn builtin_equal(a: Expr, b: Expr) -> bool {
    values_equal(&a, &b)
}

fn builtin_not_equal(a: Expr, b: Expr) -> bool {
    !values_equal(&a, &b)
}

fn builtin_not(value: Expr) -> bool {
    !value.is_truthy()
}

/// Returns the first falsy argument, or the last one
fn builtin_and(args: &[Expr]) -> Result<Expr, Error> {
    deciding_value(args, false)
}

/// Returns the first truthy argument, or the last one
fn builtin_or(args: &[Expr]) -> Result<Expr, Error> {
    deciding_value(args, true)
}

fn deciding_value(args: &[Expr], stop_when: bool) -> Result<Expr, Error> {
    let Some(last) = args.last() else {
        return Err(Error::arity_error(Arity::AtLeast(1), 0));
    };
    Ok(args
        .iter()
        .find(|arg| arg.is_truthy() == stop_when)
        .unwrap_or(last)
        .clone())
}

fn builtin_is_identical(a: Expr, b: Expr) -> bool {
    a.is_identical(&b)
}

fn builtin_list(args: &[Expr]) -> Result<Expr, Error> {
    Ok(Expr::list(args.to_vec()))
}

fn builtin_fst(list: ListRef) -> Result<Expr, Error> {
    list.first()
        .cloned()
        .ok_or_else(|| Error::EvalError("fst of empty list".into()))
}

fn builtin_rst(list: ListRef) -> Result<Expr, Error> {
    match list.split_first() {
        Some((_, rest)) => Ok(Expr::list(rest.to_vec())),
        None => Err(Error::EvalError("rst of empty list".into())),
    }
}

fn builtin_cons(first: Expr, rest: ListRef) -> Expr {
    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(first);
    items.extend(rest.iter().cloned());
    Expr::list(items)
}

fn builtin_append(args: &[Expr]) -> Result<Expr, Error> {
    let mut items = Vec::new();
    for arg in args {
        let list = ListRef::try_from(arg.clone())?;
        items.extend(list.iter().cloned());
    }
    Ok(Expr::list(items))
}

fn builtin_add_element(list: ListRef, item: Expr) -> Expr {
    let mut items = list.to_vec();
    items.push(item);
    Expr::list(items)
}

/// `(map f xs ys ...)` applies `f` element-wise, stopping at the shortest list
fn builtin_map(args: &[Expr]) -> Result<Expr, Error> {
    let Some((func, lists)) = args.split_first() else {
        return Err(Error::arity_error(Arity::AtLeast(2), 0));
    };
    let lists = lists
        .iter()
        .cloned()
        .map(ListRef::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let shortest = lists.iter().map(|list| list.len()).min().unwrap_or(0);

    let mut results = Vec::with_capacity(shortest);
    for i in 0..shortest {
        let call_args = lists.iter().map(|list| list[i].clone()).collect();
        results.push(apply(func, call_args)?);
    }
    Ok(Expr::list(results))
}

fn builtin_filter(func: Expr, list: ListRef) -> Result<Expr, Error> {
    let mut kept = Vec::new();
    for item in list.iter() {
        if apply(&func, vec![item.clone()])?.is_truthy() {
            kept.push(item.clone());
        }
    }
    Ok(Expr::list(kept))
}

fn builtin_len(list: ListRef) -> Result<IntType, Error> {
    IntType::try_from(list.len()).map_err(|_| Error::EvalError("list too long".into()))
}

fn builtin_is_number(value: Expr) -> bool {
    value.is_number()
}

fn builtin_is_symbol(value: Expr) -> bool {
    matches!(value, Expr::Symbol(_))
}

fn builtin_is_list(value: Expr) -> bool {
    matches!(value, Expr::List(_))
}

fn builtin_is_procedure(value: Expr) -> bool {
    value.is_callable()
}

fn builtin_is_null(value: Expr) -> bool {
    value.is_nil()
}

/// Render `args` space-separated on one line
fn write_line(out: &mut impl io::Write, args: &[Expr]) -> io::Result<()> {
    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    writeln!(out, "{}", rendered.join(" "))
}

fn builtin_write(args: &[Expr]) -> Result<Expr, Error> {
    write_line(&mut io::stdout().lock(), args)
        .map_err(|e| Error::EvalError(format!("write failed: {e}")))?;
    Ok(Expr::Unspecified)
}

/// Evaluates to its last (already evaluated) argument
fn builtin_eval(args: &[Expr]) -> Result<Expr, Error> {
    args.last()
        .cloned()
        .ok_or_else(|| Error::arity_error(Arity::AtLeast(1), 0))
}

fn builtin_sqrt(n: Number) -> Result<FloatType, Error> {
    let x = n.as_float();
    if x < 0.0 {
        return Err(Error::EvalError("math domain error: sqrt of negative number".into()));
    }
    Ok(x.sqrt())
}

fn builtin_exp(n: Number) -> FloatType {
    n.as_float().exp()
}

/// `(log x)` is the natural logarithm, `(log x base)` uses the given base
fn builtin_log(args: &[Expr]) -> Result<Expr, Error> {
    let numbers = to_numbers(args)?;
    let (x, base) = match numbers.as_slice() {
        [x] => (x.as_float(), None),
        [x, base] => (x.as_float(), Some(base.as_float())),
        _ => return Err(Error::arity_error(Arity::Range(1, 2), numbers.len())),
    };
    if x <= 0.0 {
        return Err(Error::EvalError("math domain error: log of non-positive number".into()));
    }
    match base {
        None => Ok(Expr::Float(x.ln())),
        Some(base) if base <= 0.0 || base == 1.0 => {
            Err(Error::EvalError(format!("math domain error: invalid log base {base:?}")))
        }
        Some(base) => Ok(Expr::Float(x.ln() / base.ln())),
    }
}

fn builtin_sin(n: Number) -> FloatType {
    n.as_float().sin()
}

fn builtin_cos(n: Number) -> FloatType {
    n.as_float().cos()
}

fn builtin_tan(n: Number) -> FloatType {
    n.as_float().tan()
}

fn builtin_floor(n: Number) -> Result<IntType, Error> {
    match n {
        Number::Int(i) => Ok(i),
        Number::Float(x) => float_to_int(x.floor(), "floor"),
    }
}

fn builtin_ceil(n: Number) -> Result<IntType, Error> {
    match n {
        Number::Int(i) => Ok(i),
        Number::Float(x) => float_to_int(x.ceil(), "ceil"),
    }
}

/// Global registry of all native built-in functions.
///
/// Typed implementations go through the same adapter layer used for
/// custom builtin registration; slice-based ones are wrapped directly.
/// This is done once at initialization time via a `LazyLock`.
static BUILTIN_OPS: LazyLock<Vec<BuiltinOp>> = LazyLock::new(|| {
    fn builtin_fixed<Args, R, F>(f: F) -> Arc<OperationFn>
    where
        F: IntoOperation<Args, R>,
    {
        f.into_operation()
    }

    fn builtin_variadic(f: fn(&[Expr]) -> Result<Expr, Error>) -> Arc<OperationFn> {
        Arc::new(move |args: Vec<Expr>| f(&args))
    }

    fn op(name: &'static str, arity: Arity, func: Arc<OperationFn>) -> BuiltinOp {
        BuiltinOp { name, arity, func }
    }

    use Arity::{Any, AtLeast, Exact, Range};

    vec![
        // Arithmetic operations
        op("+", Any, builtin_variadic(builtin_add)),
        op("-", AtLeast(1), builtin_variadic(builtin_sub)),
        op("*", AtLeast(1), builtin_variadic(builtin_mul)),
        op("/", AtLeast(2), builtin_variadic(builtin_div)),
        op("abs", Exact(1), builtin_fixed::<(Number,), Number, _>(builtin_abs)),
        op("pow", Exact(2), builtin_fixed::<(Number, Number), FloatType, _>(builtin_pow)),
        op("round", Range(1, 2), builtin_variadic(builtin_round)),
        op("max", AtLeast(1), builtin_variadic(builtin_max)),
        op("min", AtLeast(1), builtin_variadic(builtin_min)),
        op("<<", Exact(2), builtin_fixed::<(IntType, IntType), IntType, _>(builtin_shl)),
        op(">>", Exact(2), builtin_fixed::<(IntType, IntType), IntType, _>(builtin_shr)),
        // Comparison operations
        op(">", AtLeast(2), builtin_variadic(builtin_gt)),
        op("<", AtLeast(2), builtin_variadic(builtin_lt)),
        op(">=", AtLeast(2), builtin_variadic(builtin_ge)),
        op("<=", AtLeast(2), builtin_variadic(builtin_le)),
        op("=", Exact(2), builtin_fixed::<(Expr, Expr), bool, _>(builtin_equal)),
        op("~=", Exact(2), builtin_fixed::<(Expr, Expr), bool, _>(builtin_not_equal)),
        // Logical operations
        op("not", Exact(1), builtin_fixed::<(Expr,), bool, _>(builtin_not)),
        op("and", AtLeast(1), builtin_variadic(builtin_and)),
        op("or", AtLeast(1), builtin_variadic(builtin_or)),
        op("eq?", Exact(2), builtin_fixed::<(Expr, Expr), bool, _>(builtin_is_identical)),
        // List operations
        op("list", Any, builtin_variadic(builtin_list)),
        op("fst", Exact(1), builtin_fixed::<(ListRef,), Expr, _>(builtin_fst)),
        op("rst", Exact(1), builtin_fixed::<(ListRef,), Expr, _>(builtin_rst)),
        op("cons", Exact(2), builtin_fixed::<(Expr, ListRef), Expr, _>(builtin_cons)),
        op("append", Any, builtin_variadic(builtin_append)),
        op("add", Exact(2), builtin_fixed::<(ListRef, Expr), Expr, _>(builtin_add_element)),
        op("map", AtLeast(2), builtin_variadic(builtin_map)),
        op("filter", Exact(2), builtin_fixed::<(Expr, ListRef), Expr, _>(builtin_filter)),
        op("len", Exact(1), builtin_fixed::<(ListRef,), IntType, _>(builtin_len)),
        // Predicates
        op("num?", Exact(1), builtin_fixed::<(Expr,), bool, _>(builtin_is_number)),
        op("sym?", Exact(1), builtin_fixed::<(Expr,), bool, _>(builtin_is_symbol)),
        op("list?", Exact(1), builtin_fixed::<(Expr,), bool, _>(builtin_is_list)),
        op("proc?", Exact(1), builtin_fixed::<(Expr,), bool, _>(builtin_is_procedure)),
        op("null?", Exact(1), builtin_fixed::<(Expr,), bool, _>(builtin_is_null)),
        // Output and sequencing
        op("write", Any, builtin_variadic(builtin_write)),
        op("print", Any, builtin_variadic(builtin_write)),
        op("eval", AtLeast(1), builtin_variadic(builtin_eval)),
        // Math operations
        op("sqrt", Exact(1), builtin_fixed::<(Number,), FloatType, _>(builtin_sqrt)),
        op("exp", Exact(1), builtin_fixed::<(Number,), FloatType, _>(builtin_exp)),
        op("log", Range(1, 2), builtin_variadic(builtin_log)),
        op("sin", Exact(1), builtin_fixed::<(Number,), FloatType, _>(builtin_sin)),
        op("cos", Exact(1), builtin_fixed::<(Number,), FloatType, _>(builtin_cos)),
        op("tan", Exact(1), builtin_fixed::<(Number,), FloatType, _>(builtin_tan)),
        op("floor", Exact(1), builtin_fixed::<(Number,), IntType, _>(builtin_floor)),
        op("ceil", Exact(1), builtin_fixed::<(Number,), IntType, _>(builtin_ceil)),
    ]
});

/// Lazy static map from name to BuiltinOp (private - use find_builtin)
static BUILTIN_BY_NAME: LazyLock<HashMap<&'static str, &'static BuiltinOp>> =
    LazyLock::new(|| {
        let ops: &'static [BuiltinOp] = BUILTIN_OPS.as_slice();
        ops.iter().map(|op| (op.name, op)).collect()
    });

/// Get all native builtin functions, in registration order
pub fn get_builtin_ops() -> &'static [BuiltinOp] {
    BUILTIN_OPS.as_slice()
}

/// Find a native builtin function by name
pub fn find_builtin(name: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_BY_NAME.get(name).copied()
}

/// Find a special form by keyword
pub fn find_special_form(name: &str) -> Option<&'static SpecialForm> {
    SPECIAL_FORMS.iter().find(|form| form.name == name)
}

/// All special forms
pub fn get_special_forms() -> &'static [SpecialForm] {
    &SPECIAL_FORMS
}

/// Named constants bound next to the builtins
pub fn constants() -> Vec<(&'static str, Expr)> {
    vec![
        ("pi", Expr::Float(std::f64::consts::PI)),
        ("e", Expr::Float(std::f64::consts::E)),
        ("tau", Expr::Float(std::f64::consts::TAU)),
        ("true", Expr::Bool(true)),
        ("false", Expr::Bool(false)),
    ]
}
