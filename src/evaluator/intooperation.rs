// NOTE: This module is internal plumbing for the evaluator.
// It defines the adapter layer that turns strongly-typed Rust
// functions into the erased `OperationFn` used at runtime.
//
// External users should interact with `Environment` and the
// registration helpers there rather than these traits directly.

use crate::Error;
use crate::ast::{Expr, IntType, ListRef, Number};
use std::sync::Arc;

/// Canonical erased builtin function type used by the evaluator.
///
/// Builtins receive ownership of their argument vector, enabling
/// implementations that consume or rearrange arguments if desired.
pub type OperationFn = dyn Fn(Vec<Expr>) -> Result<Expr, Error> + Send + Sync;

/// Turns one evaluated argument into a strongly-typed parameter.
///
/// All supported parameter types are listed here so they are easy to audit.
pub trait FromParam: Sized {
    fn from_arg(value: Expr) -> Result<Self, Error>;
}

impl FromParam for Expr {
    fn from_arg(value: Expr) -> Result<Self, Error> {
        Ok(value)
    }
}

impl FromParam for Number {
    fn from_arg(value: Expr) -> Result<Self, Error> {
        Number::try_from(value)
    }
}

impl FromParam for IntType {
    fn from_arg(value: Expr) -> Result<Self, Error> {
        IntType::try_from(value)
    }
}

impl FromParam for ListRef {
    fn from_arg(value: Expr) -> Result<Self, Error> {
        ListRef::try_from(value)
    }
}

/// Normalize both plain values and `Result`-returning functions into `Result<T, Error>`.
pub trait IntoResult<T> {
    fn into_result(self) -> Result<T, Error>;
}

impl<T> IntoResult<T> for T {
    fn into_result(self) -> Result<T, Error> {
        Ok(self)
    }
}

impl<T> IntoResult<T> for Result<T, Error> {
    fn into_result(self) -> Result<T, Error> {
        self
    }
}

/// Convert a strongly-typed Rust function or closure into the erased
/// [`OperationFn`], parameterized by an argument tuple type.
pub trait IntoOperation<Args, R> {
    /// Number of arguments the wrapped function takes
    const ARITY: usize;

    fn into_operation(self) -> Arc<OperationFn>;
}

// 0-arg functions / closures
impl<F, FR, R> IntoOperation<(), R> for F
where
    F: Fn() -> FR + Send + Sync + 'static,
    FR: IntoResult<R>,
    R: Into<Expr>,
{
    const ARITY: usize = 0;

    fn into_operation(self) -> Arc<OperationFn> {
        Arc::new(move |args: Vec<Expr>| {
            if !args.is_empty() {
                return Err(Error::arity_error(0, args.len()));
            }

            let value: R = <FR as IntoResult<R>>::into_result((self)())?;
            Ok(value.into())
        })
    }
}

/// Implements `IntoOperation` for functions of a given arity.
///
/// Arity is checked up front, then each owned argument is converted
/// through `FromParam` in order before invoking the builtin.
macro_rules! impl_into_operation_for_arity {
    ($arity:expr, $( $p:ident : $A:ident ),+ ) => {
        impl<F, FR, R, $( $A ),+> IntoOperation<( $( $A, )+ ), R> for F
        where
            F: Fn( $( $A ),+ ) -> FR + Send + Sync + 'static,
            FR: IntoResult<R>,
            R: Into<Expr>,
            $( $A: FromParam, )+
        {
            const ARITY: usize = $arity;

            fn into_operation(self) -> Arc<OperationFn> {
                Arc::new(move |args: Vec<Expr>| {
                    let len = args.len();
                    if len != $arity {
                        return Err(Error::arity_error($arity, len));
                    }

                    let mut args = args.into_iter();
                    $(
                        let $p: $A = match args.next() {
                            Some(arg) => <$A as FromParam>::from_arg(arg)?,
                            None => return Err(Error::arity_error($arity, len)),
                        };
                    )+

                    let value: R = <FR as IntoResult<R>>::into_result((self)( $( $p ),+ ))?;
                    Ok(value.into())
                })
            }
        }
    };
}

impl_into_operation_for_arity!(1, p0: A1);
impl_into_operation_for_arity!(2, p0: A1, p1: A2);
impl_into_operation_for_arity!(3, p0: A1, p1: A2, p2: A3);

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::ast::{nil, sym, val};

    #[test]
    fn test_fixed_arity_adapter_converts_arguments() {
        fn add(a: IntType, b: IntType) -> IntType {
            a + b
        }
        let op = <_ as IntoOperation<(IntType, IntType), IntType>>::into_operation(add);
        assert_eq!(op(vec![val(2), val(3)]).unwrap(), val(5));
    }

    #[test]
    fn test_adapter_reports_arity_and_type_errors() {
        fn first(list: ListRef) -> Result<Expr, Error> {
            list.first()
                .cloned()
                .ok_or_else(|| Error::EvalError("empty".into()))
        }
        let op = <_ as IntoOperation<(ListRef,), Expr>>::into_operation(first);

        assert_eq!(op(vec![val([7, 8])]).unwrap(), val(7));
        assert!(matches!(op(vec![]), Err(Error::ArityError { .. })));
        assert!(matches!(op(vec![val(1)]), Err(Error::TypeError(_))));
        assert!(matches!(op(vec![nil()]), Err(Error::EvalError(_))));
    }

    #[test]
    fn test_zero_arg_adapter() {
        let op = <_ as IntoOperation<(), Expr>>::into_operation(|| sym("ok"));
        assert_eq!(op(vec![]).unwrap(), sym("ok"));
        assert!(op(vec![val(1)]).is_err());
    }

    #[test]
    fn test_arity_constant() {
        type Pair = fn(Expr, Expr) -> bool;
        assert_eq!(<Pair as IntoOperation<(Expr, Expr), bool>>::ARITY, 2);
    }
}
