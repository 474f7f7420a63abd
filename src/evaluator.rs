use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::Error;
use crate::ast::Expr;
use crate::builtinops::{constants, find_special_form, get_builtin_ops};

pub mod environment;
pub mod intooperation;
pub mod procedure;

pub use environment::Environment;
use procedure::{Builtin, Callable, Procedure};

const CONTEXT_MARKER: &str = "\n  Context: ";
const LAMBDA_MARKER: &str = "\n  In lambda: ";

/// Evaluate an expression in the given environment (public API)
///
/// Numbers, booleans and callables evaluate to themselves, symbols are
/// resolved through the environment chain and lists are either special
/// forms or procedure applications.
pub fn eval(expr: &Expr, env: &Environment) -> Result<Expr, Error> {
    match expr {
        Expr::Integer(_)
        | Expr::Float(_)
        | Expr::Bool(_)
        | Expr::Procedure(_)
        | Expr::Builtin(_)
        | Expr::Unspecified => Ok(expr.clone()),

        // Variable lookup; the bound value is final and never re-evaluated
        Expr::Symbol(name) => env.lookup(name),

        // Special forms and procedure application
        Expr::List(elements) => {
            eval_list(expr, elements, env).map_err(|err| add_context(err, expr))
        }
    }
}

/// Append a note to evaluation and type errors, keeping only the
/// innermost note of each kind.
fn annotate(error: Error, marker: &str, note: &dyn std::fmt::Display) -> Error {
    match error {
        Error::EvalError(msg) if !msg.contains(marker) => {
            Error::EvalError(format!("{msg}{marker}{note}"))
        }
        Error::TypeError(msg) if !msg.contains(marker) => {
            Error::TypeError(format!("{msg}{marker}{note}"))
        }
        // Syntax, unbound name and arity errors carry their own context
        other => other,
    }
}

/// Helper function to add expression context to errors
fn add_context(error: Error, expr: &Expr) -> Error {
    annotate(error, CONTEXT_MARKER, &format_args!("while evaluating: {expr}"))
}

/// Helper function to evaluate argument expressions, strictly left to right
fn eval_args(args: &[Expr], env: &Environment) -> Result<Vec<Expr>, Error> {
    args.iter().map(|arg| eval(arg, env)).collect()
}

/// Evaluate a list expression: a special form if the head is one of the
/// reserved keywords, a procedure application otherwise.
fn eval_list(whole: &Expr, elements: &[Expr], env: &Environment) -> Result<Expr, Error> {
    match elements {
        [] => Err(Error::EvalError("Cannot evaluate empty list".to_owned())),

        [head, operands @ ..] => {
            if let Expr::Symbol(keyword) = head
                && let Some(form) = find_special_form(keyword)
            {
                if form.arity.validate(operands.len()).is_err() {
                    return Err(Error::arity_error_with_expr(
                        form.arity,
                        operands.len(),
                        whole.to_string(),
                    ));
                }
                return (form.eval)(operands, env);
            }

            let func = eval(head, env)?;
            let args = eval_args(operands, env)?;
            apply(&func, args)
        }
    }
}

/// Apply an evaluated callable to evaluated arguments.
///
/// This is the single application path shared by the evaluator and by
/// higher-order builtins such as `map` and `filter`.
pub fn apply(func: &Expr, args: Vec<Expr>) -> Result<Expr, Error> {
    trace!(callee = %func, argc = args.len(), "apply");
    match func {
        Expr::Builtin(builtin) => builtin.call(args),
        Expr::Procedure(procedure) => procedure
            .call(args)
            .map_err(|err| annotate(err, LAMBDA_MARKER, &procedure.body)),
        other => Err(Error::TypeError(format!(
            "Cannot apply non-procedure: {other}"
        ))),
    }
}

/// Reject binding a reserved keyword; it could never be referenced
fn check_bindable(name: &str) -> Result<(), Error> {
    if find_special_form(name).is_some() {
        return Err(Error::EvalError(format!(
            "Cannot bind special form name: {name}"
        )));
    }
    Ok(())
}

/// Evaluate show special form: the operand, unevaluated
pub(crate) fn eval_show(args: &[Expr], _env: &Environment) -> Result<Expr, Error> {
    match args {
        [expr] => Ok(expr.clone()),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

/// Evaluate if special form
pub(crate) fn eval_if(args: &[Expr], env: &Environment) -> Result<Expr, Error> {
    match args {
        [test, consequent, alternative] => {
            if eval(test, env)?.is_truthy() {
                eval(consequent, env)
            } else {
                eval(alternative, env)
            }
        }
        _ => Err(Error::arity_error(3, args.len())),
    }
}

/// Evaluate def! special form: bind in the current frame only
pub(crate) fn eval_define(args: &[Expr], env: &Environment) -> Result<Expr, Error> {
    match args {
        [Expr::Symbol(name), expr] => {
            check_bindable(name)?;
            let value = eval(expr, env)?;
            debug!(name = %name, value = %value, "def!");
            env.define(name.clone(), value);
            Ok(Expr::Unspecified)
        }
        [_, _] => Err(Error::TypeError("def! requires a symbol".to_owned())),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Evaluate set! special form: overwrite the nearest existing binding
pub(crate) fn eval_set(args: &[Expr], env: &Environment) -> Result<Expr, Error> {
    match args {
        [Expr::Symbol(name), expr] => {
            let value = eval(expr, env)?;
            debug!(name = %name, value = %value, "set!");
            env.assign(name, value)?;
            Ok(Expr::Unspecified)
        }
        [_, _] => Err(Error::TypeError("set! requires a symbol".to_owned())),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Evaluate lambda special form: capture the current environment by reference
pub(crate) fn eval_lambda(args: &[Expr], env: &Environment) -> Result<Expr, Error> {
    match args {
        [Expr::List(param_list), body] => {
            let mut params: Vec<String> = Vec::with_capacity(param_list.len());
            for param in param_list.iter() {
                match param {
                    Expr::Symbol(name) => {
                        if params.contains(name) {
                            return Err(Error::EvalError(format!(
                                "Duplicate parameter name: {name}"
                            )));
                        }
                        check_bindable(name)?;
                        params.push(name.clone());
                    }
                    _ => {
                        return Err(Error::TypeError(
                            "Lambda parameters must be symbols".to_owned(),
                        ));
                    }
                }
            }

            Ok(Expr::Procedure(Rc::new(Procedure::new(
                params,
                body.clone(),
                env.clone(),
            ))))
        }
        [_, _] => Err(Error::TypeError(
            "Lambda parameters must be a list".to_owned(),
        )),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Create a global environment with built-in functions and constants
pub fn create_global_env() -> Environment {
    let env = Environment::new();

    env.extend(get_builtin_ops().iter().map(|op| {
        let builtin = Builtin::new(op.name, op.arity, Arc::clone(&op.func));
        (op.name.to_owned(), Expr::Builtin(builtin))
    }));
    env.extend(
        constants()
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value)),
    );

    debug!(
        builtins = get_builtin_ops().len(),
        "created global environment"
    );
    env
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::Error;
    use crate::ast::{IntType, ListRef, Number, nil, sym, val};
    use crate::builtinops::Arity;
    use crate::reader::parse;

    #[test]
    fn test_register_builtin_operation_add() {
        fn add(a: IntType, b: IntType) -> IntType {
            a + b
        }
        let env = create_global_env();
        env.register_builtin_operation::<_, (IntType, IntType), IntType>("add2", add);
        let result = eval(&parse("(add2 7 5)").unwrap(), &env).unwrap();
        assert_eq!(result, val(12));
        assert!(matches!(
            eval(&parse("(add2 7)").unwrap(), &env),
            Err(Error::ArityError { .. })
        ));
    }

    #[test]
    fn test_register_builtin_operation_result_builtin() {
        fn checked_half(n: Number) -> Result<Number, Error> {
            match n {
                Number::Int(i) if i % 2 == 0 => Ok(Number::Int(i / 2)),
                _ => Err(Error::EvalError("odd number".into())),
            }
        }
        let env = create_global_env();
        env.register_builtin_operation::<_, (Number,), Number>("half", checked_half);
        assert_eq!(eval(&parse("(half 8)").unwrap(), &env).unwrap(), val(4));
        let err = eval(&parse("(half 7)").unwrap(), &env).unwrap_err();
        assert!(format!("{err}").contains("odd number"));
    }

    #[test]
    fn test_register_builtin_function_with_list_param() {
        fn total(args: &[Expr]) -> Result<Expr, Error> {
            let mut sum = 0;
            for arg in args {
                for item in ListRef::try_from(arg.clone())?.iter() {
                    sum += IntType::try_from(item.clone())?;
                }
            }
            Ok(val(sum))
        }
        let env = create_global_env();
        env.register_builtin_function("total", Arity::AtLeast(1), total);
        assert_eq!(
            eval(&parse("(total (list 1 2) (list 3))").unwrap(), &env).unwrap(),
            val(6)
        );
        assert!(eval(&parse("(total)").unwrap(), &env).is_err());
    }

    /// Test result variants for comprehensive testing
    #[derive(Debug)]
    enum TestResult {
        EvalResult(Expr),            // Evaluation should succeed with this value
        SpecificError(&'static str), // Evaluation should fail with error containing this string
        Error,                       // Evaluation should fail (any error)
    }
    use TestResult::*;

    /// Test environment containing test cases that share state
    struct TestEnvironment(Vec<(&'static str, TestResult)>);

    /// Micro-helper for success cases in comprehensive tests
    fn success<T: Into<Expr>>(value: T) -> TestResult {
        EvalResult(val(value))
    }

    /// Macro for setup expressions that return Unspecified (like def!)
    macro_rules! test_setup {
        ($expr:expr) => {
            ($expr, EvalResult(Expr::Unspecified))
        };
    }

    /// Run tests in isolated environments with shared state
    fn run_tests_in_environment(test_environments: Vec<TestEnvironment>) {
        for (env_idx, TestEnvironment(test_cases)) in test_environments.iter().enumerate() {
            let env = create_global_env();

            for (test_idx, (input, expected)) in test_cases.iter().enumerate() {
                let test_id = format!("Environment #{} test #{}", env_idx + 1, test_idx + 1);
                execute_test_case(input, expected, &env, &test_id);
            }
        }
    }

    /// Execute a single test case with detailed error reporting
    fn execute_test_case(input: &str, expected: &TestResult, env: &Environment, test_id: &str) {
        let expr = match parse(input) {
            Ok(expr) => expr,
            Err(parse_err) => {
                panic!("{test_id}: unexpected parse error for '{input}': {parse_err:?}");
            }
        };

        match (eval(&expr, env), expected) {
            (Ok(actual), EvalResult(expected_val)) => {
                // Unspecified never compares equal, so match it by kind
                match (&actual, expected_val) {
                    (Expr::Unspecified, Expr::Unspecified) => {}
                    _ => {
                        assert_eq!(
                            &actual, expected_val,
                            "{test_id}: unexpected result for '{input}'"
                        );
                    }
                }
            }

            (Err(_), Error) => {} // Expected generic error
            (Err(e), SpecificError(expected_text)) => {
                let error_msg = format!("{e}");
                assert!(
                    error_msg.contains(expected_text),
                    "{test_id}: error should contain '{expected_text}', got: {error_msg}"
                );
            }
            (Ok(actual), Error) => {
                panic!("{test_id}: expected error for '{input}', got {actual:?}");
            }
            (Ok(actual), SpecificError(expected_text)) => {
                panic!("{test_id}: expected error containing '{expected_text}', got {actual:?}");
            }
            (Err(err), EvalResult(expected_val)) => {
                panic!("{test_id}: expected {expected_val:?} for '{input}', got error {err:?}");
            }
        }
    }

    /// Simplified test runner: every case in a fresh global environment
    fn run_comprehensive_tests(test_cases: Vec<(&str, TestResult)>) {
        for (i, (input, expected)) in test_cases.iter().enumerate() {
            let env = create_global_env();
            let test_id = format!("#{}", i + 1);
            execute_test_case(input, expected, &env, &test_id);
        }
    }

    #[test]
    #[expect(clippy::too_many_lines)] // Comprehensive test coverage is intentionally thorough
    fn test_comprehensive_operations_data_driven() {
        let test_cases = vec![
            // === SELF-EVALUATING FORMS ===
            ("42", success(42)),
            ("-271", success(-271)),
            ("3.5", success(3.5)),
            ("9223372036854775807", success(IntType::MAX)),
            ("true", success(true)),
            ("false", success(false)),
            ("pi", success(std::f64::consts::PI)),
            // === ARITHMETIC ===
            ("(+ 1 2)", success(3)),
            ("(+ 1 (* 2 3))", success(7)),
            ("(- 10)", success(-10)),
            ("(* (+ 1 2) (- 5 2))", success(9)),
            ("(/ 1 2)", success(0.5)),
            ("(/ 6 3)", success(2.0)),
            ("(+ 1 2.0)", success(3.0)),
            ("(abs -7)", success(7)),
            ("(pow 2 3)", success(8.0)),
            ("(+ 9223372036854775807 1)", SpecificError("Integer overflow")),
            ("(/ 1 0)", SpecificError("division by zero")),
            // === COMPARISON AND LOGIC ===
            ("(> 3 2)", success(true)),
            ("(<= 2 2 3)", success(true)),
            ("(= 2 2.0)", success(true)),
            ("(~= 1 2)", success(true)),
            ("(not (list))", success(true)),
            ("(and 1 (list 1) 3)", success(3)),
            ("(or 0 (list) 7)", success(7)),
            // === CONDITIONALS ===
            ("(if (> 3 2) 1 2)", success(1)),
            ("(if (> 2 3) 1 2)", success(2)),
            ("(if 0 1 2)", success(2)),
            ("(if 0.0 1 2)", success(2)),
            ("(if (list) 1 2)", success(2)),
            ("(if (list 0) 1 2)", success(1)),
            ("(if (show x) 1 2)", success(1)),
            // Only the chosen branch is evaluated
            ("(if 1 2 undefined-var)", success(2)),
            ("(if 0 undefined-var 3)", success(3)),
            ("(if 1 2)", SpecificError("ArityError: expression (if 1 2)")),
            ("(if 1 2 3 4)", Error),
            // === QUOTING ===
            ("(show (+ 1 2))", success(vec![sym("+"), val(1), val(2)])),
            ("(show x)", success(sym("x"))),
            ("(show ())", EvalResult(nil())),
            ("(show)", SpecificError("ArityError")),
            ("(show a b)", Error),
            // === LISTS ===
            ("(list 1 2 3)", success([1, 2, 3])),
            ("(fst (list 1 2 3))", success(1)),
            ("(rst (list 1 2 3))", success([2, 3])),
            ("(cons 0 (list 1))", success([0, 1])),
            ("(len (append (list 1) (list 2 3)))", success(3)),
            ("(map (lambda (n) (* n n)) (list 1 2 3))", success([1, 4, 9])),
            ("(map + (list 1 2) (list 10 20))", success([11, 22])),
            (
                "(filter (lambda (n) (> n 1)) (list 1 2 3))",
                success([2, 3]),
            ),
            ("(null? (list))", success(true)),
            ("(eq? (list) (list))", success(true)),
            ("(eq? (list 1) (list 1))", success(false)),
            ("(sym? (show a))", success(true)),
            ("(proc? fst)", success(true)),
            ("(proc? (lambda () 1))", success(true)),
            ("(eval 1 2 3)", success(3)),
            // === LAMBDA ===
            ("((lambda (n) (+ n 1)) 3)", success(4)),
            ("((lambda () 5))", success(5)),
            ("((lambda (f x) (f x x)) + 5)", success(10)),
            ("((lambda (x) x) 1 2)", SpecificError("ArityError")),
            ("(lambda (x x) x)", SpecificError("Duplicate parameter name: x")),
            ("(lambda (1) x)", SpecificError("Lambda parameters must be symbols")),
            ("(lambda x x)", SpecificError("Lambda parameters must be a list")),
            ("(lambda (if) 1)", SpecificError("Cannot bind special form name: if")),
            ("(lambda (x))", SpecificError("ArityError")),
            // === DEFINITIONS ===
            ("(def! 1 2)", SpecificError("def! requires a symbol")),
            ("(def! x)", SpecificError("ArityError")),
            ("(def! lambda 2)", SpecificError("Cannot bind special form name")),
            ("(set! y 1)", SpecificError("Unbound name: y")),
            ("(set! (y) 1)", SpecificError("set! requires a symbol")),
            // === ERRORS ===
            ("undefined-var", SpecificError("Unbound name: undefined-var")),
            ("if", SpecificError("Unbound name: if")),
            ("()", SpecificError("Cannot evaluate empty list")),
            ("(1 2)", SpecificError("Cannot apply non-procedure: 1")),
            ("((list 1) 2)", SpecificError("Cannot apply non-procedure: (1)")),
            ("(+ 1 (fst (list)))", SpecificError("fst of empty list")),
            (
                "(+ 1 (fst (list)))",
                SpecificError("Context: while evaluating: (fst (list))"),
            ),
            ("(+ 1 x)", SpecificError("Unbound name: x")),
            ("(fst 1)", SpecificError("Type error: expected list, got 1")),
            ("(not)", SpecificError("ArityError: function expected 1 arguments but got 0")),
        ];

        run_comprehensive_tests(test_cases);
    }

    #[test]
    #[expect(clippy::too_many_lines)] // Comprehensive test coverage is intentionally thorough
    fn test_environment_sensitive_operations() {
        let environment_test_cases = vec![
            // === DEFINE AND LOOKUP ===
            TestEnvironment(vec![
                test_setup!("(def! x 5)"),
                ("x", success(5)),
                test_setup!("(def! x (+ x 1))"),
                ("x", success(6)),
                test_setup!("(def! my-plus +)"),
                ("(my-plus 2 3)", success(5)),
            ]),
            // === SET! ===
            TestEnvironment(vec![
                ("(set! y 1)", SpecificError("Unbound name: y")),
                // set! never creates the binding
                ("y", SpecificError("Unbound name: y")),
                test_setup!("(def! y 1)"),
                test_setup!("(set! y (+ y 10))"),
                ("y", success(11)),
            ]),
            // === BUILTINS ARE ORDINARY BINDINGS ===
            TestEnvironment(vec![
                test_setup!("(def! + -)"),
                ("(+ 5 3)", success(2)),
            ]),
            // === LATE BINDING THROUGH THE SHARED ENVIRONMENT ===
            TestEnvironment(vec![
                test_setup!("(def! f (lambda () x))"),
                ("(f)", SpecificError("Unbound name: x")),
                test_setup!("(def! x 10)"),
                ("(f)", success(10)),
                test_setup!("(set! x 20)"),
                ("(f)", success(20)),
            ]),
            // === LEXICAL SCOPING ===
            TestEnvironment(vec![
                test_setup!("(def! x 10)"),
                test_setup!("(def! get-x (lambda () x))"),
                // The parameter shadows the global only inside the body
                ("((lambda (x) (+ x (get-x))) 1)", success(11)),
                ("x", success(10)),
                // def! inside a procedure binds in the call frame
                test_setup!("(def! shadow (lambda () (eval (def! x 99) x)))"),
                ("(shadow)", success(99)),
                ("x", success(10)),
                // set! inside a procedure reaches the enclosing binding
                test_setup!("(def! bump (lambda () (set! x (+ x 1))))"),
                test_setup!("(bump)"),
                ("x", success(11)),
            ]),
            // === CLOSURES WITH PRIVATE STATE ===
            TestEnvironment(vec![
                test_setup!(
                    "(def! make-counter (lambda () ((lambda (count) (lambda () (eval (set! count (+ count 1)) count))) 0)))"
                ),
                test_setup!("(def! c1 (make-counter))"),
                test_setup!("(def! c2 (make-counter))"),
                ("(c1)", success(1)),
                ("(c1)", success(2)),
                ("(c2)", success(1)),
                ("(c1)", success(3)),
            ]),
            // === ARGUMENTS EVALUATE LEFT TO RIGHT ===
            TestEnvironment(vec![
                test_setup!("(def! trace (list))"),
                test_setup!("(def! note (lambda (n) (eval (set! trace (add trace n)) n)))"),
                ("(list (note 1) (note 2) (note 3))", success([1, 2, 3])),
                ("trace", success([1, 2, 3])),
            ]),
            // === HIGHER ORDER FUNCTIONS ===
            TestEnvironment(vec![
                test_setup!("(def! twice (lambda (f x) (f (f x))))"),
                test_setup!("(def! inc (lambda (x) (+ x 1)))"),
                ("(twice inc 5)", success(7)),
                test_setup!("(def! compose (lambda (f g) (lambda (x) (f (g x)))))"),
                ("((compose inc inc) 0)", success(2)),
                ("(map (compose inc abs) (list -1 -2))", success([2, 3])),
            ]),
            // === ERRORS INSIDE PROCEDURES ===
            TestEnvironment(vec![
                test_setup!("(def! head (lambda (xs) (fst xs)))"),
                ("(head (list))", SpecificError("In lambda: (fst xs)")),
                ("(head 3)", SpecificError("Type error")),
            ]),
        ];

        run_tests_in_environment(environment_test_cases);
    }

    #[test]
    fn test_recursive_functions() {
        // Procedures see their own binding through the shared global frame
        let recursive_test_cases = vec![
            TestEnvironment(vec![
                test_setup!("(def! fact (lambda (n) (if (<= n 1) 1 (* n (fact (- n 1))))))"),
                ("(fact 5)", success(120)),
                ("(fact 20)", success(2_432_902_008_176_640_000_i64)),
                ("(fact 21)", SpecificError("Integer overflow")),
            ]),
            TestEnvironment(vec![
                test_setup!("(def! is-even (lambda (n) (if (= n 0) true (is-odd (- n 1)))))"),
                test_setup!("(def! is-odd (lambda (n) (if (= n 0) false (is-even (- n 1)))))"),
                ("(is-even 10)", success(true)),
                ("(is-odd 7)", success(true)),
                ("(is-even 3)", success(false)),
            ]),
            TestEnvironment(vec![
                test_setup!(
                    "(def! countdown (lambda (n) (if (<= n 0) (list) (cons n (countdown (- n 1))))))"
                ),
                ("(countdown 3)", success([3, 2, 1])),
                ("(countdown 0)", EvalResult(nil())),
            ]),
            TestEnvironment(vec![
                test_setup!(
                    "(def! fib (lambda (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))"
                ),
                ("(fib 15)", success(610)),
            ]),
        ];

        run_tests_in_environment(recursive_test_cases);
    }

    #[test]
    fn test_define_is_local_to_fresh_environments() {
        let env = create_global_env();
        eval(&parse("(def! x 5)").unwrap(), &env).unwrap();
        assert_eq!(eval(&sym("x"), &env).unwrap(), val(5));

        let unrelated = create_global_env();
        assert!(matches!(
            eval(&sym("x"), &unrelated),
            Err(Error::UnboundName(name)) if name == "x"
        ));
    }

    #[test]
    fn test_procedure_values() {
        let env = create_global_env();
        let proc = eval(&parse("(lambda (a b) (+ a b))").unwrap(), &env).unwrap();
        assert!(matches!(proc, Expr::Procedure(_)));
        assert_eq!(format!("{proc}"), "#<procedure (a b)>");
        // Procedures are self-evaluating and compare by identity
        assert_eq!(eval(&proc, &env).unwrap(), proc);

        let builtin = eval(&sym("fst"), &env).unwrap();
        assert_eq!(format!("{builtin}"), "#<builtin:fst>");
        assert_eq!(
            apply(&builtin, vec![val([7, 8])]).unwrap(),
            val(7)
        );
        assert!(matches!(
            apply(&val(3), vec![]),
            Err(Error::TypeError(_))
        ));
    }

    #[test]
    fn test_global_env_contents() {
        let env = create_global_env();
        for op in get_builtin_ops() {
            assert!(env.contains_local(op.name), "missing builtin {}", op.name);
        }
        for keyword in ["show", "if", "def!", "set!", "lambda"] {
            assert!(!env.contains_local(keyword));
        }
        assert_eq!(env.lookup("tau").unwrap(), val(std::f64::consts::TAU));
    }

    #[test]
    fn test_context_is_added_once() {
        let env = create_global_env();
        let err = eval(&parse("(+ 1 (+ 2 (fst (list))))").unwrap(), &env).unwrap_err();
        let msg = format!("{err}");
        assert_eq!(msg.matches("Context:").count(), 1, "{msg}");
        assert!(msg.ends_with("while evaluating: (fst (list))"), "{msg}");
    }
}
