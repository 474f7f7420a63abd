//! Helpers for the interactive driver.
//!
//! The driver itself (line editing, history, printing) lives in the `lispy`
//! binary; this module keeps the parts that do not touch the terminal so
//! they can be tested: control-command recognition, evaluating one input
//! line and rendering the environment listing.

use tracing::debug;

use crate::Error;
use crate::ast::Expr;
use crate::evaluator::{Environment, eval};
use crate::reader::parse_program;

/// Driver commands recognized outside the language itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the session
    Quit,
    /// Clear the screen
    Clean,
    /// Print usage text
    Help,
    /// List the current bindings
    Env,
}

/// Recognize a control command. Anything else is program text.
pub fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim() {
        "quit" | "q" | ":quit" | ":exit" => Command::Quit,
        "clean" | ":clean" => Command::Clean,
        "help" | ":help" => Command::Help,
        "env" | ":env" => Command::Env,
        _ => return None,
    };
    debug!(?command, "control command");
    Some(command)
}

pub const HELP_TEXT: &str = "\
Commands:
  help       - Show this help message
  env        - Show current environment bindings
  clean      - Clear the screen
  quit, q    - Exit the interpreter
  Ctrl+C     - Exit the interpreter

Special forms:
  (show EXPR)             EXPR itself, unevaluated
  (if TEST THEN ELSE)     THEN when TEST is truthy, ELSE otherwise
  (def! NAME EXPR)        bind NAME in the current scope
  (set! NAME EXPR)        rebind the nearest existing NAME
  (lambda (PARAM...) BODY)

Falsy values: false, 0, 0.0 and the empty list.

Examples:
  (def! square (lambda (n) (* n n)))
  (square 12)
  (map square (list 1 2 3))
  (if (> 3 2) 1 2)
";

/// Parse `line` as a sequence of expressions and evaluate each in `env`,
/// in order, handing every printable result to `emit` as soon as its form
/// has been evaluated. Definitions and other forms with no value are
/// skipped. Stops at the first error; earlier forms keep their effects.
pub fn eval_line_with(
    line: &str,
    env: &Environment,
    mut emit: impl FnMut(Expr),
) -> Result<(), Error> {
    for expr in parse_program(line)? {
        let value = eval(&expr, env)?;
        if !matches!(value, Expr::Unspecified) {
            emit(value);
        }
    }
    Ok(())
}

/// Like [`eval_line_with`], collecting the printable results.
pub fn eval_line(line: &str, env: &Environment) -> Result<Vec<Expr>, Error> {
    let mut results = Vec::new();
    eval_line_with(line, env, |value| results.push(value))?;
    Ok(results)
}

/// Render every binding visible from `env`: builtins by name in columns,
/// everything else as `name = value`.
pub fn format_environment(env: &Environment) -> String {
    let bindings = env.get_all_bindings();
    let mut out = String::new();

    if bindings.is_empty() {
        out.push_str("Environment is empty.\n");
        return out;
    }

    out.push_str(&format!("Environment bindings ({} total):\n\n", bindings.len()));

    let (builtins, user_defined): (Vec<_>, Vec<_>) = bindings
        .into_iter()
        .partition(|(_, value)| matches!(value, Expr::Builtin(_)));

    if !builtins.is_empty() {
        out.push_str(&format!("Built-in functions ({}):\n", builtins.len()));
        for row in builtins.chunks(4) {
            for (name, _) in row {
                out.push_str(&format!("  {name:<15}"));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    if !user_defined.is_empty() {
        out.push_str(&format!("Values ({}):\n", user_defined.len()));
        for (name, value) in user_defined {
            out.push_str(&format!("  {name} = {value}\n"));
        }
    }

    out
}
