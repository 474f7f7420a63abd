use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use lispy::Environment;
use lispy::evaluator::create_global_env;
use lispy::repl::{Command, HELP_TEXT, eval_line_with, format_environment, parse_command};
use miette::{IntoDiagnostic, WrapErr};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Interpreter for a small Lisp-family expression language
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program file to run instead of starting the interactive session
    file: Option<PathBuf>,

    /// Evaluate EXPR, print its values and exit
    #[arg(short, long, value_name = "EXPR", conflicts_with = "file")]
    eval: Option<String>,

    /// Prompt shown by the interactive session
    #[arg(long, default_value = "lispy> ")]
    prompt: String,

    /// Load and save line history from this file
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Stack size of the interpreter thread, in MiB
    #[arg(long, env = "LISPY_STACK_MB", default_value_t = 256)]
    stack_mb: usize,

    /// Do not print the banner
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> miette::Result<ExitCode> {
    let args = Args::parse();
    init_tracing();

    // Evaluation recurses on the native stack, so run it on a thread with
    // a stack large enough for deeply recursive programs.
    let stack_size = args.stack_mb.max(1).saturating_mul(1024 * 1024);
    let worker = thread::Builder::new()
        .name("lispy".into())
        .stack_size(stack_size)
        .spawn(move || run(&args))
        .into_diagnostic()
        .wrap_err("failed to start the interpreter thread")?;

    match worker.join() {
        Ok(result) => result,
        Err(_) => Err(miette::miette!("the interpreter stopped unexpectedly")),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LISPY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> miette::Result<ExitCode> {
    let env = create_global_env();

    if let Some(source) = &args.eval {
        return Ok(run_source(source, &env));
    }

    if let Some(path) = &args.file {
        let source = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {} failed", path.display()))?;
        return Ok(run_source(&source, &env));
    }

    run_repl(args, &env)?;
    Ok(ExitCode::SUCCESS)
}

/// Evaluate a whole program non-interactively, printing each value as its
/// form finishes. An error is reported the way the session reports it and
/// ends the run with a failing status.
fn run_source(source: &str, env: &Environment) -> ExitCode {
    match eval_line_with(source, env, |value| println!("{value}")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_repl(args: &Args, env: &Environment) -> miette::Result<()> {
    if !args.quiet {
        println!("lispy {}", env!("CARGO_PKG_VERSION"));
        println!("Enter expressions like: (+ 1 2)");
        println!("Type help for more commands, or Ctrl+C to exit.");
        println!();
    }

    let mut rl = DefaultEditor::new()
        .into_diagnostic()
        .wrap_err("could not initialize the line editor")?;

    if let Some(path) = &args.history
        && let Err(err) = rl.load_history(path)
    {
        debug!(%err, path = %path.display(), "no history loaded");
    }

    loop {
        match rl.readline(&args.prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match parse_command(line) {
                    Some(Command::Quit) => break,
                    Some(Command::Clean) => {
                        if let Err(err) = rl.clear_screen() {
                            warn!(%err, "could not clear the screen");
                        }
                    }
                    Some(Command::Help) => print!("{HELP_TEXT}"),
                    Some(Command::Env) => print!("{}", format_environment(env)),
                    None => {
                        if let Err(e) = eval_line_with(line, env, |value| println!("{value}")) {
                            println!("Error: {e}");
                        }
                    }
                }
            }

            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                return Err(err).into_diagnostic().wrap_err("reading input failed");
            }
        }
    }

    if let Some(path) = &args.history
        && let Err(err) = rl.save_history(path)
    {
        warn!(%err, path = %path.display(), "could not save history");
    }

    println!("Goodbye!");
    Ok(())
}
