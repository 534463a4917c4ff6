use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use log::{debug, LevelFilter};
use std::io;
use std::io::{BufRead, Write};
use tree_calc::interpreter::error::SyntaxError;
use tree_calc::interpreter::registry::Registry;
use tree_calc::interpreter::Calculator;

/// Evaluates arithmetic expressions, one per line of standard input
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Arguments {
    /// Expressions to evaluate instead of reading standard input
    expressions: Vec<String>,

    /// Print every evaluation step before the result
    #[clap(short, long)]
    trace: bool,

    /// Do not recognize commands such as `dump` at the start of a line
    #[clap(long)]
    no_commands: bool,

    #[clap(flatten)]
    verbose: Verbosity,
}

fn main() -> Result<()> {
    let args = Arguments::parse();
    env_logger::Builder::new()
        .filter_level(
            args.verbose
                .log_level()
                .map_or(LevelFilter::Off, |level| level.to_level_filter()),
        )
        .init();

    let registry = if args.no_commands {
        Registry::without_commands()
    } else {
        Registry::standard()
    };
    let calculator = Calculator::new(registry).with_trace(args.trace);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.expressions.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read from standard input")?;
            run_line(&calculator, &line, &mut out)?;
        }
    } else {
        for expression in &args.expressions {
            run_line(&calculator, expression, &mut out)?;
        }
    }

    Ok(())
}

/// Evaluates one line and prints its result or error. Only failures to write
/// the output are returned; everything else is reported and skipped.
fn run_line(calculator: &Calculator, line: &str, out: &mut impl Write) -> Result<()> {
    match calculator.process_line(line, out) {
        Ok(Some(result)) => writeln!(out, "Result: {}", result)?,
        Ok(None) => debug!("Skipped blank line"),
        Err(error) if error.downcast_ref::<io::Error>().is_some() => return Err(error),
        Err(error) => report(&error),
    }
    out.flush().context("Failed to write to standard output")
}

fn report(error: &anyhow::Error) {
    debug!("{:?}", error);
    match error.downcast_ref::<SyntaxError>() {
        Some(syntax_error) => eprintln!("Parse error: {}", syntax_error),
        None => eprintln!("{:#}", error),
    }
}
