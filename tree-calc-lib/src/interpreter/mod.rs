pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod operator;
pub mod parser;
pub mod registry;
pub mod syntax;
pub mod token;

use crate::interpreter::evaluator::{evaluate, evaluate_with};
use crate::interpreter::parser::parse;
use crate::interpreter::registry::Registry;
use crate::interpreter::token::Token;
use anyhow::{Context, Result};
use log::warn;
use std::io::Write;
use string_builder::Builder;

/// Evaluates input one line at a time.
///
/// Nothing is carried over from one line to the next; the registry is the
/// only state, and it is never modified.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    registry: Registry,
    trace: bool,
}

impl Calculator {
    pub fn new(registry: Registry) -> Calculator {
        Calculator {
            registry,
            trace: false,
        }
    }

    /// Whether every evaluation step is written out before the result.
    pub fn with_trace(self, trace: bool) -> Calculator {
        Calculator { trace, ..self }
    }

    /// Parses and evaluates one line of input.
    ///
    /// # Arguments
    ///
    /// * `line`: The text of the line.
    /// * `out`: Where command output and evaluation steps are written.
    ///
    /// returns: The value of the line, or `None` for a blank line.
    ///
    /// # Examples
    ///
    /// ```
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// use tree_calc::interpreter::Calculator;
    /// use tree_calc::interpreter::registry::Registry;
    ///
    /// let calculator = Calculator::new(Registry::standard()).with_trace(true);
    /// let mut out = Vec::new();
    ///
    /// let result = calculator.process_line("1 + sqrt(9)", &mut out)?;
    ///
    /// assert_eq!(result, Some(4.0));
    /// assert_eq!(String::from_utf8(out)?, "sqrt(9) = 3\n1 + 3 = 4\n");
    /// # Ok::<(), anyhow::Error>(()) }
    /// ```
    pub fn process_line(&self, line: &str, out: &mut impl Write) -> Result<Option<f64>> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let parsed = parse(line, &self.registry)?;
        if let Some(command) = parsed.command {
            command
                .run(&parsed.expression, out)
                .with_context(|| format!("Command '{}' failed", command))?;
        }

        let value = if self.trace {
            let mut steps = Vec::new();
            let value = evaluate_with(&parsed.expression, |step| steps.push(step))?;
            for step in steps {
                writeln!(out, "{}", step)?;
            }
            value
        } else {
            evaluate(&parsed.expression)?
        };

        if !value.is_finite() {
            warn!("{:?} evaluated to {}", line, value);
        }
        Ok(Some(value))
    }
}

/// Evaluates a single arithmetic expression with the standard functions.
///
/// # Arguments
///
/// * `expression`: A text expression in infix format.
///
/// returns: The value of the expression.
///
/// # Examples
///
/// ```
/// use tree_calc::interpreter::calculate;
///
/// let value = calculate("(2 + 3) * 4").unwrap();
/// assert_eq!(value, 20.0);
/// ```
pub fn calculate(expression: &str) -> Result<f64> {
    let parsed = parse(expression, &Registry::standard())?;
    evaluate(&parsed.expression)
}

/// Pretty-prints the given vector of tokens with added whitespace.
///
/// # Arguments
///
/// * `tokens`: The tokens to print.
///
/// returns: A pretty-printed text-version of the given tokens.
///
/// # Examples
///
/// ```
/// use tree_calc::interpreter::tokens_to_string;
/// use tree_calc::interpreter::operator::BinaryOperator;
/// use tree_calc::interpreter::token::Token;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tokens = vec![
///     Token::Number(2.0),
///     Token::operator(BinaryOperator::Multiply),
///     Token::Number(3.0),
/// ];
/// let pretty_printed_tokens = tokens_to_string(tokens)?;
/// assert_eq!(pretty_printed_tokens, "2 * 3");
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn tokens_to_string(tokens: Vec<Token>) -> Result<String> {
    let mut builder = Builder::new(tokens.len());

    for token in tokens {
        match token {
            Token::Operator(_) => {
                builder.append(" ");
                builder.append(token.to_string());
                builder.append(" ");
            }
            _ => builder.append(token.to_string()),
        }
    }

    builder.string().context("Failed to build token string")
}
