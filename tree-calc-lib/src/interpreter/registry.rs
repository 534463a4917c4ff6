use crate::interpreter::syntax::expression_tree::{Expression, MAX_PRINT_DEPTH};
use crate::interpreter::tokens_to_string;
use anyhow::{bail, Result};
use itertools::Itertools;
use std::fmt;
use std::fmt::Formatter;
use std::io::Write;

/// A named unary transform, applied to the value of its parenthesised argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    SquareRoot,
    CubeRoot,
    Absolute,
    Exponential,
    NaturalLogarithm,
    BinaryLogarithm,
    CommonLogarithm,
    Sine,
    HyperbolicSine,
    Cosine,
    HyperbolicCosine,
    Tangent,
    HyperbolicTangent,
}

impl Function {
    pub const ALL: [Function; 13] = [
        Function::SquareRoot,
        Function::CubeRoot,
        Function::Absolute,
        Function::Exponential,
        Function::NaturalLogarithm,
        Function::BinaryLogarithm,
        Function::CommonLogarithm,
        Function::Sine,
        Function::HyperbolicSine,
        Function::Cosine,
        Function::HyperbolicCosine,
        Function::Tangent,
        Function::HyperbolicTangent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::SquareRoot => "sqrt",
            Function::CubeRoot => "cbrt",
            Function::Absolute => "abs",
            Function::Exponential => "exp",
            Function::NaturalLogarithm => "ln",
            Function::BinaryLogarithm => "log2",
            Function::CommonLogarithm => "log10",
            Function::Sine => "sin",
            Function::HyperbolicSine => "sinh",
            Function::Cosine => "cos",
            Function::HyperbolicCosine => "cosh",
            Function::Tangent => "tan",
            Function::HyperbolicTangent => "tanh",
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Function::SquareRoot => x.sqrt(),
            Function::CubeRoot => x.cbrt(),
            Function::Absolute => x.abs(),
            Function::Exponential => x.exp(),
            Function::NaturalLogarithm => x.ln(),
            Function::BinaryLogarithm => x.log2(),
            Function::CommonLogarithm => x.log10(),
            Function::Sine => x.sin(),
            Function::HyperbolicSine => x.sinh(),
            Function::Cosine => x.cos(),
            Function::HyperbolicCosine => x.cosh(),
            Function::Tangent => x.tan(),
            Function::HyperbolicTangent => x.tanh(),
        }
    }
}

/// An action requested at the start of a line, run once the line is parsed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Prints the expression tree.
    Dump,
    /// Prints the expression back in infix form.
    Infix,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::Dump, Command::Infix];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Dump => "dump",
            Command::Infix => "infix",
        }
    }

    /// Runs the command against a fully parsed line.
    pub fn run(&self, expression: &Expression, out: &mut impl Write) -> Result<()> {
        match self {
            Command::Dump => {
                let depth = expression.depth();
                if depth > MAX_PRINT_DEPTH {
                    bail!(
                        "Expression is {} levels deep, only {} can be printed",
                        depth,
                        MAX_PRINT_DEPTH
                    );
                }
                write!(out, "{}", expression)?
            }
            Command::Infix => {
                let tokens = expression.to_infix()?;
                writeln!(out, "{}", tokens_to_string(tokens)?)?
            }
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only lookup tables for function and command names.
///
/// Both tables are ordered longest name first, so the first prefix match
/// during lookup is also the longest one.
#[derive(Debug, Clone)]
pub struct Registry {
    functions: Vec<Function>,
    commands: Vec<Command>,
}

impl Registry {
    /// Every built-in function and command.
    pub fn standard() -> Registry {
        Registry {
            functions: longest_first(Function::ALL, Function::name),
            commands: longest_first(Command::ALL, Command::name),
        }
    }

    /// Every built-in function, with command recognition turned off.
    pub fn without_commands() -> Registry {
        Registry {
            commands: Vec::new(),
            ..Registry::standard()
        }
    }

    /// Finds the longest function name that `text` starts with.
    ///
    /// returns: The function and the length of its name.
    pub fn find_function(&self, text: &str) -> Option<(Function, usize)> {
        find_prefix(&self.functions, text, Function::name)
    }

    /// Finds the longest command name that `text` starts with.
    ///
    /// returns: The command and the length of its name.
    pub fn find_command(&self, text: &str) -> Option<(Command, usize)> {
        find_prefix(&self.commands, text, Command::name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::standard()
    }
}

fn longest_first<T: Copy>(
    entries: impl IntoIterator<Item = T>,
    name: fn(&T) -> &'static str,
) -> Vec<T> {
    entries
        .into_iter()
        .sorted_by(|a, b| name(b).len().cmp(&name(a).len()))
        .collect()
}

fn find_prefix<T: Copy>(
    entries: &[T],
    text: &str,
    name: fn(&T) -> &'static str,
) -> Option<(T, usize)> {
    entries
        .iter()
        .find(|entry| text.starts_with(name(*entry)))
        .map(|entry| (*entry, name(entry).len()))
}
