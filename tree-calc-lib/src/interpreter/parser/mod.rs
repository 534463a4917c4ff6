mod tree_builder;

pub use crate::interpreter::parser::tree_builder::TreeBuilder;

use crate::interpreter::lexer::Lexer;
use crate::interpreter::registry::{Command, Registry};
use crate::interpreter::syntax::expression_tree::Expression;
use crate::interpreter::token::Token;
use anyhow::Result;
use log::debug;

/// The result of parsing one line: its expression tree and the command, if
/// the line started with one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub expression: Expression,
    pub command: Option<Command>,
}

/// Parses one line of input into an expression tree.
///
/// # Arguments
///
/// * `line`: The text of the line.
/// * `registry`: The function and command names to recognize.
///
/// returns: The expression tree of the line, which is empty for a blank line.
///
/// # Examples
///
/// ```
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// use tree_calc::interpreter::parser::parse;
/// use tree_calc::interpreter::registry::Registry;
///
/// let parsed = parse("1 + sqrt(9)", &Registry::standard())?;
/// assert_eq!(parsed.expression.node_count(), 4);
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn parse(line: &str, registry: &Registry) -> Result<ParsedLine> {
    let mut lexer = Lexer::new(line, registry);
    let mut builder = TreeBuilder::new();

    loop {
        let lexeme = lexer.next_lexeme()?;
        if lexeme.token == Token::End {
            break;
        }
        builder.feed(lexeme)?;
    }

    let parsed = builder.finish(lexer.position())?;
    debug!(
        "Parsed {:?} into {} nodes",
        line,
        parsed.expression.node_count()
    );
    Ok(parsed)
}
