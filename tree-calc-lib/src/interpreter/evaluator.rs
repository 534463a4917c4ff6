use crate::interpreter::error::EvaluationError;
use crate::interpreter::operator::BinaryOperator;
use crate::interpreter::registry::Function;
use crate::interpreter::syntax::expression_tree::{Expression, NodeId, Payload};
use anyhow::{bail, Context, Result};
use log::trace;
use std::fmt;
use std::fmt::Formatter;

/// One application of an operator or function during evaluation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Step {
    Binary {
        left: f64,
        operator: BinaryOperator,
        right: f64,
        result: f64,
    },
    Function {
        function: Function,
        argument: f64,
        result: f64,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Step::Binary {
                left,
                operator,
                right,
                result,
            } => write!(f, "{} {} {} = {}", left, operator, right, result),
            Step::Function {
                function,
                argument,
                result,
            } => write!(f, "{}({}) = {}", function, argument, result),
        }
    }
}

/// A node whose operands are still being folded.
struct Frame {
    node: NodeId,
    /// The value of the left operand, once it is known.
    left: Option<f64>,
}

/// Evaluates an expression tree.
///
/// # Arguments
///
/// * `expression`: A tree produced by the parser.
///
/// returns: The numeric value of the expression.
///
/// # Examples
///
/// ```
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// use tree_calc::interpreter::evaluator::evaluate;
/// use tree_calc::interpreter::parser::parse;
/// use tree_calc::interpreter::registry::Registry;
///
/// let parsed = parse("2 + 3 * 4", &Registry::standard())?;
/// assert_eq!(evaluate(&parsed.expression)?, 14.0);
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn evaluate(expression: &Expression) -> Result<f64> {
    evaluate_with(expression, |_| {})
}

/// Evaluates an expression tree, reporting every operator and function
/// application to `observe` in the order they happen.
///
/// The tree is folded in post-order with an explicit stack of frames rather
/// than by recursion, so deeply nested expressions cannot exhaust the call stack.
pub fn evaluate_with(expression: &Expression, mut observe: impl FnMut(Step)) -> Result<f64> {
    let mut node = expression
        .root()
        .ok_or(EvaluationError::EmptyExpression)?;
    let mut frames: Vec<Frame> = Vec::new();

    'descend: loop {
        let mut value = descend_to_leftmost_value(expression, node, &mut frames)?;

        while let Some(frame) = frames.pop() {
            let current = expression.node(frame.node);
            match (current.payload, frame.left) {
                (Payload::Function(function), _) => {
                    let result = function.evaluate(value);
                    record(
                        &mut observe,
                        Step::Function {
                            function,
                            argument: value,
                            result,
                        },
                    );
                    value = result;
                }
                (Payload::Operator(_), None) => {
                    // Left operand done, fold the right one before applying.
                    frames.push(Frame {
                        node: frame.node,
                        left: Some(value),
                    });
                    node = current
                        .right
                        .context("Operator is missing its right operand")?;
                    continue 'descend;
                }
                (Payload::Operator(operator), Some(left)) => {
                    let result = operator.evaluate(left, value);
                    record(
                        &mut observe,
                        Step::Binary {
                            left,
                            operator: operator.kind,
                            right: value,
                            result,
                        },
                    );
                    value = result;
                }
                (Payload::Number(_), _) => bail!("A number cannot have pending operands"),
            }
        }

        return Ok(value);
    }
}

/// Follows left operands and function arguments down to the first number,
/// pushing a frame for every node passed on the way.
fn descend_to_leftmost_value(
    expression: &Expression,
    mut node: NodeId,
    frames: &mut Vec<Frame>,
) -> Result<f64> {
    loop {
        let current = expression.node(node);
        match current.payload {
            Payload::Number(value) => return Ok(value),
            Payload::Operator(_) => {
                frames.push(Frame { node, left: None });
                node = current
                    .left
                    .context("Operator is missing its left operand")?;
            }
            Payload::Function(_) => {
                frames.push(Frame { node, left: None });
                node = current.right.context("Function is missing its argument")?;
            }
        }
    }
}

fn record(observe: &mut impl FnMut(Step), step: Step) {
    trace!("{}", step);
    observe(step);
}
