use crate::interpreter::operator::Operator;
use crate::interpreter::registry::Function;
use crate::interpreter::syntax::expression_tree::{Expression, NodeId};

/// If a method is not implemented, the default implementation will continue in a pre-order
/// traversal of the tree.
pub(crate) trait SyntaxVisitor: Sized {
    fn visit_number(&mut self, _value: f64) {}
    fn visit_operation(
        &mut self,
        expression: &Expression,
        _operator: &Operator,
        left_operand: Option<NodeId>,
        right_operand: Option<NodeId>,
    ) {
        walk_operation(self, expression, left_operand, right_operand)
    }
    fn visit_function(
        &mut self,
        expression: &Expression,
        _function: &Function,
        argument: Option<NodeId>,
    ) {
        walk_function(self, expression, argument)
    }
}

pub(crate) fn walk_operation(
    visitor: &mut impl SyntaxVisitor,
    expression: &Expression,
    left_operand: Option<NodeId>,
    right_operand: Option<NodeId>,
) {
    left_operand
        .into_iter()
        .chain(right_operand)
        .for_each(|node| expression.accept(node, visitor));
}

pub(crate) fn walk_function(
    visitor: &mut impl SyntaxVisitor,
    expression: &Expression,
    argument: Option<NodeId>,
) {
    if let Some(node) = argument {
        expression.accept(node, visitor);
    }
}
