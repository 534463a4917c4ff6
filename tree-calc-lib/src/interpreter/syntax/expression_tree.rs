use crate::interpreter::operator::{BinaryOperator, Operator};
use crate::interpreter::registry::Function;
use crate::interpreter::syntax::syntax_visitor::{walk_function, walk_operation, SyntaxVisitor};
use crate::interpreter::token::Token;
use anyhow::{Context, Result};
use ptree::{write_tree_with, PrintConfig, TreeBuilder};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Deepest tree that can be printed. Printing recurses once per level.
pub const MAX_PRINT_DEPTH: usize = 256;

/// Stable handle of a node inside an [`Expression`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Payload {
    Number(f64),
    Operator(Operator),
    Function(Function),
}

/// A node of the expression tree.
///
/// Operators use both links. Functions leave `left` empty and take their
/// argument through `right`. Numbers are leaves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Node {
    pub payload: Payload,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// An expression tree stored as an arena of nodes.
///
/// Nodes refer to their children by [`NodeId`], so restructuring the tree while
/// it is being built only reassigns indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Expression {
    pub fn new() -> Expression {
        Expression::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn push(&mut self, payload: Payload) -> NodeId {
        self.nodes.push(Node {
            payload,
            left: None,
            right: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Calls the correct visitor method for the node variant on the given visitor.
    pub(crate) fn accept(&self, id: NodeId, visitor: &mut impl SyntaxVisitor) {
        let node = self.node(id);
        match &node.payload {
            Payload::Number(value) => visitor.visit_number(*value),
            Payload::Operator(operator) => {
                visitor.visit_operation(self, operator, node.left, node.right)
            }
            Payload::Function(function) => visitor.visit_function(self, function, node.right),
        }
    }

    /// Visits the whole tree, starting from the root.
    pub(crate) fn walk(&self, visitor: &mut impl SyntaxVisitor) {
        if let Some(root) = self.root {
            self.accept(root, visitor);
        }
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(NodeId, usize)> =
            self.root.into_iter().map(|id| (id, 1)).collect();
        while let Some((id, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            let node = self.node(id);
            pending.extend(
                node.left
                    .into_iter()
                    .chain(node.right)
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }

    /// Renders the tree back into infix tokens, with only the parentheses that
    /// its structure requires.
    ///
    /// Works through an explicit stack of pending parts instead of recursing,
    /// so any tree the parser accepts can be rendered.
    pub fn to_infix(&self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut pending: Vec<Part> = self
            .root
            .into_iter()
            .map(|id| Part::Node(id, None))
            .collect();

        while let Some(part) = pending.pop() {
            let (id, parent) = match part {
                Part::Token(token) => {
                    tokens.push(token);
                    continue;
                }
                Part::Node(id, parent) => (id, parent),
            };
            let node = self.node(id);
            match node.payload {
                Payload::Number(value) => tokens.push(Token::Number(value)),
                Payload::Function(function) => {
                    let argument = node.right.context("Function has no argument")?;
                    tokens.push(Token::Function(function));
                    tokens.push(Token::OpenParenthesis);
                    pending.push(Part::Token(Token::CloseParenthesis));
                    pending.push(Part::Node(argument, None));
                }
                Payload::Operator(operator) => {
                    let left = node.left.context("Operator has no left operand")?;
                    let right = node.right.context("Operator has no right operand")?;
                    let parenthesized = needs_parentheses(parent, operator.kind);

                    // Pushed in reverse, so they pop in reading order.
                    if parenthesized {
                        tokens.push(Token::OpenParenthesis);
                        pending.push(Part::Token(Token::CloseParenthesis));
                    }
                    pending.push(Part::Node(right, Some(Parent::right(operator))));
                    pending.push(Part::Token(Token::Operator(operator)));
                    pending.push(Part::Node(left, Some(Parent::left(operator))));
                }
            }
        }

        Ok(tokens)
    }

    fn format_tree(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.depth() > MAX_PRINT_DEPTH {
            return Err(fmt::Error);
        }
        let mut visitor = TreeBuilderVisitor {
            builder: TreeBuilder::new("expression".into()),
        };
        self.walk(&mut visitor);

        let mut buffer: Vec<u8> = Vec::new();
        match write_tree_with(&visitor.builder.build(), &mut buffer, &PrintConfig::default()) {
            Ok(_) => {}
            Err(_) => return Err(fmt::Error),
        }
        let text = match std::str::from_utf8(&buffer) {
            Ok(text) => text,
            Err(_) => return Err(fmt::Error),
        };
        f.write_str(text)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.format_tree(f)
    }
}

/// A part of the infix rendering that has not been emitted yet.
enum Part {
    Node(NodeId, Option<Parent>),
    Token(Token),
}

/// The operator an operand belongs to, and on which side of it the operand sits.
#[derive(Debug, Copy, Clone)]
struct Parent {
    operator: BinaryOperator,
    is_right_operand: bool,
}

impl Parent {
    fn left(operator: Operator) -> Parent {
        Parent {
            operator: operator.kind,
            is_right_operand: false,
        }
    }

    fn right(operator: Operator) -> Parent {
        Parent {
            operator: operator.kind,
            is_right_operand: true,
        }
    }
}

/// A left operand needs parentheses when it binds looser than its parent.
/// A right operand also needs them at equal precedence, since operators
/// associate to the left.
fn needs_parentheses(parent: Option<Parent>, operator: BinaryOperator) -> bool {
    match parent {
        None => false,
        Some(parent) => {
            operator.precedence_lt(&parent.operator)
                || (parent.is_right_operand && operator.precedence_eq(&parent.operator))
        }
    }
}

struct TreeBuilderVisitor {
    builder: TreeBuilder,
}

impl SyntaxVisitor for TreeBuilderVisitor {
    fn visit_number(&mut self, value: f64) {
        self.builder.add_empty_child(format!("{}", value));
    }
    fn visit_operation(
        &mut self,
        expression: &Expression,
        operator: &Operator,
        left_operand: Option<NodeId>,
        right_operand: Option<NodeId>,
    ) {
        let label = if operator.prioritized {
            format!("({})", operator)
        } else {
            format!("{}", operator)
        };
        self.builder.begin_child(label);
        walk_operation(self, expression, left_operand, right_operand);
        self.builder.end_child();
    }
    fn visit_function(
        &mut self,
        expression: &Expression,
        function: &Function,
        argument: Option<NodeId>,
    ) {
        self.builder.begin_child(function.to_string());
        walk_function(self, expression, argument);
        self.builder.end_child();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tokens_to_string;
    use pretty_assertions::assert_eq;

    fn number(tree: &mut Expression, value: f64) -> NodeId {
        tree.push(Payload::Number(value))
    }

    fn binary(tree: &mut Expression, kind: BinaryOperator, left: NodeId, right: NodeId) -> NodeId {
        let node = tree.push(Payload::Operator(Operator::new(kind)));
        tree.node_mut(node).left = Some(left);
        tree.node_mut(node).right = Some(right);
        node
    }

    fn function(tree: &mut Expression, function: Function, argument: NodeId) -> NodeId {
        let node = tree.push(Payload::Function(function));
        tree.node_mut(node).right = Some(argument);
        node
    }

    fn create_complex_tree() -> Expression {
        // x + (y + z) * sqrt(a)
        let mut tree = Expression::new();
        let x = number(&mut tree, 1.0);
        let y = number(&mut tree, 2.0);
        let z = number(&mut tree, 3.0);
        let a = number(&mut tree, 4.0);
        let second_plus = binary(&mut tree, BinaryOperator::Add, y, z);
        let root_of_a = function(&mut tree, Function::SquareRoot, a);
        let star = binary(&mut tree, BinaryOperator::Multiply, second_plus, root_of_a);
        let root = binary(&mut tree, BinaryOperator::Add, x, star);
        tree.set_root(Some(root));
        tree
    }

    fn infix(tree: &Expression) -> String {
        tokens_to_string(tree.to_infix().unwrap()).unwrap()
    }

    #[test]
    fn complex_tree_converts_back_to_infix() {
        let tree = create_complex_tree();

        assert_eq!(infix(&tree), "1 + (2 + 3) * sqrt(4)");
    }

    #[test]
    fn right_operand_of_equal_precedence_keeps_parentheses() {
        let mut tree = Expression::new();
        let one = number(&mut tree, 1.0);
        let two = number(&mut tree, 2.0);
        let three = number(&mut tree, 3.0);
        let inner = binary(&mut tree, BinaryOperator::Subtract, two, three);
        let root = binary(&mut tree, BinaryOperator::Subtract, one, inner);
        tree.set_root(Some(root));

        assert_eq!(infix(&tree), "1 - (2 - 3)");
    }

    #[test]
    fn left_operand_of_equal_precedence_drops_parentheses() {
        let mut tree = Expression::new();
        let one = number(&mut tree, 1.0);
        let two = number(&mut tree, 2.0);
        let three = number(&mut tree, 3.0);
        let inner = binary(&mut tree, BinaryOperator::Divide, one, two);
        let root = binary(&mut tree, BinaryOperator::Divide, inner, three);
        tree.set_root(Some(root));

        assert_eq!(infix(&tree), "1 / 2 / 3");
    }

    #[test]
    fn empty_tree_has_no_tokens() {
        let tree = Expression::new();

        assert!(tree.is_empty());
        assert_eq!(tree.to_infix().unwrap(), vec![]);
    }

    #[test]
    fn operator_without_operand_cannot_be_rendered() {
        let mut tree = Expression::new();
        let root = tree.push(Payload::Operator(Operator::new(BinaryOperator::Add)));
        tree.set_root(Some(root));

        tree.to_infix().expect_err("Should return Err");
    }

    #[test]
    fn depth_counts_longest_path() {
        let tree = create_complex_tree();

        assert_eq!(tree.depth(), 4);
        assert_eq!(Expression::new().depth(), 0);
    }

    #[test]
    fn too_deep_tree_is_not_printed() {
        let mut tree = Expression::new();
        let mut root = number(&mut tree, 1.0);
        for _ in 0..MAX_PRINT_DEPTH {
            root = function(&mut tree, Function::Absolute, root);
        }
        tree.set_root(Some(root));

        assert_eq!(tree.depth(), MAX_PRINT_DEPTH + 1);
        assert!(fmt::write(&mut String::new(), format_args!("{}", tree)).is_err());
        assert_eq!(tree.to_infix().unwrap().len(), 3 * MAX_PRINT_DEPTH + 1);
    }

    #[test]
    fn print_succeeds() {
        let tree = create_complex_tree();

        let printed = format!("{}", tree);

        print!("{}", printed);
        assert!(printed.contains("expression"));
        assert!(printed.contains("sqrt"));
        assert_eq!(printed.lines().count(), 9);
    }
}
