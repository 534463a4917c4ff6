use crate::interpreter::error::{SyntaxError, SyntaxErrorKind};
use crate::interpreter::operator::Operator;
use crate::interpreter::parser::ParsedLine;
use crate::interpreter::registry::Command;
use crate::interpreter::syntax::expression_tree::{Expression, Node, NodeId, Payload};
use crate::interpreter::token::{Lexeme, Token};
use anyhow::{bail, Context, Result};
use log::trace;

/// Builder state saved when a parenthesised group opens.
#[derive(Debug, Copy, Clone)]
struct Scope {
    subroot: Option<NodeId>,
    cursor: Option<NodeId>,
    saved: Option<NodeId>,
}

/// Assembles an expression tree one token at a time, without lookahead.
///
/// * `subroot` is the root of the tree of the current parenthesis level.
/// * `cursor` is the node the next operand attaches to.
/// * `saved` is the lower precedence operator to return to once the operator
///   spliced in above it has received its right operand.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: Expression,
    subroot: Option<NodeId>,
    cursor: Option<NodeId>,
    saved: Option<NodeId>,
    scopes: Vec<Scope>,
    command: Option<Command>,
}

impl TreeBuilder {
    pub fn new() -> TreeBuilder {
        TreeBuilder::default()
    }

    /// Adds the next token of the line to the tree.
    pub fn feed(&mut self, lexeme: Lexeme) -> Result<()> {
        trace!("{:?} at {}", lexeme.token, lexeme.position);
        match lexeme.token {
            Token::End => Ok(()),
            Token::Command(command) => {
                self.command = Some(command);
                Ok(())
            }
            Token::OpenParenthesis => {
                self.open_scope();
                Ok(())
            }
            Token::CloseParenthesis => self.close_scope(lexeme.position),
            Token::Number(value) => self.attach_operand(Payload::Number(value)),
            Token::Function(function) => self.attach_operand(Payload::Function(function)),
            Token::Operator(operator) => self.attach_operator(operator),
        }
    }

    /// Completes the tree once every token of the line has been fed.
    ///
    /// # Arguments
    ///
    /// * `end_position`: Offset of the end of the line, reported for unclosed groups.
    pub fn finish(mut self, end_position: usize) -> Result<ParsedLine> {
        if !self.scopes.is_empty() {
            return Err(
                SyntaxError::new(SyntaxErrorKind::UnmatchedOpenParenthesis, end_position).into(),
            );
        }
        self.tree.set_root(self.subroot);
        Ok(ParsedLine {
            expression: self.tree,
            command: self.command,
        })
    }

    fn open_scope(&mut self) {
        self.scopes.push(Scope {
            subroot: self.subroot.take(),
            cursor: self.cursor.take(),
            saved: self.saved.take(),
        });
    }

    fn close_scope(&mut self, position: usize) -> Result<()> {
        let scope = match self.scopes.pop() {
            Some(scope) => scope,
            None => {
                return Err(
                    SyntaxError::new(SyntaxErrorKind::UnmatchedCloseParenthesis, position).into(),
                )
            }
        };
        let closed = self.subroot.context("Parenthesised group is empty")?;
        if let Payload::Operator(operator) = &mut self.tree.node_mut(closed).payload {
            operator.prioritized = true;
        }

        if scope.subroot.is_none() {
            // Plain grouping: the group becomes the whole expression so far.
            self.subroot = Some(closed);
            self.cursor = Some(closed);
            self.saved = None;
            return Ok(());
        }

        let outer_cursor = scope.cursor.context("Enclosing group has no cursor")?;
        let slot = self.pending_slot(outer_cursor)?;
        self.tree.node_mut(slot).right = Some(closed);

        self.subroot = scope.subroot;
        self.cursor = scope.cursor;
        self.saved = scope.saved;
        self.unwind();
        Ok(())
    }

    /// The node waiting for the group that just closed: either a function
    /// waiting for its argument, or an operator waiting for its right operand.
    fn pending_slot(&self, outer_cursor: NodeId) -> Result<NodeId> {
        let node = self.tree.node(outer_cursor);
        match (node.payload, node.right) {
            (Payload::Function(_), None) | (Payload::Operator(_), None) => Ok(outer_cursor),
            (Payload::Operator(_), Some(right)) if self.is_pending_function(right) => Ok(right),
            _ => bail!("Enclosing group has nothing waiting for an operand"),
        }
    }

    fn is_pending_function(&self, id: NodeId) -> bool {
        matches!(
            self.tree.node(id),
            Node {
                payload: Payload::Function(_),
                right: None,
                ..
            }
        )
    }

    fn attach_operand(&mut self, payload: Payload) -> Result<()> {
        let completes_operand = matches!(payload, Payload::Number(_));

        let cursor = match self.cursor {
            Some(cursor) => cursor,
            None => {
                let node = self.tree.push(payload);
                self.subroot = Some(node);
                self.cursor = Some(node);
                return Ok(());
            }
        };

        let cursor_node = self.tree.node(cursor);
        if matches!(cursor_node.payload, Payload::Number(_)) || cursor_node.right.is_some() {
            bail!("Operand follows a complete operand");
        }
        let node = self.tree.push(payload);
        self.tree.node_mut(cursor).right = Some(node);
        if completes_operand {
            self.unwind();
        }
        Ok(())
    }

    fn attach_operator(&mut self, operator: Operator) -> Result<()> {
        let cursor = self.cursor.context("Operator has no left operand")?;
        let cursor_node = self.tree.node(cursor);

        let binds_tighter = match cursor_node.payload {
            Payload::Operator(current) => operator.outranks(&current),
            _ => false,
        };

        if binds_tighter {
            // Take over the right operand of the cursor as our left operand.
            let operand = cursor_node
                .right
                .context("Operator has no right operand to take over")?;
            let node = self.tree.push(Payload::Operator(operator));
            self.tree.node_mut(node).left = Some(operand);
            self.tree.node_mut(cursor).right = Some(node);
            self.saved = Some(cursor);
            self.cursor = Some(node);
        } else {
            let node = self.tree.push(Payload::Operator(operator));
            self.tree.node_mut(node).left = self.subroot;
            self.subroot = Some(node);
            self.cursor = Some(node);
        }
        Ok(())
    }

    /// An operand has completed the operator at the cursor; return to the
    /// saved lower precedence operator, if any.
    fn unwind(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.cursor = Some(saved);
        }
    }
}
