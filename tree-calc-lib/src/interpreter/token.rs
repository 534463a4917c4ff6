use crate::interpreter::operator::{BinaryOperator, Operator};
use crate::interpreter::registry::{Command, Function};
use std::fmt;
use std::fmt::Formatter;

/// A discrete part of an expression
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token {
    End,
    Number(f64),
    Operator(Operator),
    OpenParenthesis,
    CloseParenthesis,
    Function(Function),
    Command(Command),
}

impl Token {
    pub fn operator(kind: BinaryOperator) -> Token {
        Token::Operator(Operator::new(kind))
    }
}

/// A token together with the byte offset in the line where it starts.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub position: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::End => Ok(()),
            Token::Number(value) => write!(f, "{}", value),
            Token::Operator(operator) => write!(f, "{}", operator),
            Token::OpenParenthesis => write!(f, "("),
            Token::CloseParenthesis => write!(f, ")"),
            Token::Function(function) => write!(f, "{}", function),
            Token::Command(command) => write!(f, "{}", command),
        }
    }
}
