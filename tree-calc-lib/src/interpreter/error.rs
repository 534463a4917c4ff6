use thiserror::Error;

/// What went wrong while reading a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("Operand expected")]
    OperandExpected,
    #[error("Operator expected")]
    OperatorExpected,
    #[error("'(' expected")]
    OpenParenthesisExpected,
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Number is too big")]
    NumberTooBig,
    #[error("Failed to parse number")]
    InvalidNumber,
    #[error("Missed '('")]
    UnmatchedCloseParenthesis,
    #[error("Missed ')'")]
    UnmatchedOpenParenthesis,
}

/// A malformed line, located by the byte offset into the line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: usize) -> SyntaxError {
        SyntaxError { kind, position }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("Empty expression")]
    EmptyExpression,
}
