use crate::interpreter::error::{SyntaxError, SyntaxErrorKind};
use crate::interpreter::operator::BinaryOperator;
use crate::interpreter::registry::Registry;
use crate::interpreter::token::{Lexeme, Token};
use anyhow::Result;

/// The class of token that may legally appear next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Expect {
    /// A command, an operand or the end of an empty line.
    LineStart,
    /// An operand, or the end of a line that only held a command.
    AfterCommand,
    Operand,
    /// The `(` that has to follow a function name.
    FunctionArgument,
    /// A binary operator, `)` or the end of the line.
    Operator,
}

/// Splits one line into tokens, one token per call to [`Lexer::next_lexeme`].
///
/// The lexer tracks which class of token is allowed next, which is how a
/// leading `-` becomes part of a number literal while a `-` after an operand
/// becomes a binary operator.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    expect: Expect,
    registry: &'a Registry,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, registry: &'a Registry) -> Lexer<'a> {
        Lexer {
            input,
            position: 0,
            expect: Expect::LineStart,
            registry,
        }
    }

    /// The byte offset the lexer has advanced to.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Reads the next token, or [`Token::End`] once the line is exhausted.
    pub fn next_lexeme(&mut self) -> Result<Lexeme> {
        self.skip_whitespace();
        let input = self.input;
        let start = self.position;
        let rest = &input[start..];

        let symbol = match rest.chars().next() {
            None => return self.end_of_input(),
            Some(symbol) => symbol,
        };

        if self.expect == Expect::LineStart {
            if let Some((command, length)) = self.registry.find_command(rest) {
                self.position += length;
                self.expect = Expect::AfterCommand;
                return Ok(self.lexeme(Token::Command(command), start));
            }
        }

        let token = match self.expect {
            Expect::Operator => self.operator(symbol, start)?,
            _ => self.operand(symbol, rest, start)?,
        };
        Ok(self.lexeme(token, start))
    }

    fn operand(&mut self, symbol: char, rest: &str, start: usize) -> Result<Token> {
        if symbol == '(' {
            self.position += 1;
            self.expect = Expect::Operand;
            return Ok(Token::OpenParenthesis);
        }
        if self.expect == Expect::FunctionArgument {
            return Err(SyntaxError::new(SyntaxErrorKind::OpenParenthesisExpected, start).into());
        }

        if matches!(symbol, '+' | '-' | '.') || symbol.is_ascii_digit() {
            let value = parse_number(rest, start)?;
            self.position += scan_number(rest);
            self.expect = Expect::Operator;
            return Ok(Token::Number(value));
        }

        if let Some((function, length)) = self.registry.find_function(rest) {
            self.position += length;
            self.expect = Expect::FunctionArgument;
            return Ok(Token::Function(function));
        }

        Err(SyntaxError::new(SyntaxErrorKind::OperandExpected, start).into())
    }

    fn operator(&mut self, symbol: char, start: usize) -> Result<Token> {
        if symbol == ')' {
            self.position += 1;
            return Ok(Token::CloseParenthesis);
        }
        match BinaryOperator::from_symbol(symbol) {
            Some(kind) => {
                self.position += 1;
                self.expect = Expect::Operand;
                Ok(Token::operator(kind))
            }
            None => Err(SyntaxError::new(SyntaxErrorKind::OperatorExpected, start).into()),
        }
    }

    fn end_of_input(&self) -> Result<Lexeme> {
        match self.expect {
            Expect::LineStart | Expect::AfterCommand | Expect::Operator => {
                Ok(self.lexeme(Token::End, self.position))
            }
            Expect::Operand | Expect::FunctionArgument => {
                Err(SyntaxError::new(SyntaxErrorKind::UnexpectedEnd, self.position).into())
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();
    }

    fn lexeme(&self, token: Token, position: usize) -> Lexeme {
        Lexeme { token, position }
    }
}

/// Length in bytes of the number literal at the start of `text`:
/// an optional sign, digits with an optional fraction, and an exponent
/// if digits follow the `e`.
fn scan_number(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut length = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        length += 1;
    }
    length += count_digits(&bytes[length..]);
    if bytes.get(length) == Some(&b'.') {
        length += 1;
        length += count_digits(&bytes[length..]);
    }
    if matches!(bytes.get(length), Some(b'e') | Some(b'E')) {
        let mut exponent = length + 1;
        if matches!(bytes.get(exponent), Some(b'+') | Some(b'-')) {
            exponent += 1;
        }
        let digits = count_digits(&bytes[exponent.min(bytes.len())..]);
        if digits > 0 {
            length = exponent + digits;
        }
    }

    length
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

fn parse_number(text: &str, start: usize) -> Result<f64> {
    let literal = &text[..scan_number(text)];
    let value = literal
        .parse::<f64>()
        .map_err(|_| SyntaxError::new(SyntaxErrorKind::InvalidNumber, start))?;
    if value.is_infinite() {
        return Err(SyntaxError::new(SyntaxErrorKind::NumberTooBig, start).into());
    }
    Ok(value)
}

/// Splits a whole line into tokens, leaving out the final [`Token::End`].
///
/// # Arguments
///
/// * `line`: One line of input.
/// * `registry`: The function and command names to recognize.
///
/// returns: Every token of the line, with its position.
///
/// # Examples
///
/// ```
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// use tree_calc::interpreter::lexer::tokenize;
/// use tree_calc::interpreter::registry::Registry;
///
/// let lexemes = tokenize("-5 + 3", &Registry::standard())?;
/// assert_eq!(lexemes.len(), 3);
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn tokenize(line: &str, registry: &Registry) -> Result<Vec<Lexeme>> {
    let mut lexer = Lexer::new(line, registry);
    let mut lexemes = Vec::new();
    loop {
        let lexeme = lexer.next_lexeme()?;
        if lexeme.token == Token::End {
            return Ok(lexemes);
        }
        lexemes.push(lexeme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::registry::{Command, Function};
    use parameterized_macro::parameterized;
    use pretty_assertions::assert_eq;

    fn tokens(line: &str) -> Vec<Token> {
        tokenize(line, &Registry::standard())
            .unwrap()
            .into_iter()
            .map(|lexeme| lexeme.token)
            .collect()
    }

    fn error(line: &str, registry: &Registry) -> SyntaxError {
        let error = tokenize(line, registry).expect_err("Should return Err");
        *error.downcast_ref::<SyntaxError>().unwrap()
    }

    #[test]
    fn simple_expression_returns_tokens() {
        assert_eq!(
            tokens("1 + 2.5"),
            vec![
                Token::Number(1.0),
                Token::operator(BinaryOperator::Add),
                Token::Number(2.5),
            ]
        );
    }

    #[test]
    fn leading_minus_is_part_of_the_number() {
        assert_eq!(
            tokens("-5 + 3"),
            vec![
                Token::Number(-5.0),
                Token::operator(BinaryOperator::Add),
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn minus_after_operand_is_an_operator() {
        assert_eq!(
            tokens("1 -5"),
            vec![
                Token::Number(1.0),
                Token::operator(BinaryOperator::Subtract),
                Token::Number(5.0),
            ]
        );
    }

    #[test]
    fn signed_operand_after_operator() {
        assert_eq!(
            tokens("2*-3"),
            vec![
                Token::Number(2.0),
                Token::operator(BinaryOperator::Multiply),
                Token::Number(-3.0),
            ]
        );
    }

    #[test]
    fn parentheses_and_functions_are_recognized() {
        assert_eq!(
            tokens("(1) / sinh(0)"),
            vec![
                Token::OpenParenthesis,
                Token::Number(1.0),
                Token::CloseParenthesis,
                Token::operator(BinaryOperator::Divide),
                Token::Function(Function::HyperbolicSine),
                Token::OpenParenthesis,
                Token::Number(0.0),
                Token::CloseParenthesis,
            ]
        );
    }

    #[parameterized(
    literal = { "2e3", "1.5e-3", ".5", "7.", "+4", "6E+1" },
    expected = { 2000.0, 0.0015, 0.5, 7.0, 4.0, 60.0 }
    )]
    fn number_literals_are_parsed(literal: &str, expected: f64) {
        pretty_assertions::assert_eq!(tokens(literal), vec![Token::Number(expected)]);
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        let error = error("2e", &Registry::standard());

        assert_eq!(error, SyntaxError::new(SyntaxErrorKind::OperatorExpected, 1));
    }

    #[test]
    fn command_is_recognized_at_line_start() {
        assert_eq!(
            tokens("dump 1"),
            vec![Token::Command(Command::Dump), Token::Number(1.0)]
        );
        assert_eq!(tokens("infix"), vec![Token::Command(Command::Infix)]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let lexemes = tokenize("  12 *  3", &Registry::standard()).unwrap();

        let positions: Vec<usize> = lexemes.iter().map(|lexeme| lexeme.position).collect();

        assert_eq!(positions, vec![2, 5, 8]);
    }

    #[test]
    fn empty_line_returns_no_tokens() {
        assert_eq!(tokens(""), vec![]);
        assert_eq!(tokens("   "), vec![]);
    }

    #[parameterized(
    line = { "1 2", "1 + dump", "sqrt 9", "sqrt()", "1e999", "- 1", "1 +", "sqrt", "2 % 3", "x" },
    kind = {
    SyntaxErrorKind::OperatorExpected,
    SyntaxErrorKind::OperandExpected,
    SyntaxErrorKind::OpenParenthesisExpected,
    SyntaxErrorKind::OperandExpected,
    SyntaxErrorKind::NumberTooBig,
    SyntaxErrorKind::InvalidNumber,
    SyntaxErrorKind::UnexpectedEnd,
    SyntaxErrorKind::UnexpectedEnd,
    SyntaxErrorKind::OperatorExpected,
    SyntaxErrorKind::OperandExpected,
    },
    position = { 2, 4, 5, 5, 0, 0, 3, 4, 2, 0 }
    )]
    fn malformed_line_returns_syntax_error(line: &str, kind: SyntaxErrorKind, position: usize) {
        let error = error(line, &Registry::standard());

        pretty_assertions::assert_eq!(error, SyntaxError::new(kind, position));
    }

    #[test]
    fn commands_can_be_disabled() {
        let error = error("dump 1", &Registry::without_commands());

        assert_eq!(error, SyntaxError::new(SyntaxErrorKind::OperandExpected, 0));
    }
}
