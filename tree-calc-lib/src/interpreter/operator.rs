use std::fmt;
use std::fmt::Formatter;

/// A binary arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: char) -> Option<BinaryOperator> {
        match symbol {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Subtract),
            '*' => Some(BinaryOperator::Multiply),
            '/' => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    pub(crate) fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 0,
            BinaryOperator::Multiply | BinaryOperator::Divide => 1,
        }
    }

    pub(crate) fn precedence_eq(&self, other: &Self) -> bool {
        self.precedence().eq(&other.precedence())
    }

    pub(crate) fn precedence_gt(&self, other: &Self) -> bool {
        self.precedence().gt(&other.precedence())
    }

    pub(crate) fn precedence_lt(&self, other: &Self) -> bool {
        self.precedence().lt(&other.precedence())
    }

    /// Applies the operator with IEEE-754 semantics, so `1 / 0` is infinite
    /// and `0 / 0` is NaN rather than an error.
    pub fn evaluate(&self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOperator::Add => a + b,
            BinaryOperator::Subtract => a - b,
            BinaryOperator::Multiply => a * b,
            BinaryOperator::Divide => a / b,
        }
    }
}

/// An operator as it appears in a parsed line.
///
/// `prioritized` is set once the parenthesised group the operator roots has
/// been closed, and is never cleared afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Operator {
    pub kind: BinaryOperator,
    pub prioritized: bool,
}

impl Operator {
    pub fn new(kind: BinaryOperator) -> Operator {
        Operator {
            kind,
            prioritized: false,
        }
    }

    /// Whether `self` has to bind tighter than `other`.
    ///
    /// A prioritized operator outranks any non-prioritized one. With equal
    /// prioritization the higher precedence wins. Every other pair, including
    /// equal precedence, does not outrank, which keeps operators
    /// left-associative.
    pub fn outranks(&self, other: &Operator) -> bool {
        match (self.prioritized, other.prioritized) {
            (true, false) => true,
            (false, true) => false,
            _ => self.kind.precedence_gt(&other.kind),
        }
    }

    pub fn evaluate(&self, a: f64, b: f64) -> f64 {
        self.kind.evaluate(a, b)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prioritized(kind: BinaryOperator) -> Operator {
        Operator {
            kind,
            prioritized: true,
        }
    }

    #[test]
    fn operator_equality_correspond_with_precedence() {
        let equal1 = BinaryOperator::Multiply;
        let equal2 = BinaryOperator::Divide;
        assert!(equal1.precedence_eq(&equal2))
    }

    #[test]
    fn operator_gt_correspond_with_precedence() {
        let greater = BinaryOperator::Multiply;
        let lesser = BinaryOperator::Add;
        assert!(greater.precedence_gt(&lesser))
    }

    #[test]
    fn operator_lt_correspond_with_precedence() {
        let greater = BinaryOperator::Divide;
        let lesser = BinaryOperator::Subtract;
        assert!(lesser.precedence_lt(&greater))
    }

    #[test]
    fn multiplication_outranks_addition() {
        let multiply = Operator::new(BinaryOperator::Multiply);
        let add = Operator::new(BinaryOperator::Add);
        assert!(multiply.outranks(&add));
        assert!(!add.outranks(&multiply));
    }

    #[test]
    fn equal_precedence_does_not_outrank() {
        let subtract = Operator::new(BinaryOperator::Subtract);
        let add = Operator::new(BinaryOperator::Add);
        assert!(!subtract.outranks(&add));
        assert!(!add.outranks(&subtract));
    }

    #[test]
    fn prioritized_operator_outranks_higher_precedence() {
        let grouped_add = prioritized(BinaryOperator::Add);
        let multiply = Operator::new(BinaryOperator::Multiply);
        assert!(grouped_add.outranks(&multiply));
        assert!(!multiply.outranks(&grouped_add));
    }

    #[test]
    fn prioritized_operators_compare_by_precedence() {
        let grouped_divide = prioritized(BinaryOperator::Divide);
        let grouped_add = prioritized(BinaryOperator::Add);
        assert!(grouped_divide.outranks(&grouped_add));
        assert!(!grouped_add.outranks(&grouped_divide));
    }

    #[test]
    fn division_by_zero_follows_floating_point() {
        assert_eq!(BinaryOperator::Divide.evaluate(1.0, 0.0), f64::INFINITY);
        assert!(BinaryOperator::Divide.evaluate(0.0, 0.0).is_nan());
    }
}
