//! Fixed tokens of the formula and rule mini-language.
//!
//! A string is checked against these token sets before it is ever treated
//! as a reference, so a quantity named `"weak"` can never be referenced by
//! name from a formula or rule.

use std::fmt;

/// Arithmetic operator inside a formula array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

/// Supported rule comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::LessOrEqual => "<=",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Equal => "=",
        }
    }
}

/// Strict comparators the solver cannot express.
///
/// They are recognized so that they are never mistaken for references,
/// and rejected wherever they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrictComparator {
    Less,
    Greater,
}

impl StrictComparator {
    pub fn symbol(self) -> &'static str {
        match self {
            StrictComparator::Less => "<",
            StrictComparator::Greater => ">",
        }
    }
}

/// Solver-level priority of a rule.
///
/// Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strength {
    Weak,
    #[default]
    Medium,
    Strong,
    Required,
}

impl Strength {
    pub fn name(self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
            Strength::Required => "required",
        }
    }

    pub fn is_required(self) -> bool {
        self == Strength::Required
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any recognized token string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Operator(Operator),
    Comparator(Comparator),
    Strict(StrictComparator),
    Strength(Strength),
}

impl Token {
    /// Recognizes a token string, returning `None` for anything that
    /// should be treated as a reference.
    ///
    /// # Example
    ///
    /// ```
    /// use cassowary_system_core::{Operator, Strength, Token};
    ///
    /// assert_eq!(Token::parse("*"), Some(Token::Operator(Operator::Multiply)));
    /// assert_eq!(Token::parse("strong"), Some(Token::Strength(Strength::Strong)));
    /// assert_eq!(Token::parse("width"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Token> {
        let token = match s {
            "+" => Token::Operator(Operator::Add),
            "-" => Token::Operator(Operator::Subtract),
            "*" => Token::Operator(Operator::Multiply),
            "/" => Token::Operator(Operator::Divide),
            "<=" => Token::Comparator(Comparator::LessOrEqual),
            ">=" => Token::Comparator(Comparator::GreaterOrEqual),
            "=" => Token::Comparator(Comparator::Equal),
            "<" => Token::Strict(StrictComparator::Less),
            ">" => Token::Strict(StrictComparator::Greater),
            "weak" => Token::Strength(Strength::Weak),
            "medium" => Token::Strength(Strength::Medium),
            "strong" => Token::Strength(Strength::Strong),
            "required" => Token::Strength(Strength::Required),
            _ => return None,
        };
        Some(token)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Token::Operator(op) => op.symbol(),
            Token::Comparator(cmp) => cmp.symbol(),
            Token::Strict(cmp) => cmp.symbol(),
            Token::Strength(strength) => strength.name(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_round_trips_through_its_symbol() {
        let tokens = [
            Token::Operator(Operator::Add),
            Token::Operator(Operator::Subtract),
            Token::Operator(Operator::Multiply),
            Token::Operator(Operator::Divide),
            Token::Comparator(Comparator::LessOrEqual),
            Token::Comparator(Comparator::GreaterOrEqual),
            Token::Comparator(Comparator::Equal),
            Token::Strict(StrictComparator::Less),
            Token::Strict(StrictComparator::Greater),
            Token::Strength(Strength::Weak),
            Token::Strength(Strength::Medium),
            Token::Strength(Strength::Strong),
            Token::Strength(Strength::Required),
        ];
        for token in tokens {
            assert_eq!(Token::parse(token.symbol()), Some(token));
        }
    }

    #[test]
    fn test_non_tokens_are_references() {
        assert_eq!(Token::parse("left"), None);
        assert_eq!(Token::parse("=="), None);
        assert_eq!(Token::parse("Strong"), None);
        assert_eq!(Token::parse(""), None);
    }

    #[test]
    fn test_strength_ordering() {
        assert!(Strength::Weak < Strength::Medium);
        assert!(Strength::Strong < Strength::Required);
        assert_eq!(Strength::default(), Strength::Medium);
    }
}
