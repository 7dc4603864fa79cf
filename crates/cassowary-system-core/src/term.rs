//! Raw specification terms and the term classifier.
//!
//! Shape is decided once, when a term enters the system: strings are split
//! into tokens and references by [`Token::parse`], and everything
//! downstream matches on [`RawTerm`] instead of probing values.

use std::fmt;

use crate::error::{CompileError, ProducerError, Result};
use crate::expression::Expression;
use crate::quantity::QuantityId;
use crate::token::{Strength, Token};

/// A zero-argument function producing a quantity's value on each tick.
pub struct Producer {
    f: Box<dyn FnMut() -> std::result::Result<f64, ProducerError>>,
}

impl Producer {
    /// Wraps an infallible producer.
    pub fn new(mut f: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            f: Box::new(move || Ok(f())),
        }
    }

    /// Wraps a producer that may fail.
    pub fn fallible(f: impl FnMut() -> std::result::Result<f64, ProducerError> + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    /// Invokes the producer, rejecting non-finite results.
    pub fn produce(&mut self) -> std::result::Result<f64, ProducerError> {
        let value = (self.f)()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ProducerError::NonFinite(value))
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

/// A value that is already a solver-level primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltPrimitive {
    Quantity(QuantityId),
    Expression(Expression),
    Strength(Strength),
}

/// One term of the declarative specification.
#[derive(Debug)]
pub enum RawTerm {
    Number(f64),
    /// Shorthand quantity descriptor, `{ value: n }`.
    Descriptor { value: f64 },
    Reference(String),
    Token(Token),
    Producer(Producer),
    Formula(Vec<RawTerm>),
    Built(BuiltPrimitive),
}

/// Classification of a [`RawTerm`], borrowed from it.
#[derive(Debug, Clone, Copy)]
pub enum TermKind<'a> {
    Built(&'a BuiltPrimitive),
    Literal(f64),
    Descriptor(f64),
    Producer,
    Formula(&'a [RawTerm]),
    Token(Token),
    Reference(&'a str),
}

impl RawTerm {
    pub fn number(value: f64) -> Self {
        RawTerm::Number(value)
    }

    pub fn descriptor(value: f64) -> Self {
        RawTerm::Descriptor { value }
    }

    pub fn producer(f: impl FnMut() -> f64 + 'static) -> Self {
        RawTerm::Producer(Producer::new(f))
    }

    pub fn formula(elements: Vec<RawTerm>) -> Self {
        RawTerm::Formula(elements)
    }

    /// A reference that bypasses token recognition.
    pub fn reference(name: impl Into<String>) -> Self {
        RawTerm::Reference(name.into())
    }

    /// Classifies the term.
    ///
    /// Numbers must be finite; anything else is unresolvable.
    pub fn classify(&self) -> Result<TermKind<'_>> {
        let kind = match self {
            RawTerm::Built(primitive) => TermKind::Built(primitive),
            RawTerm::Number(n) if n.is_finite() => TermKind::Literal(*n),
            RawTerm::Descriptor { value } if value.is_finite() => TermKind::Descriptor(*value),
            RawTerm::Number(_) | RawTerm::Descriptor { .. } => {
                return Err(CompileError::UnresolvableTerm(self.describe()))
            }
            RawTerm::Producer(_) => TermKind::Producer,
            RawTerm::Formula(elements) => TermKind::Formula(elements),
            RawTerm::Token(token) => TermKind::Token(*token),
            RawTerm::Reference(name) => TermKind::Reference(name),
        };
        Ok(kind)
    }

    /// True for terms that only ever become a quantity.
    pub fn is_quantity_shaped(&self) -> bool {
        matches!(
            self,
            RawTerm::Number(_) | RawTerm::Descriptor { .. } | RawTerm::Producer(_)
        )
    }

    /// Short human-readable rendering for error messages.
    pub fn describe(&self) -> String {
        match self {
            RawTerm::Number(n) => n.to_string(),
            RawTerm::Descriptor { value } => format!("{{ value: {value} }}"),
            RawTerm::Reference(name) => format!("'{name}'"),
            RawTerm::Token(token) => format!("'{token}'"),
            RawTerm::Producer(_) => "<producer>".to_string(),
            RawTerm::Formula(elements) => {
                let inner: Vec<String> = elements.iter().map(RawTerm::describe).collect();
                format!("[{}]", inner.join(", "))
            }
            RawTerm::Built(BuiltPrimitive::Quantity(id)) => format!("<quantity {id}>"),
            RawTerm::Built(BuiltPrimitive::Expression(expr)) => format!("<expression {expr}>"),
            RawTerm::Built(BuiltPrimitive::Strength(s)) => format!("<strength {s}>"),
        }
    }
}

impl From<f64> for RawTerm {
    fn from(value: f64) -> Self {
        RawTerm::Number(value)
    }
}

impl From<i32> for RawTerm {
    fn from(value: i32) -> Self {
        RawTerm::Number(f64::from(value))
    }
}

/// Token strings become tokens; every other string is a reference.
impl From<&str> for RawTerm {
    fn from(s: &str) -> Self {
        match Token::parse(s) {
            Some(token) => RawTerm::Token(token),
            None => RawTerm::Reference(s.to_string()),
        }
    }
}

impl From<String> for RawTerm {
    fn from(s: String) -> Self {
        match Token::parse(&s) {
            Some(token) => RawTerm::Token(token),
            None => RawTerm::Reference(s),
        }
    }
}

impl From<Vec<RawTerm>> for RawTerm {
    fn from(elements: Vec<RawTerm>) -> Self {
        RawTerm::Formula(elements)
    }
}

impl From<Producer> for RawTerm {
    fn from(producer: Producer) -> Self {
        RawTerm::Producer(producer)
    }
}

impl From<Strength> for RawTerm {
    fn from(strength: Strength) -> Self {
        RawTerm::Built(BuiltPrimitive::Strength(strength))
    }
}

impl From<Expression> for RawTerm {
    fn from(expr: Expression) -> Self {
        RawTerm::Built(BuiltPrimitive::Expression(expr))
    }
}

impl From<QuantityId> for RawTerm {
    fn from(id: QuantityId) -> Self {
        RawTerm::Built(BuiltPrimitive::Quantity(id))
    }
}

/// Builds a formula or rule array from heterogeneous terms.
///
/// ```
/// use cassowary_system_core::{terms, RawTerm};
///
/// let right = terms!["left", "+", "width", "-", 125];
/// assert!(matches!(right, RawTerm::Formula(ref e) if e.len() == 5));
/// ```
#[macro_export]
macro_rules! terms {
    ($($term:expr),* $(,)?) => {
        $crate::RawTerm::Formula(vec![$($crate::RawTerm::from($term)),*])
    };
}
