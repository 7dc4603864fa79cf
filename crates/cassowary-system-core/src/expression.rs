//! Linear expressions over quantities.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::error::{CompileError, Result};
use crate::quantity::QuantityId;
use crate::token::Operator;

/// A linear combination `c0 + c1*q1 + c2*q2 + ...`.
///
/// Terms are keyed by [`QuantityId`], so building the same expression
/// twice always yields the same term order.
///
/// # Example
///
/// ```
/// use cassowary_system_core::{Expression, QuantityId};
///
/// let left = QuantityId::new(0);
/// let width = QuantityId::new(1);
/// let right = Expression::quantity(left)
///     .plus(Expression::quantity(width))
///     .minus(Expression::constant(125.0));
///
/// assert_eq!(right.coefficient(width), 1.0);
/// assert_eq!(right.constant_term(), -125.0);
/// assert_eq!(right.evaluate(|id| if id == left { 20.0 } else { 200.0 }), 95.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    terms: BTreeMap<QuantityId, f64>,
    constant: f64,
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn quantity(id: QuantityId) -> Self {
        Self::term(id, 1.0)
    }

    pub fn term(id: QuantityId, coefficient: f64) -> Self {
        let mut expr = Self::constant(0.0);
        expr.add_term(id, coefficient);
        expr
    }

    /// True when the expression references no quantity.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn coefficient(&self, id: QuantityId) -> f64 {
        self.terms.get(&id).copied().unwrap_or(0.0)
    }

    pub fn terms(&self) -> impl Iterator<Item = (QuantityId, f64)> + '_ {
        self.terms.iter().map(|(&id, &c)| (id, c))
    }

    /// Ids of every quantity with a non-zero coefficient.
    pub fn quantities(&self) -> impl Iterator<Item = QuantityId> + '_ {
        self.terms.keys().copied()
    }

    pub fn plus(mut self, other: Expression) -> Self {
        self.constant += other.constant;
        for (id, c) in other.terms {
            self.add_term(id, c);
        }
        self
    }

    pub fn minus(self, other: Expression) -> Self {
        self.plus(other.scaled(-1.0))
    }

    /// Multiplies two expressions; one side must be constant.
    pub fn times(self, other: Expression) -> Result<Self> {
        if other.is_constant() {
            Ok(self.scaled(other.constant))
        } else if self.is_constant() {
            Ok(other.scaled(self.constant))
        } else {
            Err(CompileError::NonlinearExpression(format!(
                "cannot multiply {self} by {other}"
            )))
        }
    }

    /// Divides by an expression that must fold to a non-zero constant.
    pub fn divide(self, other: Expression) -> Result<Self> {
        if !other.is_constant() {
            return Err(CompileError::NonlinearExpression(format!(
                "cannot divide {self} by {other}"
            )));
        }
        if other.constant == 0.0 {
            return Err(CompileError::NonlinearExpression(format!(
                "division of {self} by zero"
            )));
        }
        let factor = 1.0 / other.constant;
        if !factor.is_finite() {
            return Err(CompileError::NonlinearExpression(format!(
                "division of {self} by {} overflows",
                other.constant
            )));
        }
        Ok(self.scaled(factor))
    }

    /// Applies a formula operator.
    pub fn apply(self, op: Operator, rhs: Expression) -> Result<Self> {
        match op {
            Operator::Add => Ok(self.plus(rhs)),
            Operator::Subtract => Ok(self.minus(rhs)),
            Operator::Multiply => self.times(rhs),
            Operator::Divide => self.divide(rhs),
        }
    }

    /// Evaluates the expression against current quantity values.
    pub fn evaluate(&self, mut value_of: impl FnMut(QuantityId) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, (&id, &c)| acc + c * value_of(id))
    }

    fn scaled(mut self, factor: f64) -> Self {
        self.constant *= factor;
        for c in self.terms.values_mut() {
            *c *= factor;
        }
        self.terms.retain(|_, c| *c != 0.0);
        self
    }

    fn add_term(&mut self, id: QuantityId, coefficient: f64) {
        let entry = self.terms.entry(id).or_insert(0.0);
        *entry += coefficient;
        if *entry == 0.0 {
            self.terms.remove(&id);
        }
    }
}

impl From<QuantityId> for Expression {
    fn from(id: QuantityId) -> Self {
        Expression::quantity(id)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::constant(value)
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        self.plus(rhs)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        self.minus(rhs)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self.scaled(-1.0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (id, c) in self.terms() {
            if first {
                write!(f, "{c}*{id}")?;
                first = false;
            } else {
                write!(f, " + {c}*{id}")?;
            }
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant != 0.0 {
            write!(f, " + {}", self.constant)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: usize) -> QuantityId {
        QuantityId::new(i)
    }

    #[test]
    fn test_constant_folding() {
        let expr = Expression::constant(2.0)
            .plus(Expression::constant(3.0))
            .times(Expression::constant(4.0))
            .unwrap();
        assert!(expr.is_constant());
        assert_eq!(expr.constant_term(), 20.0);
    }

    #[test]
    fn test_terms_cancel_out() {
        let expr = Expression::quantity(q(0)).minus(Expression::quantity(q(0)));
        assert!(expr.is_constant());
        assert_eq!(expr.quantities().count(), 0);
    }

    #[test]
    fn test_scaling_by_constant_on_either_side() {
        let left = Expression::quantity(q(1)).times(Expression::constant(3.0)).unwrap();
        let right = Expression::constant(3.0).times(Expression::quantity(q(1))).unwrap();
        assert_eq!(left, right);
        assert_eq!(left.coefficient(q(1)), 3.0);
    }

    #[test]
    fn test_product_of_quantities_is_nonlinear() {
        let err = Expression::quantity(q(0))
            .times(Expression::quantity(q(1)))
            .unwrap_err();
        assert!(matches!(err, CompileError::NonlinearExpression(_)));
    }

    #[test]
    fn test_division() {
        let half = Expression::quantity(q(2)).divide(Expression::constant(2.0)).unwrap();
        assert_eq!(half.coefficient(q(2)), 0.5);

        assert!(Expression::quantity(q(2))
            .divide(Expression::constant(0.0))
            .is_err());
        assert!(Expression::constant(1.0)
            .divide(Expression::quantity(q(2)))
            .is_err());
    }

    #[test]
    fn test_tiny_scale_factors_keep_their_terms() {
        let steep = Expression::quantity(q(0))
            .divide(Expression::constant(1e-9))
            .unwrap();
        assert!((steep.coefficient(q(0)) - 1e9).abs() < 1e-3);

        let shallow = Expression::quantity(q(0))
            .times(Expression::constant(1e-9))
            .unwrap();
        assert!(!shallow.is_constant());
        assert_eq!(shallow.coefficient(q(0)), 1e-9);

        assert!(Expression::quantity(q(0))
            .divide(Expression::constant(1e-310))
            .is_err());
    }

    #[test]
    fn test_evaluate() {
        let expr = Expression::term(q(0), 2.0) + Expression::constant(1.0) - Expression::quantity(q(1));
        let value = expr.evaluate(|id| if id == q(0) { 10.0 } else { 4.0 });
        assert_eq!(value, 17.0);
    }
}
