//! Rule tuples to compiled rules.
//!
//! Positions are literal:
//!
//! - `[left, "=", right, strength?, weight?]` is an equation
//! - `[left, "<=" | ">=", right, strength?, weight?]` is an inequality
//! - `[left, strength?, weight?]` keeps `left` where it is

#[cfg(test)]
mod tests;

use cassowary_system_core::error::Result;
use cassowary_system_core::{
    BuiltPrimitive, Comparator, CompileError, Expression, RawTerm, Relation, Rule, Strength,
    TermKind, Token,
};

use crate::formula;
use crate::scope::Scope;

const MAX_RELATION_TERMS: usize = 5;
const MAX_STAY_TERMS: usize = 3;

/// Compiles one rule tuple against everything built so far.
///
/// Strength defaults to medium and weight to 0.
pub fn build_rule(tuple: &[RawTerm], scope: &Scope<'_>) -> Result<Rule> {
    let Some(left) = tuple.first() else {
        return Err(CompileError::MalformedRule("empty rule".to_string()));
    };
    if is_blank(left) {
        return Err(CompileError::MalformedRule(format!(
            "rule {} has no leading term",
            describe(tuple)
        )));
    }

    match tuple.get(1) {
        Some(RawTerm::Token(Token::Strict(cmp))) => Err(CompileError::UnsupportedComparator {
            token: cmp.symbol().to_string(),
        }),
        Some(RawTerm::Token(Token::Comparator(cmp))) => {
            if tuple.len() > MAX_RELATION_TERMS {
                return Err(too_long(tuple, MAX_RELATION_TERMS));
            }
            let right = tuple.get(2).ok_or_else(|| {
                CompileError::MalformedRule(format!(
                    "rule {} has no right-hand term",
                    describe(tuple)
                ))
            })?;

            let lhs = operand(left, scope)?;
            let rhs = operand(right, scope)?;
            let strength = strength_at(tuple.get(3))?;
            let weight = weight_at(tuple.get(4))?;

            Ok(match cmp {
                Comparator::Equal => Rule::Equation {
                    lhs,
                    rhs,
                    strength,
                    weight,
                },
                Comparator::LessOrEqual => Rule::Inequality {
                    lhs,
                    relation: Relation::LessOrEqual,
                    rhs,
                    strength,
                    weight,
                },
                Comparator::GreaterOrEqual => Rule::Inequality {
                    lhs,
                    relation: Relation::GreaterOrEqual,
                    rhs,
                    strength,
                    weight,
                },
            })
        }
        Some(RawTerm::Token(Token::Operator(op))) => Err(CompileError::MalformedRule(format!(
            "operator '{}' cannot relate two terms; wrap arithmetic in a nested array",
            op.symbol()
        ))),
        _ => {
            if tuple.len() > MAX_STAY_TERMS {
                return Err(too_long(tuple, MAX_STAY_TERMS));
            }
            Ok(Rule::Stay {
                target: operand(left, scope)?,
                strength: strength_at(tuple.get(1))?,
                weight: weight_at(tuple.get(2))?,
            })
        }
    }
}

fn is_blank(term: &RawTerm) -> bool {
    match term {
        RawTerm::Reference(name) => name.trim().is_empty(),
        RawTerm::Formula(elements) => elements.is_empty(),
        RawTerm::Token(_) => true,
        _ => false,
    }
}

fn operand(term: &RawTerm, scope: &Scope<'_>) -> Result<Expression> {
    match term.classify()? {
        TermKind::Literal(value) => Ok(Expression::constant(value)),
        TermKind::Reference(name) => scope.lookup(name),
        TermKind::Formula(elements) => formula::compile("<rule>", elements, scope),
        TermKind::Built(primitive) => scope.primitive(primitive),
        TermKind::Token(token) => Err(CompileError::MalformedRule(format!(
            "unexpected token '{token}' in operand position"
        ))),
        TermKind::Descriptor(_) | TermKind::Producer => Err(CompileError::UnresolvableTerm(
            format!("{} cannot be a rule operand", term.describe()),
        )),
    }
}

fn strength_at(term: Option<&RawTerm>) -> Result<Strength> {
    match term {
        None => Ok(Strength::default()),
        Some(RawTerm::Token(Token::Strength(strength)))
        | Some(RawTerm::Built(BuiltPrimitive::Strength(strength))) => Ok(*strength),
        Some(other) => Err(CompileError::UnrecognizedStrength(other.describe())),
    }
}

fn weight_at(term: Option<&RawTerm>) -> Result<f64> {
    match term {
        None => Ok(0.0),
        Some(RawTerm::Number(weight)) if weight.is_finite() && *weight >= 0.0 => Ok(*weight),
        Some(other) => Err(CompileError::MalformedRule(format!(
            "weight must be a non-negative number, got {}",
            other.describe()
        ))),
    }
}

fn too_long(tuple: &[RawTerm], max: usize) -> CompileError {
    CompileError::MalformedRule(format!(
        "rule {} has {} terms, at most {max} are allowed",
        describe(tuple),
        tuple.len()
    ))
}

fn describe(tuple: &[RawTerm]) -> String {
    let parts: Vec<String> = tuple.iter().map(RawTerm::describe).collect();
    format!("[{}]", parts.join(", "))
}
