//! Formula arrays to linear expressions.
//!
//! Operators apply strictly left to right with no precedence:
//! `[2, "+", 3, "*", 4]` is `(2 + 3) * 4`.


use cassowary_system_core::error::Result;
use cassowary_system_core::{
    BuiltPrimitive, CompileError, Expression, Operator, RawTerm, TermKind, Token,
};

use crate::scope::Scope;

enum Piece {
    Operand(Expression),
    Operator(Operator),
}

/// Compiles the formula array named `owner`.
///
/// References resolve against `scope`, which must already contain every
/// name the array mentions. Nested arrays compile recursively.
pub fn compile(owner: &str, elements: &[RawTerm], scope: &Scope<'_>) -> Result<Expression> {
    let mut pieces = Vec::with_capacity(elements.len());

    for element in elements {
        let piece = match element.classify()? {
            TermKind::Literal(value) => Piece::Operand(Expression::constant(value)),
            TermKind::Token(Token::Operator(op)) => {
                if !matches!(pieces.last(), Some(Piece::Operand(_))) {
                    return Err(malformed(
                        owner,
                        format!("operator '{}' must be preceded by an expression", op.symbol()),
                    ));
                }
                Piece::Operator(op)
            }
            TermKind::Token(Token::Strict(cmp)) => {
                return Err(CompileError::UnsupportedComparator {
                    token: cmp.symbol().to_string(),
                })
            }
            TermKind::Token(token) => {
                return Err(malformed(owner, format!("unexpected token '{token}'")))
            }
            TermKind::Reference(name) => Piece::Operand(scope.lookup(name)?),
            TermKind::Formula(inner) => Piece::Operand(compile(owner, inner, scope)?),
            TermKind::Built(BuiltPrimitive::Strength(strength)) => {
                return Err(malformed(owner, format!("unexpected strength '{strength}'")))
            }
            TermKind::Built(primitive) => Piece::Operand(scope.primitive(primitive)?),
            TermKind::Descriptor(_) | TermKind::Producer => {
                return Err(CompileError::UnresolvableTerm(format!(
                    "{} cannot appear inside formula '{owner}'",
                    element.describe()
                )))
            }
        };
        pieces.push(piece);
    }

    reduce(owner, pieces)
}

// Folds [e0, op0, e1, op1, e2, ...] into ((e0 op0 e1) op1 e2) ...
fn reduce(owner: &str, pieces: Vec<Piece>) -> Result<Expression> {
    let mut pieces = pieces.into_iter();
    let mut acc = match pieces.next() {
        Some(Piece::Operand(expr)) => expr,
        Some(Piece::Operator(op)) => {
            return Err(malformed(
                owner,
                format!("operator '{}' must be preceded by an expression", op.symbol()),
            ))
        }
        None => return Err(malformed(owner, "empty formula".to_string())),
    };

    while let Some(piece) = pieces.next() {
        match piece {
            Piece::Operator(op) => match pieces.next() {
                Some(Piece::Operand(rhs)) => acc = acc.apply(op, rhs)?,
                _ => {
                    return Err(malformed(
                        owner,
                        format!("operator '{}' has no right-hand expression", op.symbol()),
                    ))
                }
            },
            Piece::Operand(_) => {
                return Err(malformed(
                    owner,
                    "expected an operator between expressions".to_string(),
                ))
            }
        }
    }

    Ok(acc)
}

fn malformed(owner: &str, reason: String) -> CompileError {
    CompileError::MalformedFormula {
        name: owner.to_string(),
        reason,
    }
}
