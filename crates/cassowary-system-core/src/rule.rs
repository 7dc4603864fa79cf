//! Relational rules submitted to the solver.

use crate::expression::Expression;
use crate::token::Strength;

/// Solver-side direction of an inequality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    LessOrEqual,
    GreaterOrEqual,
}

/// A compiled rule.
///
/// Weight 0 means "no extra weighting"; how a backend folds weight into
/// strength is up to the backend. The cassowary backend multiplies, so a
/// weight between 0 and 1 makes the rule weaker than its named strength.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Equation {
        lhs: Expression,
        rhs: Expression,
        strength: Strength,
        weight: f64,
    },
    Inequality {
        lhs: Expression,
        relation: Relation,
        rhs: Expression,
        strength: Strength,
        weight: f64,
    },
    /// Keep `target` at the value it has when the rule is registered.
    Stay {
        target: Expression,
        strength: Strength,
        weight: f64,
    },
}

impl Rule {
    pub fn strength(&self) -> Strength {
        match self {
            Rule::Equation { strength, .. }
            | Rule::Inequality { strength, .. }
            | Rule::Stay { strength, .. } => *strength,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Rule::Equation { weight, .. }
            | Rule::Inequality { weight, .. }
            | Rule::Stay { weight, .. } => *weight,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Equation { .. } => "equation",
            Rule::Inequality { .. } => "inequality",
            Rule::Stay { .. } => "stay",
        }
    }
}
