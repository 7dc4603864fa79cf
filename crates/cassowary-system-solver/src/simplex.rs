//! Backend over the `cassowary` incremental simplex solver.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use cassowary::strength as levels;
use cassowary::{
    AddConstraintError, AddEditVariableError, Constraint, RelationalOperator, SuggestValueError,
    Term, Variable,
};
use cassowary_system_core::{Expression, QuantityId, Relation, Rule, Strength};
use tracing::trace;

use crate::{Result, Solver, SolverError};

/// A [`Solver`] backed by `cassowary::Solver`.
///
/// Every adjustable quantity becomes a cassowary edit variable. Stay rules
/// become equations pinning their target to the value it has when the
/// rule is added.
pub struct CassowarySolver {
    solver: cassowary::Solver,
    variables: HashMap<QuantityId, Variable>,
    values: HashMap<QuantityId, f64>,
    rule_count: usize,
}

impl CassowarySolver {
    pub fn new() -> Self {
        Self {
            solver: cassowary::Solver::new(),
            variables: HashMap::new(),
            values: HashMap::new(),
            rule_count: 0,
        }
    }

    /// Number of rules accepted so far.
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    fn expression(&self, expr: &Expression) -> Result<cassowary::Expression> {
        let terms = expr
            .terms()
            .map(|(id, coefficient)| {
                self.variables
                    .get(&id)
                    .map(|&variable| Term { variable, coefficient })
                    .ok_or(SolverError::UnknownQuantity(id))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(cassowary::Expression::new(terms, expr.constant_term()))
    }

    fn constraint(&self, rule: &Rule) -> Result<Constraint> {
        let strength = weighted(rule.strength(), rule.weight());
        let constraint = match rule {
            Rule::Equation { lhs, rhs, .. } => Constraint::new(
                self.expression(&(lhs.clone() - rhs.clone()))?,
                RelationalOperator::Equal,
                strength,
            ),
            Rule::Inequality {
                lhs, relation, rhs, ..
            } => {
                let op = match relation {
                    Relation::LessOrEqual => RelationalOperator::LessOrEqual,
                    Relation::GreaterOrEqual => RelationalOperator::GreaterOrEqual,
                };
                Constraint::new(self.expression(&(lhs.clone() - rhs.clone()))?, op, strength)
            }
            Rule::Stay { target, .. } => {
                let current = target.evaluate(|id| self.values.get(&id).copied().unwrap_or(0.0));
                Constraint::new(
                    self.expression(&(target.clone() - Expression::constant(current)))?,
                    RelationalOperator::Equal,
                    strength,
                )
            }
        };
        Ok(constraint)
    }
}

impl Default for CassowarySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CassowarySolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CassowarySolver")
            .field("adjustable", &self.variables.len())
            .field("rule_count", &self.rule_count)
            .finish()
    }
}

impl Solver for CassowarySolver {
    fn register_adjustable(
        &mut self,
        id: QuantityId,
        initial: f64,
        strength: Strength,
    ) -> Result<()> {
        if self.variables.contains_key(&id) {
            return Err(SolverError::DuplicateAdjustable(id));
        }
        if strength.is_required() {
            return Err(SolverError::RequiredAdjustable(id));
        }

        let variable = Variable::new();
        self.solver
            .add_edit_variable(variable, level(strength))
            .map_err(|e| match e {
                AddEditVariableError::DuplicateEditVariable => SolverError::DuplicateAdjustable(id),
                AddEditVariableError::BadRequiredStrength => SolverError::RequiredAdjustable(id),
            })?;
        self.solver
            .suggest_value(variable, initial)
            .map_err(|e| suggestion_error(id, initial, e))?;

        self.variables.insert(id, variable);
        self.values.insert(id, initial);
        Ok(())
    }

    fn is_adjustable(&self, id: QuantityId) -> bool {
        self.variables
            .get(&id)
            .is_some_and(|v| self.solver.has_edit_variable(v))
    }

    fn suggest(&mut self, id: QuantityId, value: f64) -> Result<()> {
        let variable = *self
            .variables
            .get(&id)
            .ok_or(SolverError::UnknownQuantity(id))?;
        trace!(quantity = %id, value, "suggest");
        self.solver
            .suggest_value(variable, value)
            .map_err(|e| suggestion_error(id, value, e))
    }

    fn resolve(&mut self) -> Result<()> {
        // Flushes the solver's change list; values are then read back
        // directly so unchanged variables stay consistent too.
        let _ = self.solver.fetch_changes();
        for (&id, &variable) in &self.variables {
            self.values.insert(id, self.solver.get_value(variable));
        }
        Ok(())
    }

    fn add_rules(&mut self, rules: &[Rule]) -> Result<()> {
        for rule in rules {
            let constraint = self.constraint(rule)?;
            self.solver.add_constraint(constraint).map_err(|e| {
                let what = format!("{} at {} strength", rule.kind(), rule.strength());
                match e {
                    AddConstraintError::DuplicateConstraint => SolverError::DuplicateRule(what),
                    AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable(what),
                    AddConstraintError::InternalSolverError(msg) => {
                        SolverError::Internal(msg.to_string())
                    }
                }
            })?;
            self.rule_count += 1;
        }
        Ok(())
    }

    fn value(&self, id: QuantityId) -> Option<f64> {
        self.values.get(&id).copied()
    }
}

fn level(strength: Strength) -> f64 {
    match strength {
        Strength::Weak => levels::WEAK,
        Strength::Medium => levels::MEDIUM,
        Strength::Strong => levels::STRONG,
        Strength::Required => levels::REQUIRED,
    }
}

/// Folds a rule weight into its strength.
///
/// A positive weight multiplies a non-required strength, so any weight below
/// 1 weakens the rule: medium at weight 0.001 lands at weak. Weight 0 (or
/// below) leaves the strength as is, and required always stays required.
fn weighted(strength: Strength, weight: f64) -> f64 {
    let base = level(strength);
    if strength.is_required() || weight <= 0.0 {
        base
    } else {
        levels::clip(base * weight)
    }
}

fn suggestion_error(id: QuantityId, value: f64, e: SuggestValueError) -> SolverError {
    match e {
        SuggestValueError::UnknownEditVariable => SolverError::UnknownQuantity(id),
        SuggestValueError::InternalSolverError(msg) => SolverError::SuggestionRejected {
            id,
            value,
            reason: msg.to_string(),
        },
    }
}
