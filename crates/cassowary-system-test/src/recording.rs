//! A call-recording fake solver.
//!
//! [`RecordingSolver`] performs no optimization: a resolve simply applies
//! the pending suggestions (last one wins) followed by any forced values.
//! That is enough to assert how callers batch their calls.
//!
//! # Example
//!
//! ```
//! use cassowary_system_core::{QuantityId, Strength};
//! use cassowary_system_solver::Solver;
//! use cassowary_system_test::{RecordingSolver, SolverCall};
//!
//! let id = QuantityId::new(0);
//! let mut solver = RecordingSolver::new();
//! solver.register_adjustable(id, 1.0, Strength::Strong).unwrap();
//! solver.suggest(id, 2.0).unwrap();
//! assert_eq!(solver.value(id), Some(1.0));
//!
//! solver.resolve().unwrap();
//! assert_eq!(solver.value(id), Some(2.0));
//! assert_eq!(solver.resolve_count(), 1);
//! assert_eq!(solver.calls().last(), Some(&SolverCall::Resolve));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use cassowary_system_core::{QuantityId, Rule, Strength};
use cassowary_system_solver::{Result, Solver, SolverError};

/// One call made against a [`RecordingSolver`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolverCall {
    Register {
        id: QuantityId,
        initial: f64,
        strength: Strength,
    },
    Suggest {
        id: QuantityId,
        value: f64,
    },
    Resolve,
    AddRules {
        count: usize,
    },
}

/// Fake solver that records calls and echoes suggestions back.
#[derive(Debug, Clone, Default)]
pub struct RecordingSolver {
    calls: Vec<SolverCall>,
    values: BTreeMap<QuantityId, f64>,
    pending: Vec<(QuantityId, f64)>,
    forced: BTreeMap<QuantityId, f64>,
    rejected: BTreeSet<QuantityId>,
    rules: Vec<Rule>,
}

impl RecordingSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call, in order.
    pub fn calls(&self) -> &[SolverCall] {
        &self.calls
    }

    /// Forgets recorded calls, keeping state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn resolve_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, SolverCall::Resolve))
            .count()
    }

    /// Every suggestion made, in order.
    pub fn suggestions(&self) -> Vec<(QuantityId, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                SolverCall::Suggest { id, value } => Some((id, value)),
                _ => None,
            })
            .collect()
    }

    /// Ids registered as adjustable, in registration order.
    pub fn registered(&self) -> Vec<QuantityId> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                SolverCall::Register { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Rules accepted so far.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Makes every later suggestion for `id` fail.
    pub fn reject_suggestions_for(&mut self, id: QuantityId) {
        self.rejected.insert(id);
    }

    /// Makes every later resolve settle `id` at `value`, as if a rule held it.
    pub fn force_on_resolve(&mut self, id: QuantityId, value: f64) {
        self.forced.insert(id, value);
    }
}

impl Solver for RecordingSolver {
    fn register_adjustable(
        &mut self,
        id: QuantityId,
        initial: f64,
        strength: Strength,
    ) -> Result<()> {
        self.calls.push(SolverCall::Register {
            id,
            initial,
            strength,
        });
        if strength.is_required() {
            return Err(SolverError::RequiredAdjustable(id));
        }
        if self.values.insert(id, initial).is_some() {
            return Err(SolverError::DuplicateAdjustable(id));
        }
        Ok(())
    }

    fn is_adjustable(&self, id: QuantityId) -> bool {
        self.values.contains_key(&id)
    }

    fn suggest(&mut self, id: QuantityId, value: f64) -> Result<()> {
        self.calls.push(SolverCall::Suggest { id, value });
        if !self.values.contains_key(&id) {
            return Err(SolverError::UnknownQuantity(id));
        }
        if self.rejected.contains(&id) {
            return Err(SolverError::SuggestionRejected {
                id,
                value,
                reason: "rejected by test".to_string(),
            });
        }
        self.pending.push((id, value));
        Ok(())
    }

    fn resolve(&mut self) -> Result<()> {
        self.calls.push(SolverCall::Resolve);
        for (id, value) in self.pending.drain(..) {
            self.values.insert(id, value);
        }
        for (&id, &value) in &self.forced {
            if let Some(slot) = self.values.get_mut(&id) {
                *slot = value;
            }
        }
        Ok(())
    }

    fn add_rules(&mut self, rules: &[Rule]) -> Result<()> {
        self.calls.push(SolverCall::AddRules { count: rules.len() });
        self.rules.extend_from_slice(rules);
        Ok(())
    }

    fn value(&self, id: QuantityId) -> Option<f64> {
        self.values.get(&id).copied()
    }
}
