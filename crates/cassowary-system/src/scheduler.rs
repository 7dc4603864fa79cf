//! The reactive tick loop.
//!
//! Each tick runs producer -> suggest -> resolve -> diff, in that order.
//! Every producer is evaluated before the first suggestion is issued, and
//! the solver resolves at most once.

use std::collections::BTreeMap;
use std::mem;

use cassowary_system_core::{Producer, QuantityId, QuantityTable};
use cassowary_system_solver::Solver;
use tracing::{debug, trace};

use crate::{Result, SystemError};

/// Values that changed on one tick, in quantity build order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: Vec<(String, f64)>,
}

impl ChangeSet {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.changes
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.changes.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|(name, _)| name.as_str())
    }

    pub fn into_map(self) -> BTreeMap<String, f64> {
        self.changes.into_iter().collect()
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, f64);
    type IntoIter = std::vec::IntoIter<(String, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Drives producers and suggestions into a solver, one tick at a time.
///
/// Holds quantity ids only; the values live in the system's
/// [`QuantityTable`].
#[derive(Debug)]
pub struct Scheduler {
    producers: Vec<(QuantityId, Producer)>,
    pending: Vec<(QuantityId, f64)>,
    // Last reported value per quantity, indexed by id.
    reported: Vec<f64>,
    tolerance: f64,
    ticks: u64,
}

impl Scheduler {
    /// Creates a scheduler whose first baseline is the current table.
    pub fn new(
        producers: Vec<(QuantityId, Producer)>,
        quantities: &QuantityTable,
        tolerance: f64,
    ) -> Self {
        Self {
            producers,
            pending: Vec::new(),
            reported: quantities.iter().map(|(_, q)| q.value).collect(),
            tolerance,
            ticks: 0,
        }
    }

    /// Number of quantities with a producer.
    pub fn reactive_count(&self) -> usize {
        self.producers.len()
    }

    pub fn is_reactive(&self, id: QuantityId) -> bool {
        self.producers.iter().any(|(p, _)| *p == id)
    }

    /// Completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Queues a one-off suggestion for the next tick.
    ///
    /// A later suggestion for the same quantity replaces an earlier one.
    pub fn queue(&mut self, id: QuantityId, value: f64) {
        match self.pending.iter_mut().find(|(p, _)| *p == id) {
            Some(slot) => slot.1 = value,
            None => self.pending.push((id, value)),
        }
    }

    pub fn pending(&self) -> &[(QuantityId, f64)] {
        &self.pending
    }

    /// Runs one tick.
    ///
    /// Queued suggestions are consumed even when the tick fails. On error
    /// the reported baseline is left untouched.
    pub fn tick<S: Solver + ?Sized>(
        &mut self,
        quantities: &mut QuantityTable,
        solver: &mut S,
    ) -> Result<ChangeSet> {
        let first = self.ticks == 0;

        let mut queued = mem::take(&mut self.pending);
        let mut suggestions = Vec::with_capacity(self.producers.len() + queued.len());
        for (id, producer) in &mut self.producers {
            let value = producer.produce().map_err(|source| SystemError::Producer {
                name: quantities.name(*id).unwrap_or_default().to_string(),
                source,
            })?;
            suggestions.push((*id, value));
        }
        suggestions.append(&mut queued);

        for &(id, value) in &suggestions {
            trace!(quantity = %id, value, "suggest");
            solver.suggest(id, value)?;
        }

        self.ticks += 1;
        if suggestions.is_empty() && !first {
            return Ok(ChangeSet::default());
        }
        solver.resolve()?;

        let changes = self.collect_changes(quantities, solver);
        debug!(
            tick = self.ticks,
            suggestions = suggestions.len(),
            changed = changes.len(),
            "tick resolved"
        );
        Ok(changes)
    }

    fn collect_changes<S: Solver + ?Sized>(
        &mut self,
        quantities: &mut QuantityTable,
        solver: &S,
    ) -> ChangeSet {
        let ids: Vec<QuantityId> = quantities.iter().map(|(id, _)| id).collect();
        if self.reported.len() < ids.len() {
            self.reported.resize(ids.len(), 0.0);
        }

        let mut changes = Vec::new();
        for id in ids {
            let Some(value) = solver.value(id) else {
                continue;
            };
            quantities.set_value(id, value);

            let baseline = &mut self.reported[id.index()];
            let moved = if self.tolerance > 0.0 {
                (value - *baseline).abs() > self.tolerance
            } else {
                value != *baseline
            };
            if moved {
                *baseline = value;
                if let Some(name) = quantities.name(id) {
                    changes.push((name.to_string(), value));
                }
            }
        }
        ChangeSet { changes }
    }
}
