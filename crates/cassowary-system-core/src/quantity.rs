//! Arena of named, solver-backed quantities.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{CompileError, Result};

/// Stable index of a quantity inside a [`QuantityTable`].
///
/// Expressions and rules hold these ids instead of aliases to mutable
/// cells; only the owning table is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuantityId(usize);

impl QuantityId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for QuantityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A named adjustable scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub name: String,
    pub value: f64,
}

/// Owning table of every quantity in one system.
///
/// Quantities are appended during the build pass and never removed.
#[derive(Debug, Clone, Default)]
pub struct QuantityTable {
    entries: Vec<Quantity>,
    index: HashMap<String, QuantityId>,
}

impl QuantityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quantity, failing if the name is already taken.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Result<QuantityId> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(CompileError::DuplicateName(name));
        }
        let id = QuantityId(self.entries.len());
        self.index.insert(name.clone(), id);
        self.entries.push(Quantity { name, value });
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Option<QuantityId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: QuantityId) -> Option<&Quantity> {
        self.entries.get(id.0)
    }

    pub fn value(&self, id: QuantityId) -> Option<f64> {
        self.get(id).map(|q| q.value)
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.id(name).and_then(|id| self.value(id))
    }

    pub fn name(&self, id: QuantityId) -> Option<&str> {
        self.get(id).map(|q| q.name.as_str())
    }

    /// Overwrites the current value. Returns `false` for an unknown id.
    pub fn set_value(&mut self, id: QuantityId, value: f64) -> bool {
        match self.entries.get_mut(id.0) {
            Some(quantity) => {
                quantity.value = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: QuantityId) -> bool {
        id.0 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates quantities in insertion (build) order.
    pub fn iter(&self) -> impl Iterator<Item = (QuantityId, &Quantity)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, q)| (QuantityId(i), q))
    }

    /// Current values keyed by name.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|q| (q.name.clone(), q.value))
            .collect()
    }
}
