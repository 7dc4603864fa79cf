//! In-code form of the declarative specification.

use std::collections::BTreeMap;

use crate::expression::Expression;
use crate::term::{Producer, RawTerm};

/// Named quantities, named formulas, and rule tuples.
///
/// Tables are keyed by name in a `BTreeMap`, so nothing downstream depends
/// on the order in which entries were added.
///
/// # Example
///
/// ```
/// use cassowary_system_core::{terms, Specification};
///
/// let spec = Specification::new()
///     .quantity("width", 200.0)
///     .quantity("left", 20.0)
///     .formula("right", terms!["left", "+", "width"])
///     .rule(terms!["right", "<=", 400, "required"]);
///
/// assert_eq!(spec.quantities.len(), 2);
/// assert_eq!(spec.rules.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Specification {
    pub quantities: BTreeMap<String, RawTerm>,
    pub formulas: BTreeMap<String, RawTerm>,
    pub rules: Vec<Vec<RawTerm>>,
    /// Expressions that exist before the build and may be referenced by name.
    pub prebuilt: BTreeMap<String, Expression>,
}

impl Specification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(mut self, name: impl Into<String>, value: f64) -> Self {
        self.quantities.insert(name.into(), RawTerm::Number(value));
        self
    }

    /// Adds a quantity given as a `{ value }` descriptor.
    pub fn descriptor(mut self, name: impl Into<String>, value: f64) -> Self {
        self.quantities
            .insert(name.into(), RawTerm::Descriptor { value });
        self
    }

    /// Adds a quantity whose value is re-produced on every tick.
    pub fn producer(mut self, name: impl Into<String>, f: impl FnMut() -> f64 + 'static) -> Self {
        self.quantities
            .insert(name.into(), RawTerm::Producer(Producer::new(f)));
        self
    }

    /// Adds a quantity with an arbitrary raw term.
    pub fn quantity_term(mut self, name: impl Into<String>, term: impl Into<RawTerm>) -> Self {
        self.quantities.insert(name.into(), term.into());
        self
    }

    pub fn formula(mut self, name: impl Into<String>, term: impl Into<RawTerm>) -> Self {
        self.formulas.insert(name.into(), term.into());
        self
    }

    /// Adds a rule tuple. A formula array is unpacked into its elements.
    pub fn rule(mut self, tuple: impl Into<RawTerm>) -> Self {
        let tuple = match tuple.into() {
            RawTerm::Formula(elements) => elements,
            single => vec![single],
        };
        self.rules.push(tuple);
        self
    }

    pub fn prebuilt(mut self, name: impl Into<String>, expr: Expression) -> Self {
        self.prebuilt.insert(name.into(), expr);
        self
    }
}
