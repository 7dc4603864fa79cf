//! Materializes quantities and formulas in build order.


use std::collections::BTreeMap;

use cassowary_system_core::{
    BuiltPrimitive, CompileError, Expression, Producer, QuantityId, QuantityTable, RawTerm,
    Strength, TermKind,
};
use cassowary_system_solver::Solver;
use tracing::debug;

use crate::formula;
use crate::order::BuildPlan;
use crate::scope::Scope;
use crate::Result;

/// Options applied while building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Strength at which every quantity is registered as adjustable.
    pub edit_strength: Strength,
    /// Submit compiled rules to the solver.
    pub register_rules: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            edit_strength: Strength::Strong,
            register_rules: true,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edit_strength(mut self, strength: Strength) -> Self {
        self.edit_strength = strength;
        self
    }

    pub fn with_register_rules(mut self, register: bool) -> Self {
        self.register_rules = register;
        self
    }
}

/// Built quantities and formulas.
#[derive(Debug, Default)]
pub struct Model {
    pub quantities: QuantityTable,
    pub formulas: BTreeMap<String, Expression>,
    /// Refresh functions, in build order.
    pub producers: Vec<(QuantityId, Producer)>,
}

impl Model {
    pub fn scope<'a>(&'a self, prebuilt: &'a BTreeMap<String, Expression>) -> Scope<'a> {
        Scope::new(&self.quantities, &self.formulas, prebuilt)
    }
}

/// Builds every name of `plan`, registering quantities with `solver`.
///
/// A name found in `quantities` becomes a quantity; any other name is
/// taken from `formulas`. Producers are moved out of `quantities` and
/// recorded on the returned model; their quantities start at 0.
pub fn build<S: Solver + ?Sized>(
    plan: &BuildPlan,
    mut quantities: BTreeMap<String, RawTerm>,
    formulas: &BTreeMap<String, RawTerm>,
    prebuilt: &BTreeMap<String, Expression>,
    solver: &mut S,
    options: &BuildOptions,
) -> Result<Model> {
    let mut model = Model::default();

    for name in plan.names() {
        if let Some(term) = quantities.remove(name) {
            build_quantity(&mut model, name, term, solver, options)?;
        } else if let Some(term) = formulas.get(name) {
            let expr = build_formula(name, term, model.scope(prebuilt))?;
            debug!(name = name.as_str(), expr = %expr, "built formula");
            model.formulas.insert(name.clone(), expr);
        } else {
            return Err(CompileError::MissingReference { name: name.clone() }.into());
        }
    }

    Ok(model)
}

fn build_quantity<S: Solver + ?Sized>(
    model: &mut Model,
    name: &str,
    term: RawTerm,
    solver: &mut S,
    options: &BuildOptions,
) -> Result<()> {
    let (initial, producer) = match term {
        RawTerm::Producer(producer) => (0.0, Some(producer)),
        other => match other.classify()? {
            TermKind::Literal(value) | TermKind::Descriptor(value) => (value, None),
            TermKind::Reference(reference) => {
                return Err(CompileError::AtomicReference {
                    name: name.to_string(),
                    reference: reference.to_string(),
                }
                .into())
            }
            _ => {
                return Err(CompileError::UnresolvableTerm(format!(
                    "quantity '{name}' must be a number, a {{ value }} descriptor, or a producer, got {}",
                    other.describe()
                ))
                .into())
            }
        },
    };

    let id = model.quantities.insert(name, initial)?;
    solver.register_adjustable(id, initial, options.edit_strength)?;
    debug!(
        name,
        id = %id,
        initial,
        reactive = producer.is_some(),
        "built quantity"
    );

    if let Some(producer) = producer {
        model.producers.push((id, producer));
    }
    Ok(())
}

fn build_formula(name: &str, term: &RawTerm, scope: Scope<'_>) -> Result<Expression> {
    let expr = match term.classify()? {
        TermKind::Literal(value) => Expression::constant(value),
        TermKind::Formula(elements) => formula::compile(name, elements, &scope)?,
        TermKind::Built(BuiltPrimitive::Strength(strength)) => {
            return Err(CompileError::UnresolvableTerm(format!(
                "formula '{name}' cannot be the strength '{strength}'"
            ))
            .into())
        }
        TermKind::Built(primitive) => scope.primitive(primitive)?,
        TermKind::Reference(reference) => {
            return Err(CompileError::AtomicReference {
                name: name.to_string(),
                reference: reference.to_string(),
            }
            .into())
        }
        TermKind::Descriptor(_) | TermKind::Producer | TermKind::Token(_) => {
            return Err(CompileError::UnresolvableTerm(format!(
                "formula '{name}' cannot be {}",
                term.describe()
            ))
            .into())
        }
    };
    Ok(expr)
}
