//! Specification compiler for cassowary-system.
//!
//! Turns a [`Specification`] into solver-level objects in four passes:
//!
//! 1. [`order`] computes a deterministic build order from the reference graph
//! 2. [`build`] materializes quantities (registering each as adjustable)
//!    and formulas, compiling formula arrays with [`formula::compile`]
//! 3. [`build_rule`] compiles every rule tuple
//! 4. the compiled rules are submitted to the solver
//!
//! A build either fully succeeds or returns the first error.

pub mod builder;
pub mod formula;
pub mod order;
pub mod rule;
pub mod scope;


pub use builder::{build, BuildOptions, Model};
pub use order::{order, BuildPlan};
pub use rule::build_rule;
pub use scope::Scope;

use std::collections::BTreeMap;

use cassowary_system_core::{CompileError, Expression, RawTerm, Rule, Specification};
use cassowary_system_solver::{Solver, SolverError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by a build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Everything a successful build produced.
#[derive(Debug)]
pub struct Compiled {
    pub model: Model,
    pub rules: Vec<Rule>,
    pub plan: BuildPlan,
    pub prebuilt: BTreeMap<String, Expression>,
}

/// Compiles `spec` against `solver`.
///
/// Every quantity is registered as adjustable; rules are submitted in one
/// batch unless `options.register_rules` is off.
pub fn compile_specification<S: Solver + ?Sized>(
    spec: Specification,
    solver: &mut S,
    options: &BuildOptions,
) -> Result<Compiled> {
    info!(
        event = "build_start",
        quantities = spec.quantities.len(),
        formulas = spec.formulas.len(),
        rules = spec.rules.len(),
    );

    if let Some(name) = spec
        .quantities
        .keys()
        .find(|name| spec.formulas.contains_key(*name))
    {
        return Err(CompileError::DuplicateName(name.clone()).into());
    }

    let plan = {
        let terms: BTreeMap<&str, &RawTerm> = spec
            .quantities
            .iter()
            .chain(&spec.formulas)
            .map(|(name, term)| (name.as_str(), term))
            .collect();
        order(&terms)?
    };

    let Specification {
        quantities,
        formulas,
        rules: tuples,
        prebuilt,
    } = spec;

    let model = build(&plan, quantities, &formulas, &prebuilt, solver, options)?;

    let scope = model.scope(&prebuilt);
    let mut rules = Vec::with_capacity(tuples.len());
    for (index, tuple) in tuples.iter().enumerate() {
        let rule = build_rule(tuple, &scope)?;
        debug!(
            index,
            kind = rule.kind(),
            strength = %rule.strength(),
            weight = rule.weight(),
            "built rule"
        );
        rules.push(rule);
    }

    if options.register_rules && !rules.is_empty() {
        solver.add_rules(&rules)?;
    }

    info!(
        event = "build_end",
        quantities = model.quantities.len(),
        formulas = model.formulas.len(),
        reactive = model.producers.len(),
        rules = rules.len(),
        registered = options.register_rules,
    );

    Ok(Compiled {
        model,
        rules,
        plan,
        prebuilt,
    })
}
