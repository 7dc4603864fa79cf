//! The system: one solver, its quantities, formulas, rules, and scheduler.

use std::collections::BTreeMap;

use cassowary_system_compiler::{compile_specification, BuildOptions, BuildPlan, Compiled};
use cassowary_system_config::SystemConfig;
use cassowary_system_core::{Expression, QuantityTable, Rule, Specification};
use cassowary_system_solver::{CassowarySolver, Solver, SolverError};
use tracing::debug;

use crate::scheduler::{ChangeSet, Scheduler};
use crate::surface::Surface;
use crate::{Result, SystemError};

/// A compiled specification bound to its own solver.
///
/// Built once, then driven by calling [`System::tick`] from an external
/// frame source. Systems share no state; any number may coexist.
#[derive(Debug)]
pub struct System<S = CassowarySolver> {
    solver: S,
    quantities: QuantityTable,
    formulas: BTreeMap<String, Expression>,
    prebuilt: BTreeMap<String, Expression>,
    rules: Vec<Rule>,
    plan: BuildPlan,
    scheduler: Scheduler,
    config: SystemConfig,
}

impl System<CassowarySolver> {
    /// Builds `spec` with default options on a fresh Cassowary solver.
    pub fn new(spec: Specification) -> Result<Self> {
        Self::with_config(spec, SystemConfig::default())
    }

    /// Builds `spec` with `config` on a fresh Cassowary solver.
    pub fn with_config(spec: Specification, config: SystemConfig) -> Result<Self> {
        Self::build(spec, config, CassowarySolver::new())
    }
}

impl<S: Solver> System<S> {
    /// Builds `spec` on the given solver.
    ///
    /// No resolution runs here; the first [`tick`](Self::tick) always
    /// resolves.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, compile, or solver error. A failed
    /// build leaves nothing behind.
    pub fn build(spec: Specification, config: SystemConfig, mut solver: S) -> Result<Self> {
        config.validate()?;
        let options = BuildOptions::new()
            .with_edit_strength(config.edit_strength)
            .with_register_rules(config.register_rules);

        let Compiled {
            model,
            rules,
            plan,
            prebuilt,
        } = compile_specification(spec, &mut solver, &options)?;

        let scheduler = Scheduler::new(model.producers, &model.quantities, config.change_tolerance);

        Ok(Self {
            solver,
            quantities: model.quantities,
            formulas: model.formulas,
            prebuilt,
            rules,
            plan,
            scheduler,
            config,
        })
    }

    /// Runs one tick and returns the quantities whose value changed.
    ///
    /// # Errors
    ///
    /// A failing producer or a rejected suggestion aborts the tick; the
    /// caller decides whether to keep ticking.
    pub fn tick(&mut self) -> Result<ChangeSet> {
        self.scheduler.tick(&mut self.quantities, &mut self.solver)
    }

    /// Runs one tick and hands a non-empty change-set to `surface`.
    ///
    /// Returns the number of changed quantities.
    pub fn tick_into(&mut self, surface: &mut impl Surface) -> Result<usize> {
        let changes = self.tick()?;
        if !changes.is_empty() {
            surface.apply(&changes);
        }
        Ok(changes.len())
    }

    /// Queues a suggestion for `name`, applied on the next tick.
    pub fn suggest(&mut self, name: &str, value: f64) -> Result<()> {
        let id = self
            .quantities
            .id(name)
            .ok_or_else(|| SystemError::UnknownQuantity(name.to_string()))?;
        if !value.is_finite() {
            return Err(SolverError::SuggestionRejected {
                id,
                value,
                reason: "value must be finite".to_string(),
            }
            .into());
        }
        debug!(name, value, "queued suggestion");
        self.scheduler.queue(id, value);
        Ok(())
    }

    /// Current value of a quantity.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.quantities.value_of(name)
    }

    /// Evaluates a formula (or pre-built expression) at current values.
    pub fn formula_value(&self, name: &str) -> Option<f64> {
        let expr = self
            .formulas
            .get(name)
            .or_else(|| self.prebuilt.get(name))?;
        Some(expr.evaluate(|id| self.quantities.value(id).unwrap_or(0.0)))
    }

    /// Every quantity's current value, keyed by name.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.quantities.snapshot()
    }

    /// Returns true while `name` is registered with the solver as adjustable.
    pub fn is_adjustable(&self, name: &str) -> bool {
        self.quantities
            .id(name)
            .is_some_and(|id| self.solver.is_adjustable(id))
    }

    pub fn quantities(&self) -> &QuantityTable {
        &self.quantities
    }

    pub fn formulas(&self) -> &BTreeMap<String, Expression> {
        &self.formulas
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn plan(&self) -> &BuildPlan {
        &self.plan
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Direct solver access. Values read through the system refresh on
    /// the next resolving tick.
    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Completed ticks.
    pub fn ticks(&self) -> u64 {
        self.scheduler.ticks()
    }
}
