//! Solver seam for cassowary-system.
//!
//! The compiler and scheduler never talk to a simplex implementation
//! directly; they drive a [`Solver`]. [`CassowarySolver`] is the backend
//! used in production, built on the `cassowary` crate. Tests substitute a
//! recording fake.

mod simplex;

pub use simplex::CassowarySolver;

use cassowary_system_core::{QuantityId, Rule, Strength};
use thiserror::Error;

/// Errors reported by a solver backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The quantity was never registered as adjustable.
    #[error("Unknown quantity {0}")]
    UnknownQuantity(QuantityId),

    /// The quantity is already registered as adjustable.
    #[error("Quantity {0} is already adjustable")]
    DuplicateAdjustable(QuantityId),

    /// Adjustable quantities cannot be registered at `required` strength.
    #[error("Adjustable quantity {0} cannot use required strength")]
    RequiredAdjustable(QuantityId),

    /// The rule is already registered.
    #[error("Duplicate rule: {0}")]
    DuplicateRule(String),

    /// A required rule conflicts with the rules already registered.
    #[error("Unsatisfiable rule: {0}")]
    Unsatisfiable(String),

    /// A suggested value was rejected.
    #[error("Suggestion of {value} for {id} was rejected: {reason}")]
    SuggestionRejected {
        id: QuantityId,
        value: f64,
        reason: String,
    },

    /// The backend failed internally.
    #[error("Internal solver error: {0}")]
    Internal(String),
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

/// A linear-arithmetic constraint solver, seen from the compiler.
///
/// Quantities are addressed by [`QuantityId`]; the backend keeps its own
/// mapping to internal variables. Suggestions are buffered by the backend
/// until [`Solver::resolve`] runs, after which [`Solver::value`] reports
/// resolved values.
pub trait Solver {
    /// Registers a quantity as an edit-capable input starting at `initial`.
    fn register_adjustable(
        &mut self,
        id: QuantityId,
        initial: f64,
        strength: Strength,
    ) -> Result<()>;

    /// Returns true if the quantity is registered as adjustable.
    fn is_adjustable(&self, id: QuantityId) -> bool;

    /// Suggests a new value for an adjustable quantity.
    fn suggest(&mut self, id: QuantityId, value: f64) -> Result<()>;

    /// Runs one resolution step over every pending suggestion.
    fn resolve(&mut self) -> Result<()>;

    /// Adds rules to the solver.
    fn add_rules(&mut self, rules: &[Rule]) -> Result<()>;

    /// The most recently resolved value of a quantity.
    fn value(&self, id: QuantityId) -> Option<f64>;
}
