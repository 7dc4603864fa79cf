//! cassowary-system - declarative constraint layouts
//!
//! Describe named quantities, linear formulas over them, and rules relating
//! them; the system compiles that description into a constraint solver and
//! keeps the solver in sync with time-varying inputs one tick at a time.
//!
//! # Example
//!
//! ```rust
//! use cassowary_system::prelude::*;
//!
//! let spec = Specification::new()
//!     .quantity("width", 200.0)
//!     .quantity("left", 10.0)
//!     .formula("right", terms!["left", "+", "width"])
//!     .rule(terms!["left", ">=", 20, "required"])
//!     .rule(terms!["right", "<=", 400, "required"]);
//!
//! let mut system = System::new(spec).unwrap();
//! let changes = system.tick().unwrap();
//!
//! assert_eq!(changes.get("left"), Some(20.0));
//! assert_eq!(system.formula_value("right"), Some(220.0));
//! ```

mod scheduler;
mod surface;
mod system;

#[cfg(feature = "console")]
pub mod console;

#[cfg(test)]
mod tests;

pub use scheduler::{ChangeSet, Scheduler};
pub use surface::Surface;
pub use system::System;

pub use cassowary_system_compiler::{BuildError, BuildOptions, BuildPlan};
pub use cassowary_system_config::{ConfigError, SpecDocument, SystemConfig};
pub use cassowary_system_core::{
    terms, BuiltPrimitive, CompileError, Expression, Producer, ProducerError, QuantityId,
    QuantityTable, RawTerm, Relation, Rule, Specification, Strength,
};
pub use cassowary_system_solver::{CassowarySolver, Solver, SolverError};

use thiserror::Error;

/// Errors raised by a [`System`].
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Producer for '{name}' failed: {source}")]
    Producer {
        name: String,
        #[source]
        source: ProducerError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown quantity '{0}'")]
    UnknownQuantity(String),
}

impl From<BuildError> for SystemError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Compile(err) => SystemError::Compile(err),
            BuildError::Solver(err) => SystemError::Solver(err),
        }
    }
}

/// Result type alias for system operations.
pub type Result<T> = std::result::Result<T, SystemError>;

pub mod prelude {
    pub use super::{
        terms, ChangeSet, RawTerm, Result, Specification, Strength, Surface, System,
        SystemConfig, SystemError,
    };
}
