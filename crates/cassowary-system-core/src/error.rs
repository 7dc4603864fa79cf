//! Error types for the specification compiler.

use thiserror::Error;

/// Errors raised while ordering, compiling, or building a specification.
///
/// Every variant is fatal to the build call that raised it; nothing is
/// retried or repaired.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A named reference does not resolve in the currently-built table.
    #[error("Missing reference for '{name}'")]
    MissingReference { name: String },

    /// A formula references its own name.
    #[error("Formula '{name}' cannot reference itself")]
    SelfReference { name: String },

    /// Formulas reference each other in a loop.
    #[error("Cyclic formula references: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// A strict `<` or `>` comparator was used.
    #[error("The comparator '{token}' is not supported; use '<=' or '>=' instead")]
    UnsupportedComparator { token: String },

    /// A rule tuple has a blank or unrecognized shape.
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    /// A formula array cannot be reduced to a single expression.
    #[error("Malformed formula '{name}': {reason}")]
    MalformedFormula { name: String, reason: String },

    /// A strength slot holds neither a strength token nor a built strength.
    #[error("Unrecognized strength '{0}'")]
    UnrecognizedStrength(String),

    /// A raw term matches none of the recognized shapes.
    #[error("Unable to resolve term: {0}")]
    UnresolvableTerm(String),

    /// A quantity or formula was defined as a bare reference string.
    #[error("Atomic terms cannot reference each other ('{name}': '{reference}')")]
    AtomicReference { name: String, reference: String },

    /// The same name was declared more than once.
    #[error("Name '{0}' is declared more than once")]
    DuplicateName(String),

    /// Two non-constant expressions were multiplied or divided, or a
    /// divisor folded to zero.
    #[error("Non-linear expression: {0}")]
    NonlinearExpression(String),
}

/// A producer function failed to yield a usable value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProducerError {
    /// The producer reported a failure of its own.
    #[error("Producer failed: {0}")]
    Failed(String),

    /// The producer returned NaN or an infinity.
    #[error("Producer returned a non-finite value ({0})")]
    NonFinite(f64),
}

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
