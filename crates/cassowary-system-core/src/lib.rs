//! cassowary-system core - shared types for the specification compiler
//!
//! This crate provides the vocabulary every other crate speaks:
//! - Tokens of the formula/rule mini-language
//! - Raw specification terms and their classifier
//! - Linear expressions over an arena of quantities
//! - Compiled rules and the error types

pub mod error;
pub mod expression;
pub mod quantity;
pub mod rule;
pub mod spec;
pub mod term;
pub mod token;

pub use error::{CompileError, ProducerError};
pub use expression::Expression;
pub use quantity::{Quantity, QuantityId, QuantityTable};
pub use rule::{Relation, Rule};
pub use spec::Specification;
pub use term::{BuiltPrimitive, Producer, RawTerm, TermKind};
pub use token::{Comparator, Operator, StrictComparator, Strength, Token};
