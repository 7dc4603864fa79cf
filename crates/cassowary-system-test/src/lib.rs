//! Shared test fixtures for cassowary-system crates.
//!
//! This crate provides a fake solver and ready-made specifications.
//! It does NOT depend on the compiler to avoid circular dependencies.
//!
//! - [`recording`] - a [`Solver`](cassowary_system_solver::Solver) that records every call
//! - [`fixtures`] - specifications modelled on a draggable, bounded box
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! cassowary-system-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use cassowary_system_test::{fixtures, RecordingSolver, SolverCall};
//! ```

pub mod fixtures;
pub mod recording;

pub use fixtures::Pointer;
pub use recording::{RecordingSolver, SolverCall};
