//! Tests for building and ticking systems.

mod test_tick;

use super::*;
use std::collections::BTreeMap;

use cassowary_system_test::RecordingSolver;

// Builds `spec` on a recording solver with default options.
fn recorded(spec: Specification) -> System<RecordingSolver> {
    System::build(spec, SystemConfig::default(), RecordingSolver::new()).unwrap()
}

fn id(system: &System<RecordingSolver>, name: &str) -> QuantityId {
    system.quantities().id(name).unwrap()
}

// Resolved values from the simplex backend are compared with a tolerance.
fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got no value"));
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
