//! Scheduler behavior against a recording solver.

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use cassowary_system_test::{fixtures, SolverCall};

#[test]
fn test_first_tick_reports_produced_value_only() {
    let mut system = recorded(fixtures::constant_and_producer());
    let b = id(&system, "b");

    let changes = system.tick().unwrap();

    assert_eq!(system.solver().suggestions(), vec![(b, 2.0)]);
    assert_eq!(system.solver().resolve_count(), 1);
    assert_eq!(changes.get("b"), Some(2.0));
    assert!(!changes.contains("a"));
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_unchanged_values_are_not_reported_again() {
    let mut system = recorded(fixtures::constant_and_producer());
    system.tick().unwrap();

    let changes = system.tick().unwrap();
    assert!(changes.is_empty());
    assert_eq!(system.ticks(), 2);
}

#[test]
fn test_suggestions_are_batched_before_one_resolve() {
    let pointer = cassowary_system_test::Pointer::at(120.0, 80.0);
    let mut system = recorded(fixtures::drag_box_with(&pointer));
    system.solver_mut().clear_calls();

    system.tick().unwrap();
    pointer.move_to(130.0, 90.0);
    system.tick().unwrap();

    let calls = system.solver().calls();
    assert_eq!(
        calls,
        &[
            SolverCall::Suggest {
                id: id(&system, "left"),
                value: 120.0
            },
            SolverCall::Suggest {
                id: id(&system, "top"),
                value: 80.0
            },
            SolverCall::Resolve,
            SolverCall::Suggest {
                id: id(&system, "left"),
                value: 130.0
            },
            SolverCall::Suggest {
                id: id(&system, "top"),
                value: 90.0
            },
            SolverCall::Resolve,
        ]
    );
}

#[test]
fn test_no_resolve_without_producers_after_first_tick() {
    let spec = Specification::new().quantity("x", 1.0);
    let mut system = recorded(spec);

    assert!(system.tick().unwrap().is_empty());
    assert!(system.tick().unwrap().is_empty());
    assert_eq!(system.solver().resolve_count(), 1);
}

#[test]
fn test_rule_driven_changes_are_reported() {
    let spec = Specification::new()
        .quantity("a", 1.0)
        .producer("b", || 2.0);
    let mut solver = RecordingSolver::new();
    solver.force_on_resolve(QuantityId::new(0), 7.0);
    let mut system = System::build(spec, SystemConfig::default(), solver).unwrap();

    let changes = system.tick().unwrap();
    assert_eq!(changes.get("a"), Some(7.0));
    assert_eq!(changes.get("b"), Some(2.0));
    assert_eq!(system.value("a"), Some(7.0));
}

#[test]
fn test_queued_suggestion_triggers_resolve() {
    let spec = Specification::new().quantity("x", 1.0);
    let mut system = recorded(spec);
    system.tick().unwrap();

    system.suggest("x", 5.0).unwrap();
    system.suggest("x", 6.0).unwrap();
    let changes = system.tick().unwrap();

    assert_eq!(changes.get("x"), Some(6.0));
    assert_eq!(system.solver().resolve_count(), 2);
    assert!(system.scheduler().pending().is_empty());
}

#[test]
fn test_suggest_unknown_or_non_finite() {
    let mut system = recorded(Specification::new().quantity("x", 1.0));

    assert!(matches!(
        system.suggest("y", 1.0),
        Err(SystemError::UnknownQuantity(ref name)) if name == "y"
    ));
    assert!(matches!(
        system.suggest("x", f64::NAN),
        Err(SystemError::Solver(SolverError::SuggestionRejected { .. }))
    ));
}

#[test]
fn test_producer_failure_propagates() {
    let spec = Specification::new().quantity_term(
        "x",
        Producer::fallible(|| Err(ProducerError::Failed("sensor offline".into()))),
    );
    let mut system = recorded(spec);

    match system.tick() {
        Err(SystemError::Producer { name, source }) => {
            assert_eq!(name, "x");
            assert_eq!(source, ProducerError::Failed("sensor offline".into()));
        }
        other => panic!("expected producer error, got {other:?}"),
    }
    assert_eq!(system.solver().resolve_count(), 0);
}

#[test]
fn test_failed_tick_consumes_queued_suggestions() {
    let spec = Specification::new().quantity("y", 1.0).quantity_term(
        "x",
        Producer::fallible(|| Err(ProducerError::Failed("sensor offline".into()))),
    );
    let mut system = recorded(spec);
    system.suggest("y", 5.0).unwrap();
    assert_eq!(system.scheduler().pending().len(), 1);

    assert!(system.tick().is_err());
    assert!(system.scheduler().pending().is_empty());
    assert!(system.solver().suggestions().is_empty());
}

#[test]
fn test_non_finite_producer_value_is_an_error() {
    let mut system = recorded(Specification::new().producer("x", || f64::INFINITY));
    assert!(matches!(
        system.tick(),
        Err(SystemError::Producer {
            source: ProducerError::NonFinite(_),
            ..
        })
    ));
}

#[test]
fn test_rejected_suggestion_keeps_baseline() {
    let value = Rc::new(Cell::new(3.0));
    let produced = Rc::clone(&value);
    let spec = Specification::new().producer("x", move || produced.get());
    let mut solver = RecordingSolver::new();
    solver.reject_suggestions_for(QuantityId::new(0));
    let mut system = System::build(spec, SystemConfig::default(), solver).unwrap();

    assert!(matches!(
        system.tick(),
        Err(SystemError::Solver(SolverError::SuggestionRejected { .. }))
    ));
    assert_eq!(system.value("x"), Some(0.0));
    assert_eq!(system.ticks(), 0);
    value.set(4.0);
    assert!(system.tick().is_err());
}

#[test]
fn test_every_quantity_stays_adjustable() {
    let pointer = cassowary_system_test::Pointer::at(50.0, 50.0);
    let mut system = recorded(fixtures::drag_box_with(&pointer));
    for step in 0..5 {
        pointer.move_to(50.0 + step as f64, 50.0);
        system.tick().unwrap();
    }
    for name in ["width", "height", "left", "top"] {
        assert!(system.is_adjustable(name));
    }
    assert!(!system.is_adjustable("right"));
}

#[test]
fn test_tick_into_skips_empty_change_sets() {
    let mut system = recorded(fixtures::constant_and_producer());
    let mut applied = Vec::new();
    let mut surface = |changes: &ChangeSet| applied.push(changes.clone().into_map());

    assert_eq!(system.tick_into(&mut surface).unwrap(), 1);
    assert_eq!(system.tick_into(&mut surface).unwrap(), 0);
    drop(surface);

    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0]["b"], 2.0);
}

#[test]
fn test_change_tolerance() {
    let value = Rc::new(Cell::new(10.0));
    let produced = Rc::clone(&value);
    let spec = Specification::new().producer("x", move || produced.get());
    let config = SystemConfig::new().with_change_tolerance(0.5);
    let mut system = System::build(spec, config, RecordingSolver::new()).unwrap();

    assert_eq!(system.tick().unwrap().get("x"), Some(10.0));
    value.set(10.3);
    assert!(system.tick().unwrap().is_empty());
    value.set(10.6);
    assert_eq!(system.tick().unwrap().get("x"), Some(10.6));
    // The current value tracks the solver even when not reported.
    value.set(10.7);
    assert!(system.tick().unwrap().is_empty());
    assert_eq!(system.value("x"), Some(10.7));
}
