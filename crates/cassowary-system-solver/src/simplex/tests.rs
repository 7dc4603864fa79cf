//! Tests for the cassowary backend.

use super::*;

fn q(i: usize) -> QuantityId {
    QuantityId::new(i)
}

fn approx(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("quantity should have a value");
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_initial_value_before_resolve() {
    let mut solver = CassowarySolver::new();
    solver
        .register_adjustable(q(0), 200.0, Strength::Strong)
        .unwrap();

    assert!(solver.is_adjustable(q(0)));
    approx(solver.value(q(0)), 200.0);

    solver.resolve().unwrap();
    approx(solver.value(q(0)), 200.0);
}

#[test]
fn test_required_inequality_clamps_suggestion() {
    let mut solver = CassowarySolver::new();
    solver.register_adjustable(q(0), 0.0, Strength::Strong).unwrap();
    solver
        .add_rules(&[Rule::Inequality {
            lhs: Expression::quantity(q(0)),
            relation: Relation::LessOrEqual,
            rhs: Expression::constant(100.0),
            strength: Strength::Required,
            weight: 0.0,
        }])
        .unwrap();

    solver.suggest(q(0), 150.0).unwrap();
    solver.resolve().unwrap();
    approx(solver.value(q(0)), 100.0);

    solver.suggest(q(0), 40.0).unwrap();
    solver.resolve().unwrap();
    approx(solver.value(q(0)), 40.0);
}

#[test]
fn test_equation_follows_stronger_input() {
    let mut solver = CassowarySolver::new();
    solver.register_adjustable(q(0), 10.0, Strength::Strong).unwrap();
    solver.register_adjustable(q(1), 0.0, Strength::Weak).unwrap();
    solver
        .add_rules(&[Rule::Equation {
            lhs: Expression::quantity(q(1)),
            rhs: Expression::term(q(0), 2.0),
            strength: Strength::Required,
            weight: 0.0,
        }])
        .unwrap();

    solver.resolve().unwrap();
    approx(solver.value(q(0)), 10.0);
    approx(solver.value(q(1)), 20.0);
    assert_eq!(solver.rule_count(), 1);
}

#[test]
fn test_stay_pins_current_value() {
    let mut solver = CassowarySolver::new();
    solver.register_adjustable(q(0), 30.0, Strength::Weak).unwrap();
    solver
        .add_rules(&[Rule::Stay {
            target: Expression::quantity(q(0)),
            strength: Strength::Required,
            weight: 0.0,
        }])
        .unwrap();

    solver.suggest(q(0), 90.0).unwrap();
    solver.resolve().unwrap();
    approx(solver.value(q(0)), 30.0);
}

#[test]
fn test_unknown_quantity_is_rejected() {
    let mut solver = CassowarySolver::new();
    assert_eq!(
        solver.suggest(q(3), 1.0),
        Err(SolverError::UnknownQuantity(q(3)))
    );

    let err = solver
        .add_rules(&[Rule::Stay {
            target: Expression::quantity(q(3)),
            strength: Strength::Medium,
            weight: 0.0,
        }])
        .unwrap_err();
    assert_eq!(err, SolverError::UnknownQuantity(q(3)));
}

#[test]
fn test_registration_errors() {
    let mut solver = CassowarySolver::new();
    assert_eq!(
        solver.register_adjustable(q(0), 0.0, Strength::Required),
        Err(SolverError::RequiredAdjustable(q(0)))
    );

    solver.register_adjustable(q(0), 0.0, Strength::Strong).unwrap();
    assert_eq!(
        solver.register_adjustable(q(0), 1.0, Strength::Strong),
        Err(SolverError::DuplicateAdjustable(q(0)))
    );
}

#[test]
fn test_conflicting_required_rules_are_unsatisfiable() {
    let mut solver = CassowarySolver::new();
    solver.register_adjustable(q(0), 0.0, Strength::Strong).unwrap();
    let at_least = Rule::Inequality {
        lhs: Expression::quantity(q(0)),
        relation: Relation::GreaterOrEqual,
        rhs: Expression::constant(10.0),
        strength: Strength::Required,
        weight: 0.0,
    };
    let at_most = Rule::Inequality {
        lhs: Expression::quantity(q(0)),
        relation: Relation::LessOrEqual,
        rhs: Expression::constant(5.0),
        strength: Strength::Required,
        weight: 0.0,
    };

    let err = solver.add_rules(&[at_least, at_most]).unwrap_err();
    assert!(matches!(err, SolverError::Unsatisfiable(_)));
}

#[test]
fn test_weight_scales_non_required_strength() {
    assert_eq!(weighted(Strength::Medium, 0.0), levels::MEDIUM);
    assert_eq!(weighted(Strength::Medium, 2.0), levels::MEDIUM * 2.0);
    assert_eq!(weighted(Strength::Required, 5.0), levels::REQUIRED);
}

#[test]
fn test_fractional_weight_weakens_strength() {
    let faint = weighted(Strength::Medium, 0.001);
    assert!(faint < levels::MEDIUM);
    assert!((faint - levels::WEAK).abs() < 1e-9);
    assert!(weighted(Strength::Medium, 0.5) < weighted(Strength::Medium, 0.0));
}
