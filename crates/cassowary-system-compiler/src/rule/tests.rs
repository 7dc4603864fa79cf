use std::collections::BTreeMap;

use super::*;
use cassowary_system_core::{terms, QuantityId, QuantityTable};

struct Fixture {
    quantities: QuantityTable,
    formulas: BTreeMap<String, Expression>,
    prebuilt: BTreeMap<String, Expression>,
}

impl Fixture {
    fn new() -> Self {
        let mut quantities = QuantityTable::new();
        quantities.insert("w", 10.0).unwrap();
        quantities.insert("h", 5.0).unwrap();
        let mut formulas = BTreeMap::new();
        formulas.insert(
            "perimeter".to_string(),
            Expression::term(W, 2.0).plus(Expression::term(H, 2.0)),
        );
        Self {
            quantities,
            formulas,
            prebuilt: BTreeMap::new(),
        }
    }

    fn build(&self, tuple: RawTerm) -> Result<Rule> {
        let scope = Scope::new(&self.quantities, &self.formulas, &self.prebuilt);
        match tuple {
            RawTerm::Formula(elements) => build_rule(&elements, &scope),
            other => build_rule(&[other], &scope),
        }
    }
}

const W: QuantityId = QuantityId::new(0);
const H: QuantityId = QuantityId::new(1);

#[test]
fn test_inequality_with_strength_and_default_weight() {
    let fixture = Fixture::new();
    let rule = fixture.build(terms!["w", ">=", "h", "strong"]).unwrap();
    assert_eq!(
        rule,
        Rule::Inequality {
            lhs: Expression::quantity(W),
            relation: Relation::GreaterOrEqual,
            rhs: Expression::quantity(H),
            strength: Strength::Strong,
            weight: 0.0,
        }
    );
}

#[test]
fn test_equation_defaults_to_medium() {
    let fixture = Fixture::new();
    let rule = fixture.build(terms!["perimeter", "=", 40]).unwrap();
    assert_eq!(rule.kind(), "equation");
    assert_eq!(rule.strength(), Strength::Medium);
    assert_eq!(rule.weight(), 0.0);
}

#[test]
fn test_weight_slot() {
    let fixture = Fixture::new();
    let rule = fixture.build(terms!["w", "<=", 400, "weak", 2]).unwrap();
    assert_eq!(rule.strength(), Strength::Weak);
    assert_eq!(rule.weight(), 2.0);

    let err = fixture.build(terms!["w", "<=", 400, "weak", -1]).unwrap_err();
    assert!(matches!(err, CompileError::MalformedRule(_)));
}

#[test]
fn test_strict_comparator_fails_before_resolving() {
    let fixture = Fixture::new();
    for tuple in [terms!["x", "<", 5], terms!["nowhere", ">", "w"]] {
        let err = fixture.build(tuple).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedComparator { .. }));
        assert!(err.to_string().contains("'<=' or '>='"));
    }
}

#[test]
fn test_stay_forms() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.build(terms!["w"]).unwrap(),
        Rule::Stay {
            target: Expression::quantity(W),
            strength: Strength::Medium,
            weight: 0.0,
        }
    );
    assert_eq!(
        fixture.build(RawTerm::reference("h")).unwrap().kind(),
        "stay"
    );

    let rule = fixture.build(terms!["w", "required", 3]).unwrap();
    assert_eq!(rule.strength(), Strength::Required);
    assert_eq!(rule.weight(), 3.0);
}

#[test]
fn test_blank_leading_term() {
    let fixture = Fixture::new();
    for tuple in [terms![], terms![""], terms![terms![], "=", 1], terms![">=", 1]] {
        assert!(matches!(
            fixture.build(tuple),
            Err(CompileError::MalformedRule(_))
        ));
    }
}

#[test]
fn test_unrecognized_strength() {
    let fixture = Fixture::new();
    let err = fixture.build(terms!["w", "=", "h", "loud"]).unwrap_err();
    assert_eq!(err, CompileError::UnrecognizedStrength("'loud'".into()));

    let err = fixture.build(terms!["w", 7]).unwrap_err();
    assert_eq!(err, CompileError::UnrecognizedStrength("7".into()));
}

#[test]
fn test_built_strength_is_accepted() {
    let fixture = Fixture::new();
    let rule = fixture
        .build(terms!["w", ">=", 0, Strength::Required])
        .unwrap();
    assert_eq!(rule.strength(), Strength::Required);
}

#[test]
fn test_nested_operands_compile_inline() {
    let fixture = Fixture::new();
    let rule = fixture
        .build(terms![terms!["w", "-", "h"], ">=", 2])
        .unwrap();
    match rule {
        Rule::Inequality { lhs, .. } => {
            assert_eq!(lhs.coefficient(W), 1.0);
            assert_eq!(lhs.coefficient(H), -1.0);
        }
        other => panic!("expected inequality, got {other:?}"),
    }
}

#[test]
fn test_malformed_shapes() {
    let fixture = Fixture::new();
    for tuple in [
        terms!["w", ">="],
        terms!["w", "+", "h"],
        terms!["w", "=", "h", "weak", 1, 2],
        terms!["w", "weak", 1, 2],
    ] {
        assert!(matches!(
            fixture.build(tuple),
            Err(CompileError::MalformedRule(_))
        ));
    }
}

#[test]
fn test_missing_operand() {
    let fixture = Fixture::new();
    let err = fixture.build(terms!["w", "=", "depth"]).unwrap_err();
    assert_eq!(
        err,
        CompileError::MissingReference {
            name: "depth".into()
        }
    );
}
