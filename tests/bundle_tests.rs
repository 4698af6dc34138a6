//! Bundle loading and end-to-end analysis tests

use gqlcost_analysis::{CostAnalysis, RuleSource};
use gqlcost_core::prelude::*;
use gqlcost_dsl::{parse_bundle, parse_variables_json, DslError};

const RECURSIVE: &str = include_str!("fixtures/recursive.yaml");

fn config_for(bundle: &gqlcost_dsl::Bundle) -> CostConfig {
    let mut config = CostConfig::new(0);
    bundle.config.apply_to(&mut config);
    config
}

#[test]
fn test_fixture_bundle_costs_6520() {
    let bundle = parse_bundle(RECURSIVE).unwrap();
    let config = config_for(&bundle);
    let analysis = CostAnalysis::new(&bundle.schema, &config)
        .unwrap()
        .with_variables(&bundle.variables);

    let mut failures: Vec<ValidationFailure> = Vec::new();
    let report = analysis.analyze(&bundle.document, &mut failures);

    // `third` has no argument in the document; its schema default of 10 applies.
    assert_eq!(report.total_cost, 6520);
    assert_eq!(report.multipliers, vec![10, 10, 10]);
    assert_eq!(report.operations[0].name.as_deref(), Some("Recursive"));
    assert!(failures.is_empty());
}

#[test]
fn test_overridden_variables_change_cost() {
    let mut bundle = parse_bundle(RECURSIVE).unwrap();
    bundle
        .variables
        .extend(parse_variables_json(r#"{"n": 1}"#).unwrap());
    let config = config_for(&bundle);
    let analysis = CostAnalysis::new(&bundle.schema, &config)
        .unwrap()
        .with_variables(&bundle.variables);

    let mut failures: Vec<ValidationFailure> = Vec::new();
    let report = analysis.analyze(&bundle.document, &mut failures);
    // 2·1 + 5·1·10 + 6·1·10·10
    assert_eq!(report.total_cost, 652);
}

#[test]
fn test_bundle_budget_failure_message() {
    let bundle = parse_bundle(RECURSIVE).unwrap();
    let mut config = config_for(&bundle);
    config.maximum_cost = 100;
    let analysis = CostAnalysis::new(&bundle.schema, &config)
        .unwrap()
        .with_variables(&bundle.variables);

    let mut failures: Vec<ValidationFailure> = Vec::new();
    analysis.analyze(&bundle.document, &mut failures);
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].to_string(),
        "The query exceeds the maximum cost of 100. Actual cost is 6520"
    );
}

#[test]
fn test_bundle_cost_map_takes_precedence() {
    let yaml = RECURSIVE.replace(
        "  default_cost: 0\n",
        "  default_cost: 0\n  cost_map:\n    Query: { first: { complexity: 1 } }\n",
    );
    let bundle = parse_bundle(&yaml).unwrap();
    let config = config_for(&bundle);
    let analysis = CostAnalysis::new(&bundle.schema, &config)
        .unwrap()
        .with_variables(&bundle.variables)
        .record_fields(true);

    let mut failures: Vec<ValidationFailure> = Vec::new();
    let report = analysis.analyze(&bundle.document, &mut failures);
    let first = &report.fields[0];
    assert_eq!(first.source, Some(RuleSource::CostMap));
    // Map rule has no multiplier: `first` costs 1 and pushes nothing.
    assert_eq!(first.contribution, 1);
    assert_eq!(report.total_cost, 1 + 5 * 10 + 6 * 10 * 10);
}

#[test]
fn test_malformed_type_reference_is_rejected() {
    let bundle = |ty: &str| {
        format!(
            r#"
schema:
  types:
    - name: Query
      fields: [ {{ name: x, type: "{ty}" }} ]
document:
  operations: [ {{ selections: [ {{ kind: field, name: x }} ] }} ]
"#
        )
    };

    assert!(parse_bundle(&bundle("[Int!]")).is_ok());

    match parse_bundle(&bundle("[Int!")) {
        Err(DslError::Yaml(e)) => assert!(
            e.to_string().contains("unbalanced list brackets"),
            "unexpected error: {e}"
        ),
        other => panic!("expected a type error, got {other:?}"),
    }
}

#[test]
fn test_report_serializes_to_json() {
    let bundle = parse_bundle(RECURSIVE).unwrap();
    let config = config_for(&bundle);
    let analysis = CostAnalysis::new(&bundle.schema, &config)
        .unwrap()
        .with_variables(&bundle.variables);

    let mut failures: Vec<ValidationFailure> = Vec::new();
    let report = analysis.analyze(&bundle.document, &mut failures);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_cost"], 6520);
    assert_eq!(json["operations"][0]["name"], "Recursive");
    assert_eq!(json["multipliers"], serde_json::json!([10, 10, 10]));
}
