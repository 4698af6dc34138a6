//! Depth-first cost walk over a type-checked document.
//!
//! Per field occurrence:
//! 1. resolve the rule (`resolver`) against the declaring type;
//! 2. resolve the rule's multiplier argument (`arguments`);
//! 3. contribution = complexity × product(stack) × own multiplier, or just
//!    complexity when the rule opts out of multipliers; a negative multiplier
//!    zeroes the field's own contribution;
//! 4. enter a `FieldScope` carrying the multiplier (a negative one is pushed
//!    as 0 so the whole subtree costs nothing) and recurse.
//!
//! Operation roots and fragments cost nothing themselves. The budget is
//! checked once, after every operation has been walked.

use gqlcost_core::config::CostConfig;
use gqlcost_core::error::Result;
use gqlcost_core::failure::{CostViolation, ValidationFailure};
use gqlcost_core::query::{Document, FieldSelection, Operation, OperationKind, Selection};
use gqlcost_core::schema::{Schema, TypeDef};
use gqlcost_core::value::Variables;

use crate::accumulator::CostAccumulator;
use crate::arguments::{resolve_multiplier, MultiplierValue};
use crate::budget::check_budget;
use crate::metrics;
use crate::report::{CostReport, FieldCost, OperationCost};
use crate::resolver::{CostResolver, Resolution};
use crate::sink::FailureSink;

/// A configured analysis. Holds only shared references, so one instance can
/// serve any number of documents; each `analyze` call owns its own state.
#[derive(Debug, Clone, Copy)]
pub struct CostAnalysis<'a> {
    schema: &'a Schema,
    config: &'a CostConfig,
    resolver: CostResolver<'a>,
    variables: Option<&'a Variables>,
    record_fields: bool,
}

impl<'a> CostAnalysis<'a> {
    pub fn new(schema: &'a Schema, config: &'a CostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            schema,
            config,
            resolver: CostResolver::new(schema, config),
            variables: None,
            record_fields: false,
        })
    }

    /// Variables substituted into `Variable` argument values.
    pub fn with_variables(mut self, variables: &'a Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Keep a per-field breakdown in the report.
    pub fn record_fields(mut self, enabled: bool) -> Self {
        self.record_fields = enabled;
        self
    }

    pub fn config(&self) -> &CostConfig {
        self.config
    }

    /// Cost `document`, reporting failures to `sink`. The returned report is
    /// produced whether or not the budget was exceeded.
    pub fn analyze<S>(&self, document: &Document, sink: &mut S) -> CostReport
    where
        S: FailureSink + ?Sized,
    {
        let mut acc = CostAccumulator::new(self.config.starting_cost);
        if self.record_fields {
            acc = acc.recording();
        }

        let mut reported = 0usize;
        let mut counting = |failure: ValidationFailure| {
            reported += 1;
            sink.report(failure);
        };

        let mut operations = Vec::with_capacity(document.operations.len());
        for operation in &document.operations {
            let before = acc.total();
            self.visit_operation(operation, &mut acc, &mut counting);
            operations.push(OperationCost {
                kind: operation.kind,
                name: operation.name.clone(),
                cost: acc.total().saturating_sub(before),
            });
        }

        let finished = acc.finish();
        debug_assert!(finished.final_stack.is_empty(), "multiplier stack left non-empty");

        if let Some(failure) = check_budget(finished.total, self.config.maximum_cost) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                total = finished.total,
                maximum = self.config.maximum_cost,
                "query exceeds maximum cost"
            );
            counting(failure);
        }

        let report = CostReport {
            total_cost: finished.total,
            maximum_cost: self.config.maximum_cost,
            operations,
            fields_costed: finished.fields_costed,
            multipliers: finished.last_multipliers,
            final_stack: finished.final_stack,
            failures_reported: reported,
            fields: finished.fields,
        };
        metrics::emit_summary(&report);
        report
    }

    fn root_type(&self, kind: OperationKind) -> Option<&'a TypeDef> {
        let name = match kind {
            OperationKind::Query => Some(self.schema.query_type()),
            OperationKind::Mutation => self.schema.mutation_type(),
            OperationKind::Subscription => self.schema.subscription_type(),
        };
        name.and_then(|n| self.schema.type_def(n))
    }

    fn visit_operation<F>(&self, operation: &Operation, acc: &mut CostAccumulator, report: &mut F)
    where
        F: FnMut(ValidationFailure),
    {
        let root = self.root_type(operation.kind);
        #[cfg(feature = "tracing")]
        if root.is_none() {
            tracing::debug!(
                operation = operation.label(),
                kind = ?operation.kind,
                "schema has no root type for operation kind; fields cost the default"
            );
        }
        self.visit_selections(&operation.selections, root, acc, report);
    }

    fn visit_selections<F>(
        &self,
        selections: &[Selection],
        parent: Option<&'a TypeDef>,
        acc: &mut CostAccumulator,
        report: &mut F,
    ) where
        F: FnMut(ValidationFailure),
    {
        for selection in selections {
            match selection {
                Selection::Field(field) => self.visit_field(field, parent, acc, report),
                Selection::InlineFragment(fragment) => {
                    let scope_type = fragment
                        .type_condition
                        .as_deref()
                        .and_then(|name| self.schema.type_def(name))
                        .or(parent);
                    self.visit_selections(&fragment.selections, scope_type, acc, report);
                }
            }
        }
    }

    fn visit_field<F>(
        &self,
        field: &FieldSelection,
        parent: Option<&'a TypeDef>,
        acc: &mut CostAccumulator,
        report: &mut F,
    ) where
        F: FnMut(ValidationFailure),
    {
        let def = parent.and_then(|t| t.field(&field.name));
        let resolution = self
            .resolver
            .resolve(parent.map(|t| t.name.as_str()), &field.name, def);

        let (contribution, pushed, entry) = match resolution {
            Resolution::Rule { rule, source } => {
                let multiplier = match rule.multiplier.as_deref() {
                    Some(path) => resolve_multiplier(path, field, def, self.variables),
                    None => MultiplierValue::Absent,
                };
                let path_factor = acc.path_factor();
                let contribution = match multiplier {
                    MultiplierValue::Negative(_) => 0,
                    _ if !rule.use_multipliers => rule.complexity,
                    MultiplierValue::Count(own) => rule
                        .complexity
                        .saturating_mul(path_factor)
                        .saturating_mul(own),
                    MultiplierValue::Absent => rule.complexity.saturating_mul(path_factor),
                };

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    field = %field.name,
                    ?source,
                    complexity = rule.complexity,
                    path_factor,
                    ?multiplier,
                    contribution,
                    "costed field"
                );

                let entry = FieldCost {
                    path: Vec::new(),
                    source: Some(source),
                    complexity: rule.complexity,
                    path_factor,
                    own_multiplier: multiplier.stack_value(),
                    use_multipliers: rule.use_multipliers,
                    negative_multiplier: matches!(multiplier, MultiplierValue::Negative(_)),
                    contribution,
                };
                (contribution, multiplier.stack_value(), entry)
            }
            Resolution::InvalidComplexity { complexity, .. } => {
                let mut path = acc.path().to_vec();
                path.push(field.response_key().to_string());

                #[cfg(feature = "tracing")]
                tracing::warn!(field = %field.name, complexity, path = %path.join("."), "invalid complexity");

                report(ValidationFailure::new(
                    CostViolation::InvalidComplexity { complexity },
                    path,
                ));
                let entry = FieldCost {
                    path: Vec::new(),
                    source: None,
                    complexity: 0,
                    path_factor: acc.path_factor(),
                    own_multiplier: None,
                    use_multipliers: false,
                    negative_multiplier: false,
                    contribution: 0,
                };
                (0, None, entry)
            }
        };

        acc.add(contribution);
        let mut scope = acc.enter(field.response_key(), pushed);
        if scope.is_recording() {
            let path = scope.path().to_vec();
            scope.record(FieldCost { path, ..entry });
        }

        if field.selections.is_empty() {
            return;
        }
        // Leaf types have no fields to resolve against.
        let child_type = def
            .map(|d| d.ty.named_type())
            .and_then(|name| self.schema.type_def(name))
            .filter(|t| t.kind.is_composite());
        self.visit_selections(&field.selections, child_type, &mut scope, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::IgnoreFailures;
    use gqlcost_core::query::InlineFragment;
    use gqlcost_core::rule::CostAnnotation;
    use gqlcost_core::schema::{ArgumentDef, FieldDef, TypeKind, TypeRef};

    fn limited(name: &str, ty: &str, complexity: i64) -> FieldDef {
        FieldDef::new(name, TypeRef::named(ty))
            .with_argument(ArgumentDef::new("limit", TypeRef::named("Int")))
            .with_cost(CostAnnotation::complexity(complexity).multiplier("limit"))
    }

    fn schema() -> Schema {
        Schema::new(
            "Query",
            vec![
                TypeDef::object("Query")
                    .with_field(limited("first", "First", 2))
                    .with_field(FieldDef::new("plain", TypeRef::named("Int")))
                    .with_field(FieldDef::new("node", TypeRef::named("Node")))
                    .with_field(FieldDef::new("odd", TypeRef::named("Odd"))),
                TypeDef::object("First")
                    .with_field(limited("second", "String", 5))
                    .with_field(FieldDef::new("string", TypeRef::named("String"))),
                TypeDef::scalar("Odd").with_field(
                    FieldDef::new("heavy", TypeRef::named("Int"))
                        .with_cost(CostAnnotation::complexity(9)),
                ),
                TypeDef::new("Node", TypeKind::Interface)
                    .with_field(FieldDef::new("id", TypeRef::named("ID"))),
                TypeDef::object("Thing")
                    .with_field(FieldDef::new("id", TypeRef::named("ID")))
                    .with_field(
                        FieldDef::new("heavy", TypeRef::named("Int"))
                            .with_cost(CostAnnotation::complexity(9)),
                    ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn nested_multipliers_compound() {
        let schema = schema();
        let config = CostConfig::new(1_000);
        let analysis = CostAnalysis::new(&schema, &config).unwrap();
        let doc = Document::query(vec![FieldSelection::new("first")
            .arg("limit", 3)
            .select(FieldSelection::new("second").arg("limit", 4))
            .into()]);

        let mut failures: Vec<ValidationFailure> = Vec::new();
        let report = analysis.analyze(&doc, &mut failures);
        // 2·3 + 5·3·4
        assert_eq!(report.total_cost, 66);
        assert_eq!(report.multipliers, vec![3, 4]);
        assert!(report.final_stack.is_empty());
        assert!(failures.is_empty());
    }

    #[test]
    fn fragments_switch_declaring_type() {
        let schema = schema();
        let config = CostConfig::new(1_000);
        let analysis = CostAnalysis::new(&schema, &config).unwrap();
        let doc = Document::query(vec![FieldSelection::new("node")
            .select(InlineFragment::new(
                Some("Thing".into()),
                vec![FieldSelection::new("heavy").into()],
            ))
            .into()]);

        let report = analysis.analyze(&doc, &mut IgnoreFailures);
        assert_eq!(report.total_cost, 9);
        assert_eq!(report.fields_costed, 2);
    }

    #[test]
    fn recording_keeps_paths_and_sources() {
        let schema = schema();
        let config = CostConfig::new(1_000).with_default_cost(1);
        let analysis = CostAnalysis::new(&schema, &config).unwrap().record_fields(true);
        let doc = Document::query(vec![FieldSelection::new("first")
            .alias("f")
            .arg("limit", 2)
            .select(FieldSelection::new("string"))
            .into()]);

        let report = analysis.analyze(&doc, &mut IgnoreFailures);
        let paths: Vec<String> = report.fields.iter().map(|f| f.path.join(".")).collect();
        assert_eq!(paths, vec!["f", "f.string"]);
        assert_eq!(report.fields[1].contribution, 2);
        assert_eq!(report.fields[1].path_factor, 2);
        assert_eq!(report.total_cost, 4 + 2);
    }

    #[test]
    fn leaf_types_do_not_resolve_sub_selections() {
        let schema = schema();
        let config = CostConfig::new(1_000).with_default_cost(1);
        let analysis = CostAnalysis::new(&schema, &config).unwrap();
        let doc = Document::query(vec![FieldSelection::new("odd")
            .select(FieldSelection::new("heavy"))
            .into()]);

        let report = analysis.analyze(&doc, &mut IgnoreFailures);
        // Both fields fall back to the default; `Odd.heavy` is never consulted.
        assert_eq!(report.total_cost, 2);
        assert_eq!(report.fields_costed, 2);
    }

    #[test]
    fn zero_budget_is_a_contract_violation() {
        let schema = schema();
        let config = CostConfig::new(0);
        assert!(CostAnalysis::new(&schema, &config).is_err());
    }
}
