//! Cost rule resolution for a single field occurrence.
//!
//! Precedence, first match wins:
//! 1. cost-map entry for (declaring type, field)
//! 2. `@cost` on the field definition
//! 3. `@cost` on the field's return type
//! 4. `{ complexity: default_cost, use_multipliers: true }`
//!
//! Authored complexities outside 1..=10 are rejected, not clamped. Cost-map
//! rules are trusted as given.

use std::borrow::Cow;

use gqlcost_core::config::CostConfig;
use gqlcost_core::rule::{CostAnnotation, CostRule};
use gqlcost_core::schema::{FieldDef, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    CostMap,
    FieldAnnotation,
    TypeAnnotation,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Rule {
        rule: Cow<'a, CostRule>,
        source: RuleSource,
    },
    /// The winning annotation carried a complexity outside 1..=10.
    InvalidComplexity { complexity: i64, source: RuleSource },
}

/// Read-only view over schema + config; safe to share across analyses.
#[derive(Debug, Clone, Copy)]
pub struct CostResolver<'a> {
    schema: &'a Schema,
    config: &'a CostConfig,
}

impl<'a> CostResolver<'a> {
    pub fn new(schema: &'a Schema, config: &'a CostConfig) -> Self {
        Self { schema, config }
    }

    /// Resolve the rule for `field_name` selected on `declaring_type`.
    ///
    /// `field` is the field's definition when the declaring type is known and
    /// declares it; meta fields like `__typename` have none.
    pub fn resolve(
        &self,
        declaring_type: Option<&str>,
        field_name: &str,
        field: Option<&'a FieldDef>,
    ) -> Resolution<'a> {
        if let Some(rule) = declaring_type.and_then(|t| self.config.cost_map.get(t, field_name)) {
            return Resolution::Rule {
                rule: Cow::Borrowed(rule),
                source: RuleSource::CostMap,
            };
        }

        if !self.config.exclusive_cost_map {
            if let Some(annotation) = field.and_then(|f| f.cost.as_ref()) {
                return from_annotation(annotation, RuleSource::FieldAnnotation);
            }

            let return_type = field
                .map(|f| f.ty.named_type())
                .and_then(|name| self.schema.type_def(name));
            if let Some(annotation) = return_type.and_then(|t| t.cost.as_ref()) {
                return from_annotation(annotation, RuleSource::TypeAnnotation);
            }
        }

        Resolution::Rule {
            rule: Cow::Owned(CostRule {
                complexity: self.config.default_cost,
                use_multipliers: true,
                multiplier: None,
            }),
            source: RuleSource::Default,
        }
    }
}

fn from_annotation(annotation: &CostAnnotation, source: RuleSource) -> Resolution<'_> {
    match annotation.to_rule() {
        Some(rule) => Resolution::Rule {
            rule: Cow::Owned(rule),
            source,
        },
        None => Resolution::InvalidComplexity {
            complexity: annotation.complexity.unwrap_or_default(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlcost_core::rule::CostMap;
    use gqlcost_core::schema::{TypeDef, TypeRef};

    fn schema() -> Schema {
        Schema::new(
            "Query",
            vec![
                TypeDef::object("Query")
                    .with_field(FieldDef::new("plain", TypeRef::named("Int")))
                    .with_field(
                        FieldDef::new("annotated", TypeRef::named("Priced"))
                            .with_cost(CostAnnotation::complexity(2)),
                    )
                    .with_field(FieldDef::new("byType", TypeRef::list(TypeRef::named("Priced"))))
                    .with_field(
                        FieldDef::new("broken", TypeRef::named("Int"))
                            .with_cost(CostAnnotation::complexity(12)),
                    ),
                TypeDef::object("Priced")
                    .with_cost(CostAnnotation::complexity(3))
                    .with_field(FieldDef::new("id", TypeRef::named("ID"))),
            ],
        )
        .unwrap()
    }

    fn resolve<'a>(schema: &'a Schema, config: &'a CostConfig, field: &str) -> Resolution<'a> {
        let query = schema.type_def("Query").unwrap();
        CostResolver::new(schema, config).resolve(Some("Query"), field, query.field(field))
    }

    fn complexity(r: &Resolution<'_>) -> (u64, RuleSource) {
        match r {
            Resolution::Rule { rule, source } => (rule.complexity, *source),
            other => panic!("expected a rule, got {other:?}"),
        }
    }

    #[test]
    fn field_annotation_beats_type_annotation() {
        let schema = schema();
        let config = CostConfig::new(100);
        assert_eq!(
            complexity(&resolve(&schema, &config, "annotated")),
            (2, RuleSource::FieldAnnotation)
        );
        assert_eq!(
            complexity(&resolve(&schema, &config, "byType")),
            (3, RuleSource::TypeAnnotation)
        );
    }

    #[test]
    fn cost_map_beats_annotations() {
        let schema = schema();
        let config = CostConfig::new(100)
            .with_cost_map(CostMap::new().with("Query", "annotated", CostRule::new(9)));
        assert_eq!(complexity(&resolve(&schema, &config, "annotated")), (9, RuleSource::CostMap));
        // No entry: falls through to annotations.
        assert_eq!(
            complexity(&resolve(&schema, &config, "byType")),
            (3, RuleSource::TypeAnnotation)
        );
    }

    #[test]
    fn cost_map_complexity_is_not_range_checked() {
        let schema = schema();
        let config = CostConfig::new(100)
            .with_cost_map(CostMap::new().with("Query", "plain", CostRule::new(50)));
        assert_eq!(complexity(&resolve(&schema, &config, "plain")), (50, RuleSource::CostMap));
    }

    #[test]
    fn exclusive_cost_map_skips_annotations() {
        let schema = schema();
        let config = CostConfig::new(100).with_default_cost(4).exclusive(true);
        assert_eq!(complexity(&resolve(&schema, &config, "annotated")), (4, RuleSource::Default));
    }

    #[test]
    fn default_rule_uses_configured_cost() {
        let schema = schema();
        let config = CostConfig::new(100).with_default_cost(7);
        assert_eq!(complexity(&resolve(&schema, &config, "plain")), (7, RuleSource::Default));

        let unknown = CostResolver::new(&schema, &config).resolve(None, "__typename", None);
        assert_eq!(complexity(&unknown), (7, RuleSource::Default));
    }

    #[test]
    fn out_of_range_annotation_is_invalid() {
        let schema = schema();
        let config = CostConfig::new(100);
        assert_eq!(
            resolve(&schema, &config, "broken"),
            Resolution::InvalidComplexity {
                complexity: 12,
                source: RuleSource::FieldAnnotation
            }
        );
    }
}
