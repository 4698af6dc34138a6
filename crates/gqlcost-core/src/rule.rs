//! Cost rules: authored annotations, the normalized rule the engine applies,
//! and the caller-supplied override map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Inclusive range an authored `complexity` must fall in.
pub const COMPLEXITY_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// A `@cost(complexity:, multiplier:, useMultipliers:)` directive as written
/// on a field or type definition. Values are kept raw so the resolver can
/// reject out-of-range complexities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_multipliers: Option<bool>,
}

impl CostAnnotation {
    pub fn complexity(complexity: i64) -> Self {
        Self {
            complexity: Some(complexity),
            ..Default::default()
        }
    }

    pub fn multiplier(mut self, argument: impl Into<String>) -> Self {
        self.multiplier = Some(argument.into());
        self
    }

    pub fn use_multipliers(mut self, enabled: bool) -> Self {
        self.use_multipliers = Some(enabled);
        self
    }

    /// Normalize into a rule. `None` if the authored complexity is out of range.
    pub fn to_rule(&self) -> Option<CostRule> {
        let complexity = self.complexity.unwrap_or(1);
        if !COMPLEXITY_RANGE.contains(&complexity) {
            return None;
        }
        Some(CostRule {
            complexity: complexity as u64,
            use_multipliers: self.use_multipliers.unwrap_or(true),
            multiplier: self.multiplier.clone(),
        })
    }
}

/// The rule applied to one field occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostRule {
    pub complexity: u64,
    pub use_multipliers: bool,
    /// Argument name (or dotted path into an input object) scaling the cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
}

impl CostRule {
    pub fn new(complexity: u64) -> Self {
        Self {
            complexity,
            ..Default::default()
        }
    }

    pub fn with_multiplier(mut self, argument: impl Into<String>) -> Self {
        self.multiplier = Some(argument.into());
        self
    }

    pub fn without_multipliers(mut self) -> Self {
        self.use_multipliers = false;
        self
    }
}

impl Default for CostRule {
    fn default() -> Self {
        Self {
            complexity: 1,
            use_multipliers: true,
            multiplier: None,
        }
    }
}

/// Overrides keyed by type name, then field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostMap(HashMap<String, HashMap<String, CostRule>>);

impl CostMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, field_name: impl Into<String>, rule: CostRule) {
        self.0
            .entry(type_name.into())
            .or_default()
            .insert(field_name.into(), rule);
    }

    pub fn with(mut self, type_name: impl Into<String>, field_name: impl Into<String>, rule: CostRule) -> Self {
        self.insert(type_name, field_name, rule);
        self
    }

    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&CostRule> {
        self.0.get(type_name)?.get(field_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(HashMap::is_empty)
    }

    /// Number of (type, field) entries.
    pub fn len(&self) -> usize {
        self.0.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_defaults() {
        let rule = CostAnnotation::default().to_rule().unwrap();
        assert_eq!(rule, CostRule::default());
    }

    #[test]
    fn annotation_range_is_inclusive() {
        assert!(CostAnnotation::complexity(1).to_rule().is_some());
        assert!(CostAnnotation::complexity(10).to_rule().is_some());
        assert!(CostAnnotation::complexity(0).to_rule().is_none());
        assert!(CostAnnotation::complexity(11).to_rule().is_none());
        assert!(CostAnnotation::complexity(-4).to_rule().is_none());
    }

    #[test]
    fn cost_map_entries_deserialize_with_defaults() {
        let map: CostMap = serde_json::from_str(
            r#"{"Query": {"first": {"complexity": 3, "multiplier": "limit"}}}"#,
        )
        .unwrap();
        let rule = map.get("Query", "first").unwrap();
        assert_eq!(rule.complexity, 3);
        assert!(rule.use_multipliers);
        assert_eq!(rule.multiplier.as_deref(), Some("limit"));
        assert!(map.get("Query", "second").is_none());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn empty_type_entries_count_as_empty() {
        let map: CostMap = serde_json::from_str(r#"{"Query": {}}"#).unwrap();
        assert!(map.is_empty());
    }
}
