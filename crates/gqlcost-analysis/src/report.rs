//! What an analysis hands back besides the reported failures.

use gqlcost_core::query::OperationKind;
use serde::{Deserialize, Serialize};

use crate::resolver::RuleSource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostReport {
    /// Final running total (includes the configured starting cost).
    pub total_cost: u64,
    pub maximum_cost: u64,
    /// Cost contributed by each operation, in document order.
    pub operations: Vec<OperationCost>,
    pub fields_costed: usize,
    /// Multiplier stack in effect for the most recently costed field,
    /// including that field's own multiplier.
    pub multipliers: Vec<u64>,
    /// Stack left over once the walk finished. Empty unless push/pop broke.
    pub final_stack: Vec<u64>,
    /// Failures handed to the sink during this analysis.
    pub failures_reported: usize,
    /// Per-field breakdown, only filled when field recording is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldCost>,
}

impl CostReport {
    pub fn exceeds_budget(&self) -> bool {
        self.total_cost > self.maximum_cost
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCost {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub cost: u64,
}

/// One costed field occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCost {
    pub path: Vec<String>,
    /// `None` when the authored complexity was rejected.
    pub source: Option<RuleSource>,
    pub complexity: u64,
    pub path_factor: u64,
    pub own_multiplier: Option<u64>,
    /// `false` when the rule opted out; the contribution is then the bare
    /// complexity.
    pub use_multipliers: bool,
    /// The multiplier argument was negative; the contribution is zero.
    #[serde(default)]
    pub negative_multiplier: bool,
    pub contribution: u64,
}
