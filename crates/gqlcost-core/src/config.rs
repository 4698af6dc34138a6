//! Analysis configuration that front ends can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rule::CostMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Budget threshold. A document whose total cost is strictly above this fails.
    pub maximum_cost: u64,

    /// Cost of a field with no cost-map entry and no annotation.
    #[serde(default)]
    pub default_cost: u64,

    /// Value the running total starts from.
    #[serde(default)]
    pub starting_cost: u64,

    /// Highest-precedence overrides, keyed by type then field.
    #[serde(default, skip_serializing_if = "CostMap::is_empty")]
    pub cost_map: CostMap,

    /// When set and `cost_map` is non-empty, schema annotations are ignored:
    /// fields missing from the map fall straight back to `default_cost`.
    #[serde(default)]
    pub exclusive_cost_map: bool,
}

impl CostConfig {
    pub fn new(maximum_cost: u64) -> Self {
        Self {
            maximum_cost,
            default_cost: 0,
            starting_cost: 0,
            cost_map: CostMap::default(),
            exclusive_cost_map: false,
        }
    }

    pub fn with_default_cost(mut self, default_cost: u64) -> Self {
        self.default_cost = default_cost;
        self
    }

    pub fn with_starting_cost(mut self, starting_cost: u64) -> Self {
        self.starting_cost = starting_cost;
        self
    }

    pub fn with_cost_map(mut self, cost_map: CostMap) -> Self {
        self.cost_map = cost_map;
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive_cost_map = exclusive;
        self
    }

    /// Reject configurations the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.maximum_cost == 0 {
            return Err(Error::Config("maximum_cost must be positive".into()));
        }
        Ok(())
    }

    /// Create a config from environment variables.
    ///
    /// Environment variables:
    /// - `GQLCOST_MAXIMUM_COST`: budget threshold (required)
    /// - `GQLCOST_DEFAULT_COST`: cost of unannotated fields
    /// - `GQLCOST_STARTING_COST`: initial running total
    /// - `GQLCOST_EXCLUSIVE_COST_MAP`: `true`/`false`
    pub fn from_env() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let maximum_cost = lookup("GQLCOST_MAXIMUM_COST")
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| Error::Config("GQLCOST_MAXIMUM_COST is unset or not a number".into()))?;
        let mut cfg = Self::new(maximum_cost);
        cfg.apply_env(lookup);
        Ok(cfg)
    }

    /// Overlay values from `lookup` (an environment accessor) onto `self`.
    /// Unparsable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GQLCOST_MAXIMUM_COST").and_then(|s| s.parse::<u64>().ok()) {
            self.maximum_cost = v;
        }

        if let Some(v) = lookup("GQLCOST_DEFAULT_COST").and_then(|s| s.parse::<u64>().ok()) {
            self.default_cost = v;
        }

        if let Some(v) = lookup("GQLCOST_STARTING_COST").and_then(|s| s.parse::<u64>().ok()) {
            self.starting_cost = v;
        }

        if let Some(v) = lookup("GQLCOST_EXCLUSIVE_COST_MAP").and_then(|s| s.parse::<bool>().ok()) {
            self.exclusive_cost_map = v;
        }
    }
}
