//! YAML → analysis bundle.
//!
//! Example:
//! ```yaml
//! config:
//!   maximum_cost: 10000
//!   cost_map:
//!     Query: { first: { complexity: 3, multiplier: limit } }
//! schema:
//!   query_type: Query
//!   types:
//!     - name: Query
//!       fields:
//!         - name: first
//!           type: First
//!           arguments: [ { name: limit, type: Int } ]
//!           cost: { complexity: 2, multiplier: limit }
//!     - name: First
//!       cost: { complexity: 1 }
//!       fields: [ { name: string, type: String } ]
//! variables: { n: 10 }
//! document:
//!   operations:
//!     - kind: query
//!       selections:
//!         - kind: field
//!           name: first
//!           arguments: { limit: { $var: n } }
//!           selections: [ { kind: field, name: string } ]
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gqlcost_core::config::CostConfig;
use gqlcost_core::query::Document;
use gqlcost_core::rule::CostMap;
use gqlcost_core::schema::Schema;
use gqlcost_core::value::Variables;

#[derive(Debug, Error)]
pub enum DslError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid bundle: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, DslError>;

/// Config overrides carried by a bundle. Every field is optional so a bundle
/// can leave the budget to the environment or the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    pub maximum_cost: Option<u64>,
    pub default_cost: Option<u64>,
    pub starting_cost: Option<u64>,
    pub cost_map: Option<CostMap>,
    pub exclusive_cost_map: Option<bool>,
}

impl BundleConfig {
    /// Overlay the values present here onto `cfg`.
    pub fn apply_to(&self, cfg: &mut CostConfig) {
        if let Some(v) = self.maximum_cost {
            cfg.maximum_cost = v;
        }
        if let Some(v) = self.default_cost {
            cfg.default_cost = v;
        }
        if let Some(v) = self.starting_cost {
            cfg.starting_cost = v;
        }
        if let Some(map) = &self.cost_map {
            cfg.cost_map = map.clone();
        }
        if let Some(v) = self.exclusive_cost_map {
            cfg.exclusive_cost_map = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bundle {
    #[serde(default)]
    pub config: BundleConfig,
    pub schema: Schema,
    #[serde(default)]
    pub variables: Variables,
    pub document: Document,
}

/// Parse a YAML bundle. Schema root checks run during deserialization.
pub fn parse_bundle(yaml_src: &str) -> Result<Bundle> {
    let bundle: Bundle = serde_yaml::from_str(yaml_src)?;
    if bundle.document.operations.is_empty() {
        return Err(DslError::Invalid("document has no operations".into()));
    }
    Ok(bundle)
}

/// Parse a JSON object of variables (as sent alongside a GraphQL request).
pub fn parse_variables_json(json_src: &str) -> Result<Variables> {
    Ok(serde_json::from_str(json_src)?)
}
