//! Validation failures reported by the engine.
//!
//! These are not `Err` values: the engine hands each one to the host's
//! failure sink and keeps going.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostViolation {
    /// An authored `@cost` complexity outside 1..=10.
    #[error("The complexity argument must be between 1 and 10")]
    InvalidComplexity { complexity: i64 },

    #[error("The query exceeds the maximum cost of {maximum}. Actual cost is {actual}")]
    BudgetExceeded { maximum: u64, actual: u64 },
}

/// One detected violation, with the response path of the offending node
/// (empty for document-level failures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub violation: CostViolation,
    #[serde(default)]
    pub path: Vec<String>,
}

impl ValidationFailure {
    pub fn new(violation: CostViolation, path: Vec<String>) -> Self {
        Self { violation, path }
    }

    pub fn message(&self) -> String {
        self.violation.to_string()
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.violation)
        } else {
            write!(f, "{} (at {})", self.violation, self.path.join("."))
        }
    }
}
