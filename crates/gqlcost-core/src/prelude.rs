//! Convenient re-exports for downstream crates.

pub use crate::config::CostConfig;
pub use crate::error::{Error, Result};
pub use crate::failure::{CostViolation, ValidationFailure};
pub use crate::query::{Document, FieldSelection, InlineFragment, Operation, OperationKind, Selection};
pub use crate::rule::{CostAnnotation, CostMap, CostRule};
pub use crate::schema::{ArgumentDef, FieldDef, Schema, TypeDef, TypeKind, TypeRef};
pub use crate::value::{Value, Variables};
