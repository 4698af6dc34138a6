#![forbid(unsafe_code)]
//! gqlcost-core: pure data shared by the cost engine and its front ends.
//!
//! Contents:
//! - `schema`: type/field definitions and their authored `@cost` annotations.
//! - `query`: the already type-checked query tree handed to the engine.
//! - `value`: resolved argument values (with variable references).
//! - `rule`: the normalized `CostRule` and the caller-supplied `CostMap`.
//! - `config`: `CostConfig` (budget, default cost, cost map).
//! - `failure`: the validation failures the engine reports.
//!
//! No I/O and no logging here.

pub mod config;
pub mod error;
pub mod failure;
pub mod prelude;
pub mod query;
pub mod rule;
pub mod schema;
pub mod value;

pub use config::CostConfig;
pub use error::{Error, Result};
pub use failure::{CostViolation, ValidationFailure};
pub use query::{Document, FieldSelection, InlineFragment, Operation, OperationKind, Selection};
pub use rule::{CostAnnotation, CostMap, CostRule};
pub use schema::{ArgumentDef, FieldDef, Schema, TypeDef, TypeKind, TypeRef};
pub use value::{Value, Variables};
