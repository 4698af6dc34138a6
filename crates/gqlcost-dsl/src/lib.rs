#![forbid(unsafe_code)]
//! gqlcost-dsl: YAML front end for cost analysis.
//!
//! A bundle carries everything one analysis needs: the schema (with `@cost`
//! annotations), optional config and cost map, variables, and the query tree
//! as produced by an upstream parser/type-checker. No GraphQL text parsing.

pub mod yaml;

pub use yaml::{parse_bundle, parse_variables_json, Bundle, BundleConfig, DslError, Result};
