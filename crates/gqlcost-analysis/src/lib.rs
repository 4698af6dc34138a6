#![forbid(unsafe_code)]
//! gqlcost-analysis: static cost estimation for a type-checked query document.
//!
//! Pieces:
//! - `resolver`: picks the cost rule for a field occurrence
//!   (cost map → field annotation → return-type annotation → default).
//! - `arguments`: resolves a rule's multiplier argument (variables, defaults,
//!   dotted paths, list lengths).
//! - `accumulator`: running total + multiplier stack, with a scope guard that
//!   pops on drop so pushes and pops always pair up.
//! - `traversal`: the depth-first walk (`CostAnalysis::analyze`).
//! - `budget`: the single end-of-walk budget check.
//! - `sink`: where failures go.
//!
//! No I/O and no shared mutable state: each `analyze` call owns its accumulator.

pub mod accumulator;
pub mod arguments;
pub mod budget;
pub mod metrics;
pub mod report;
pub mod resolver;
pub mod sink;
pub mod traversal;

pub use accumulator::{CostAccumulator, FieldScope};
pub use arguments::{resolve_multiplier, MultiplierValue};
pub use budget::check_budget;
pub use report::{CostReport, FieldCost, OperationCost};
pub use resolver::{CostResolver, Resolution, RuleSource};
pub use sink::{FailureSink, FnSink, IgnoreFailures};
pub use traversal::CostAnalysis;
