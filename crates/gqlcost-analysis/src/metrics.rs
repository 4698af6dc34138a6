//! Tracing hooks for analysis summaries.
//!
//! No telemetry stack here; the binary layer installs a subscriber.

use crate::report::CostReport;

#[cfg(feature = "tracing")]
pub fn emit_summary(report: &CostReport) {
    let span = tracing::debug_span!(
        "gqlcost",
        total_cost = report.total_cost,
        maximum_cost = report.maximum_cost
    );
    let _entered = span.enter();
    for op in &report.operations {
        tracing::trace!(kind = ?op.kind, name = op.name.as_deref().unwrap_or("<anonymous>"), cost = op.cost, "operation cost");
    }
    tracing::debug!(
        fields = report.fields_costed,
        failures = report.failures_reported,
        exceeded = report.exceeds_budget(),
        "cost analysis finished"
    );
}

#[cfg(not(feature = "tracing"))]
pub fn emit_summary(_report: &CostReport) { /* no-op */ }
