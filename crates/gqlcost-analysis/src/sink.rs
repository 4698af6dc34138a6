//! The host's failure collector.
//!
//! The engine never returns budget or complexity problems as errors; it hands
//! each `ValidationFailure` to a sink and carries on.

use gqlcost_core::failure::ValidationFailure;

pub trait FailureSink {
    fn report(&mut self, failure: ValidationFailure);
}

impl FailureSink for Vec<ValidationFailure> {
    fn report(&mut self, failure: ValidationFailure) {
        self.push(failure);
    }
}

impl<S: FailureSink + ?Sized> FailureSink for &mut S {
    fn report(&mut self, failure: ValidationFailure) {
        (**self).report(failure);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> FailureSink for FnSink<F>
where
    F: FnMut(ValidationFailure),
{
    fn report(&mut self, failure: ValidationFailure) {
        (self.0)(failure);
    }
}

/// Drops every failure. For callers that only want the report.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreFailures;

impl FailureSink for IgnoreFailures {
    fn report(&mut self, _failure: ValidationFailure) {}
}
