//! Per-analysis traversal state: running total, multiplier stack, response path.
//!
//! Descending into a field goes through `enter`, which returns a `FieldScope`
//! guard. Dropping the guard pops exactly what `enter` pushed, so siblings
//! never see a previous sibling's multiplier, even on early return.

use std::ops::{Deref, DerefMut};

use crate::report::FieldCost;

#[derive(Debug, Default)]
pub struct CostAccumulator {
    total: u64,
    multipliers: Vec<u64>,
    path: Vec<String>,
    last_multipliers: Vec<u64>,
    fields_costed: usize,
    fields: Option<Vec<FieldCost>>,
}

impl CostAccumulator {
    pub fn new(starting_cost: u64) -> Self {
        Self {
            total: starting_cost,
            ..Default::default()
        }
    }

    /// Keep a `FieldCost` entry for every costed field.
    pub fn recording(mut self) -> Self {
        self.fields = Some(Vec::new());
        self
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Multipliers in effect along the current root-to-node path.
    pub fn multipliers(&self) -> &[u64] {
        &self.multipliers
    }

    /// Multipliers in effect for the most recently costed field.
    pub fn last_multipliers(&self) -> &[u64] {
        &self.last_multipliers
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn fields_costed(&self) -> usize {
        self.fields_costed
    }

    /// Product of the stack; 1 when empty. Saturates instead of wrapping.
    pub fn path_factor(&self) -> u64 {
        self.multipliers
            .iter()
            .fold(1u64, |acc, &m| acc.saturating_mul(m))
    }

    /// Add one field's contribution to the running total.
    pub fn add(&mut self, contribution: u64) {
        self.total = self.total.saturating_add(contribution);
        self.fields_costed += 1;
    }

    pub fn record(&mut self, entry: FieldCost) {
        if let Some(fields) = self.fields.as_mut() {
            fields.push(entry);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.fields.is_some()
    }

    /// Push `segment` (and `multiplier`, if any) for the duration of the scope.
    pub fn enter(&mut self, segment: &str, multiplier: Option<u64>) -> FieldScope<'_> {
        self.path.push(segment.to_string());
        if let Some(m) = multiplier {
            self.multipliers.push(m);
        }
        self.last_multipliers.clone_from(&self.multipliers);
        FieldScope {
            acc: self,
            pushed: multiplier.is_some(),
        }
    }

    /// Consume the accumulator, returning the per-field entries (if recording)
    /// and the stack as left by the walk.
    pub fn finish(self) -> Finished {
        Finished {
            total: self.total,
            fields_costed: self.fields_costed,
            last_multipliers: self.last_multipliers,
            final_stack: self.multipliers,
            fields: self.fields.unwrap_or_default(),
        }
    }
}

/// Terminal state of an accumulator.
#[derive(Debug)]
pub struct Finished {
    pub total: u64,
    pub fields_costed: usize,
    pub last_multipliers: Vec<u64>,
    pub final_stack: Vec<u64>,
    pub fields: Vec<FieldCost>,
}

/// RAII guard over a field's path segment and optional multiplier.
pub struct FieldScope<'a> {
    acc: &'a mut CostAccumulator,
    pushed: bool,
}

impl Deref for FieldScope<'_> {
    type Target = CostAccumulator;

    fn deref(&self) -> &CostAccumulator {
        &*self.acc
    }
}

impl DerefMut for FieldScope<'_> {
    fn deref_mut(&mut self) -> &mut CostAccumulator {
        &mut *self.acc
    }
}

impl Drop for FieldScope<'_> {
    fn drop(&mut self) {
        if self.pushed {
            self.acc.multipliers.pop();
            self.pushed = false;
        }
        self.acc.path.pop();
    }
}
