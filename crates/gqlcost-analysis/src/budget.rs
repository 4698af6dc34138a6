//! Budget enforcement: one comparison, run once after the walk.

use gqlcost_core::failure::{CostViolation, ValidationFailure};

/// A failure if `total_cost` is strictly above `maximum_cost`.
pub fn check_budget(total_cost: u64, maximum_cost: u64) -> Option<ValidationFailure> {
    (total_cost > maximum_cost).then(|| {
        ValidationFailure::new(
            CostViolation::BudgetExceeded {
                maximum: maximum_cost,
                actual: total_cost,
            },
            Vec::new(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_to_budget_passes() {
        assert!(check_budget(100, 100).is_none());
        assert!(check_budget(0, 1).is_none());
    }

    #[test]
    fn over_budget_reports_exact_numbers() {
        let failure = check_budget(6520, 1000).unwrap();
        assert!(failure.path.is_empty());
        assert_eq!(
            failure.message(),
            "The query exceeds the maximum cost of 1000. Actual cost is 6520"
        );
    }
}
