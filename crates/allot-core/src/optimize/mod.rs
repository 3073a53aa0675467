//! Optimization Engine - Budget Corrections
//!
//! Evaluates a fixed list of independent rules against the current
//! allocations and income, and proposes corrections: add a missing
//! category, raise savings, trim excess housing, or drop an unused line.
//!
//! ## Ranking
//!
//! Suggestions are stably sorted by [`PriorityClass`] and truncated to the
//! configured maximum (5 by default):
//!
//! 1. essential add
//! 2. savings related
//! 3. decrease excess
//! 4. other add or increase
//! 5. remove
//!
//! ## Usage
//!
//! ```rust,ignore
//! use allot_core::optimize::{apply_optimizations, OptimizationEngine};
//!
//! let engine = OptimizationEngine::default();
//! let suggestions = engine.generate_optimizations(&allocations, income, &catalog);
//! let updated = apply_optimizations(allocations, &suggestions);
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{OptimizationContext, OptimizationEngine, OptimizationRule};
pub use rules::{
    EmptyAllocationRule, EssentialCoverageRule, HealthCoverageRule, HousingCostRule,
    LifestyleRule, RetirementRule, SavingsRateRule,
};
pub use types::{PriorityClass, Suggestion, SuggestionKind, SuggestionTarget};

use crate::ledger::BudgetLedger;
use crate::models::Allocation;

/// Apply the selected suggestions to a list of allocations and return the
/// result in the original order, with added categories appended. Unselected
/// suggestions are ignored. Applying the same suggestions again changes
/// nothing.
pub fn apply_optimizations(allocations: Vec<Allocation>, selected: &[Suggestion]) -> Vec<Allocation> {
    let mut ledger = BudgetLedger::with_allocations(0.0, allocations);
    ledger.apply_optimizations(selected);
    ledger.allocations().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ids, CategoryCatalog};

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let groceries = Allocation::from_category(catalog.get(ids::GROCERIES).unwrap(), 300.0);
        let suggestion = Suggestion::increase(&groceries, 450.0, "", "test");

        let once = apply_optimizations(vec![groceries], &[suggestion.clone()]);
        let twice = apply_optimizations(once.clone(), &[suggestion]);

        assert_eq!(once[0].allocated_amount, 450.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unselected_suggestions_ignored() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let gifts = catalog.get(ids::GIFTS).unwrap();
        let suggestion = Suggestion::add(gifts, 60.0, "", "test").with_selected(false);

        assert!(apply_optimizations(vec![], &[suggestion]).is_empty());
    }

    #[test]
    fn test_apply_each_kind() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let housing = Allocation::from_category(catalog.get(ids::HOUSING).unwrap(), 2_000.0);
        let gifts = Allocation::from_category(catalog.get(ids::GIFTS).unwrap(), 0.0);

        let selected = vec![
            Suggestion::decrease(&housing, 1_500.0, "", "test"),
            Suggestion::remove(&gifts, "", "test"),
            Suggestion::add(catalog.get(ids::UTILITIES).unwrap(), 250.0, "", "test"),
        ];
        let updated = apply_optimizations(vec![housing, gifts], &selected);

        let ids: Vec<&str> = updated.iter().map(|a| a.category_id.as_str()).collect();
        assert_eq!(ids, vec!["housing", "utilities"]);
        assert_eq!(updated[0].allocated_amount, 1_500.0);
        assert_eq!(updated[1].allocated_amount, 250.0);
        assert!(updated[1].is_active);
    }
}
