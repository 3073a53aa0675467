//! Smart budget generation
//!
//! Builds a complete proportional budget from monthly income and the
//! catalog:
//! 1. Reserve the surplus fraction of income
//! 2. Compute each category's base amount from its allocation rule
//! 3. Fund the essential tier in full
//! 4. Scale the important tier, then the discretionary tier, to fit what
//!    remains
//!
//! Essential amounts are never scaled down. If essentials alone exceed the
//! available income, the other tiers receive nothing and the plan reports
//! the shortfall instead of reducing essentials.

use serde::{Deserialize, Serialize};

use crate::catalog::CategoryCatalog;
use crate::config::AllocationConfig;
use crate::models::{Allocation, AllocationRule, Category, Priority};

/// A generated budget with the figures used to scale it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartBudget {
    pub income: f64,
    /// Income after reserving the surplus
    pub available_income: f64,
    pub reserved_surplus: f64,
    pub essential_total: f64,
    /// Factor applied to the important tier (0..=1)
    pub important_scale: f64,
    /// Factor applied to the discretionary tier (0..=1)
    pub discretionary_scale: f64,
    pub allocations: Vec<Allocation>,
}

impl SmartBudget {
    pub fn total_allocated(&self) -> f64 {
        self.allocations.iter().map(|a| a.allocated_amount).sum()
    }

    /// Amount by which essentials alone exceed the available income
    pub fn essential_shortfall(&self) -> f64 {
        (self.essential_total - self.available_income).max(0.0)
    }
}

/// Generates proportional budgets from the catalog
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    config: AllocationConfig,
}

impl AllocationEngine {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Unscaled amount for one category
    pub fn base_allocation(&self, category: &Category, income: f64) -> f64 {
        let cfg = &self.config;
        let proportional = income * category.allocation_percentage;

        match category.allocation_rule() {
            AllocationRule::Proportional => proportional,
            AllocationRule::Housing => proportional.min(income * cfg.max_housing_ratio),
            AllocationRule::Debt => 0.0,
            // Ceiling wins when the floor exceeds it at very low incomes
            AllocationRule::EmergencySavings => proportional
                .max(cfg.emergency_floor())
                .min(income * cfg.emergency_ceiling_ratio),
            AllocationRule::Retirement => {
                proportional.max(income * cfg.min_retirement_percentage)
            }
        }
    }

    /// Allocations for every category with a positive scaled amount
    pub fn generate_smart_budget(&self, income: f64, catalog: &CategoryCatalog) -> Vec<Allocation> {
        self.generate_plan(income, catalog).allocations
    }

    /// Full plan including the tier scaling factors
    pub fn generate_plan(&self, income: f64, catalog: &CategoryCatalog) -> SmartBudget {
        let income = if income.is_finite() && income > 0.0 {
            income
        } else {
            0.0
        };
        let available_income = income * (1.0 - self.config.surplus_fraction);

        let essential = self.tier(catalog, income, Priority::Essential);
        let important = self.tier(catalog, income, Priority::Important);
        let discretionary = self.tier(catalog, income, Priority::Discretionary);

        let essential_total: f64 = essential.iter().map(|(_, amount)| amount).sum();
        let mut remaining = available_income - essential_total;

        let important_sum: f64 = important.iter().map(|(_, amount)| amount).sum();
        let important_scale = scale_factor(remaining, important_sum);
        remaining -= important_sum * important_scale;

        let discretionary_sum: f64 = discretionary.iter().map(|(_, amount)| amount).sum();
        let discretionary_scale = scale_factor(remaining, discretionary_sum);

        tracing::debug!(
            income,
            available_income,
            essential_total,
            important_scale,
            discretionary_scale,
            "Scaled budget tiers"
        );
        if essential_total > available_income {
            tracing::warn!(
                essential_total,
                available_income,
                "Essential categories exceed available income"
            );
        }

        let allocations = essential
            .into_iter()
            .chain(important.into_iter().map(|(c, amount)| (c, amount * important_scale)))
            .chain(
                discretionary
                    .into_iter()
                    .map(|(c, amount)| (c, amount * discretionary_scale)),
            )
            .filter(|(_, amount)| *amount > 0.0)
            .map(|(c, amount)| Allocation::from_category(c, amount))
            .collect();

        SmartBudget {
            income,
            available_income,
            reserved_surplus: income - available_income,
            essential_total,
            important_scale,
            discretionary_scale,
            allocations,
        }
    }

    /// Members of one tier with their base amounts, in allocation order
    fn tier<'c>(
        &self,
        catalog: &'c CategoryCatalog,
        income: f64,
        priority: Priority,
    ) -> Vec<(&'c Category, f64)> {
        let mut members: Vec<(&Category, f64)> = catalog
            .iter()
            .filter(|c| c.priority() == priority)
            .map(|c| (c, self.base_allocation(c, income)))
            .collect();
        members.sort_by_key(|(c, _)| c.category_type.allocation_order());
        members
    }
}

/// Remaining income below this is treated as fully spent
const EXHAUSTED: f64 = 1e-6;

/// min(1, remaining / sum), never negative
fn scale_factor(remaining: f64, sum: f64) -> f64 {
    if sum <= 0.0 || remaining <= EXHAUSTED {
        return 0.0;
    }
    (remaining / sum).min(1.0)
}
