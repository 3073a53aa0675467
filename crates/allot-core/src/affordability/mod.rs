//! Affordability Calculator
//!
//! Computes the recommended amount for a single category given monthly
//! income and the existing debt load. Each category resolves to a
//! [`FormulaKind`] tag; the calculator dispatches through a registry of
//! [`AffordabilityFormula`] strategies keyed by that tag, so new category
//! kinds can be added by registering a strategy.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use allot_core::{AffordabilityCalculator, BudgetConfig, CategoryCatalog};
//!
//! let catalog = CategoryCatalog::builtin()?;
//! let calculator = AffordabilityCalculator::new(BudgetConfig::default());
//! let home = catalog.require("home")?;
//! let price = calculator.calculate_affordable_amount(&catalog, home, 8_000.0, 0.1)?;
//! ```
//!
//! All calculations are pure: no hidden state, and degenerate inputs
//! (zero income, a DTI that leaves no headroom) normalize to 0 rather than
//! NaN or infinity.

pub mod formulas;

use std::collections::HashMap;

use crate::catalog::CategoryCatalog;
use crate::config::BudgetConfig;
use crate::error::{Error, Result};
use crate::models::{round_tenth, Allocation, Category, CategoryType, FormulaKind};

pub use formulas::{
    amortized_principal, mortgage_price_from_payment, AnnualFormula, AutoLoanFormula,
    DebtPaymentFormula, HomeMaintenanceFormula, MonthlyFormula, MortgageFormula,
    SavingsGoalFormula,
};

/// Assumption titles read by the built-in formulas
pub mod assumptions {
    pub const DOWN_PAYMENT: &str = "Down Payment";
    pub const INTEREST_RATE: &str = "Interest Rate";
    pub const PROPERTY_TAX: &str = "Property Tax";
    pub const SAVINGS_GOAL: &str = "Savings Goal";
    pub const TIMELINE: &str = "Timeline";
    pub const DEBT_AMOUNT: &str = "Debt Amount";
}

/// Inputs shared by every formula for one calculation
pub struct AffordabilityContext<'a> {
    /// Monthly income (already sanitized, never negative)
    pub income: f64,
    /// Existing debt payments as a fraction of income
    pub debt_to_income_ratio: f64,
    pub catalog: &'a CategoryCatalog,
    pub config: &'a BudgetConfig,
    /// Calculator running this context, for formulas derived from other categories
    pub calculator: &'a AffordabilityCalculator,
}

impl AffordabilityContext<'_> {
    /// The category's nominal monthly share of income
    pub fn monthly_share(&self, category: &Category) -> f64 {
        self.income * category.allocation_percentage
    }
}

/// A strategy computing one kind of affordability figure
pub trait AffordabilityFormula: Send + Sync {
    /// Formula tag this strategy handles
    fn kind(&self) -> FormulaKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Unrounded amount; the calculator sanitizes and rounds the result
    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64>;
}

/// Registry-backed affordability calculator
pub struct AffordabilityCalculator {
    config: BudgetConfig,
    formulas: HashMap<FormulaKind, Box<dyn AffordabilityFormula>>,
}

impl Default for AffordabilityCalculator {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}

impl AffordabilityCalculator {
    /// Create a calculator with the built-in formulas registered
    pub fn new(config: BudgetConfig) -> Self {
        let mut calculator = Self {
            config,
            formulas: HashMap::new(),
        };

        calculator.register(Box::new(MonthlyFormula));
        calculator.register(Box::new(MortgageFormula));
        calculator.register(Box::new(AutoLoanFormula));
        calculator.register(Box::new(SavingsGoalFormula));
        calculator.register(Box::new(DebtPaymentFormula));
        calculator.register(Box::new(AnnualFormula));
        calculator.register(Box::new(HomeMaintenanceFormula));

        calculator
    }

    /// Register a formula, replacing any existing one for the same tag
    pub fn register(&mut self, formula: Box<dyn AffordabilityFormula>) {
        self.formulas.insert(formula.kind(), formula);
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Formula tags with a registered strategy
    pub fn formula_kinds(&self) -> Vec<FormulaKind> {
        self.formulas.keys().cloned().collect()
    }

    /// Recommended amount for a category, rounded to the nearest 0.1
    pub fn calculate_affordable_amount(
        &self,
        catalog: &CategoryCatalog,
        category: &Category,
        income: f64,
        debt_to_income_ratio: f64,
    ) -> Result<f64> {
        let ctx = AffordabilityContext {
            income: sanitize(income),
            debt_to_income_ratio: sanitize(debt_to_income_ratio),
            catalog,
            config: &self.config,
            calculator: self,
        };

        let kind = category.formula();
        let formula = self.formulas.get(&kind).ok_or_else(|| {
            Error::InvalidData(format!(
                "No affordability formula registered for {} (category {})",
                kind, category.id
            ))
        })?;

        let amount = formula.calculate(category, &ctx)?;
        tracing::debug!(
            category = category.id.as_str(),
            formula = formula.name(),
            amount,
            "Calculated affordable amount"
        );

        Ok(round_tenth(sanitize(amount)))
    }

    /// Look up a category by id and compute its amount from the peer debt total
    pub fn affordable_amount_for(
        &self,
        catalog: &CategoryCatalog,
        category_id: &str,
        income: f64,
        peer_debt_total: f64,
    ) -> Result<f64> {
        let category = catalog.require(category_id)?;
        let dti = debt_to_income_ratio(peer_debt_total, income);
        self.calculate_affordable_amount(catalog, category, income, dti)
    }
}

/// Debt payments as a fraction of monthly income; 0 when income is not positive
pub fn debt_to_income_ratio(peer_debt_total: f64, income: f64) -> f64 {
    if !income.is_finite() || income <= 0.0 {
        return 0.0;
    }
    sanitize(peer_debt_total) / income
}

/// Sum of active debt allocations other than `excluding`
pub fn peer_debt_total<'a>(
    allocations: impl IntoIterator<Item = &'a Allocation>,
    excluding: &str,
) -> f64 {
    allocations
        .into_iter()
        .filter(|a| {
            a.is_active && a.category_type == CategoryType::Debt && a.category_id != excluding
        })
        .map(|a| a.allocated_amount)
        .sum()
}

/// Map NaN, infinities and negatives to 0
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
