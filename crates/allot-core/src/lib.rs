//! Allot Core Library
//!
//! Budget allocation and optimization engine:
//! - Category catalog with formula and allocation rule tags
//! - Affordability calculator (mortgage, auto loan, savings goal, debt payment)
//! - Debt payoff calculator with amortization schedules
//! - Smart budget generation with priority tier scaling
//! - Rule-based optimization suggestions
//! - Budget ledger with derived aggregates
//!
//! The engine is pure: callers pass the catalog and configuration in
//! explicitly and own all persistence.

pub mod affordability;
pub mod allocation;
pub mod catalog;
pub mod config;
pub mod debt;
pub mod error;
pub mod ledger;
pub mod models;
pub mod optimize;

pub use affordability::{
    debt_to_income_ratio, peer_debt_total, AffordabilityCalculator, AffordabilityContext,
    AffordabilityFormula,
};
pub use allocation::{AllocationEngine, SmartBudget};
pub use catalog::CategoryCatalog;
pub use config::BudgetConfig;
pub use debt::{DebtPayoffCalculator, DebtPlan, PaymentTerms, ScheduleRow};
pub use error::{Error, Result};
pub use ledger::{BudgetLedger, LedgerSnapshot, LedgerSummary, LineSummary};
pub use models::{
    Allocation, AllocationRule, AllocationType, Assumption, Category, CategoryType, DisplayType,
    FormulaKind, Priority,
};
pub use optimize::{
    apply_optimizations, OptimizationEngine, PriorityClass, Suggestion, SuggestionKind,
    SuggestionTarget,
};
