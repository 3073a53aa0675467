//! Optimization Engine - evaluates rules and ranks their suggestions

use std::collections::HashSet;

use crate::catalog::CategoryCatalog;
use crate::config::OptimizationConfig;
use crate::error::Result;
use crate::models::{Allocation, AllocationType, Category, CategoryType};

use super::rules::{
    EmptyAllocationRule, EssentialCoverageRule, HealthCoverageRule, HousingCostRule,
    LifestyleRule, RetirementRule, SavingsRateRule,
};
use super::types::Suggestion;

/// Snapshot every rule evaluates against
pub struct OptimizationContext<'a> {
    /// Current allocations, active and inactive
    pub allocations: &'a [Allocation],
    /// Monthly income (positive)
    pub income: f64,
    pub catalog: &'a CategoryCatalog,
    pub config: &'a OptimizationConfig,
}

impl<'a> OptimizationContext<'a> {
    pub fn new(
        allocations: &'a [Allocation],
        income: f64,
        catalog: &'a CategoryCatalog,
        config: &'a OptimizationConfig,
    ) -> Self {
        Self {
            allocations,
            income,
            catalog,
            config,
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &'a Allocation> + '_ {
        self.allocations.iter().filter(|a| a.is_active)
    }

    pub fn has_active(&self, category_id: &str) -> bool {
        self.active().any(|a| a.category_id == category_id)
    }

    /// Catalog lookup; logs and returns None when the catalog lacks the id
    pub fn category(&self, category_id: &str) -> Option<&'a Category> {
        let category = self.catalog.get(category_id);
        if category.is_none() {
            tracing::warn!(category = category_id, "Category missing from catalog, skipping");
        }
        category
    }

    /// The category's nominal share of income
    pub fn income_share(&self, category: &Category) -> f64 {
        self.income * category.allocation_percentage
    }

    pub fn savings_total(&self) -> f64 {
        self.active()
            .filter(|a| a.allocation_type == AllocationType::Savings)
            .map(|a| a.allocated_amount)
            .sum()
    }

    pub fn total_for_type(&self, category_type: CategoryType) -> f64 {
        self.active()
            .filter(|a| a.category_type == category_type)
            .map(|a| a.allocated_amount)
            .sum()
    }
}

/// A single independently evaluated optimization check
pub trait OptimizationRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Suggestions for this snapshot; empty when nothing applies
    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>>;
}

/// Runs the registered rules and ranks the combined suggestions
pub struct OptimizationEngine {
    rules: Vec<Box<dyn OptimizationRule>>,
    config: OptimizationConfig,
}

impl Default for OptimizationEngine {
    fn default() -> Self {
        Self::new(OptimizationConfig::default())
    }
}

impl OptimizationEngine {
    /// Create an engine with the built-in rules registered
    pub fn new(config: OptimizationConfig) -> Self {
        let mut engine = Self {
            rules: vec![],
            config,
        };

        engine.register(Box::new(EssentialCoverageRule));
        engine.register(Box::new(SavingsRateRule));
        engine.register(Box::new(HousingCostRule));
        engine.register(Box::new(RetirementRule));
        engine.register(Box::new(HealthCoverageRule));
        engine.register(Box::new(LifestyleRule::entertainment()));
        engine.register(Box::new(LifestyleRule::gifts()));
        engine.register(Box::new(LifestyleRule::personal_development()));
        engine.register(Box::new(LifestyleRule::vacation()));
        engine.register(Box::new(EmptyAllocationRule));

        engine
    }

    pub fn register(&mut self, rule: Box<dyn OptimizationRule>) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Ids of the registered rules, in evaluation order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Evaluate every rule and return at most `max_suggestions` suggestions,
    /// sorted by priority class. Only the first suggestion per category is
    /// kept. A failing rule is logged and skipped.
    pub fn generate_optimizations(
        &self,
        allocations: &[Allocation],
        income: f64,
        catalog: &CategoryCatalog,
    ) -> Vec<Suggestion> {
        if !income.is_finite() || income <= 0.0 {
            return vec![];
        }

        let ctx = OptimizationContext::new(allocations, income, catalog, &self.config);
        let mut suggestions = vec![];

        for rule in &self.rules {
            match rule.evaluate(&ctx) {
                Ok(found) => {
                    tracing::debug!(rule = rule.id(), count = found.len(), "Rule evaluated");
                    suggestions.extend(found);
                }
                Err(e) => {
                    tracing::warn!(rule = rule.id(), error = %e, "Optimization rule failed");
                }
            }
        }

        // Stable: rule registration order breaks ties within a class
        suggestions.sort_by_key(|s| s.priority_class);

        let mut seen = HashSet::new();
        suggestions.retain(|s| seen.insert(s.category_id().to_string()));

        let generated = suggestions.len();
        suggestions.truncate(self.config.max_suggestions);

        tracing::info!(
            generated,
            returned = suggestions.len(),
            "Generated optimizations"
        );
        suggestions
    }
}
