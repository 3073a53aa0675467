//! Built-in optimization rules
//!
//! Each rule is evaluated independently against the same ledger snapshot.

use crate::catalog::{ids, ESSENTIAL_IDS, HEALTH_IDS};
use crate::config::OptimizationConfig;
use crate::error::Result;
use crate::models::{round_cents, AllocationType, CategoryType, Priority};

use super::engine::{OptimizationContext, OptimizationRule};
use super::types::Suggestion;

/// Suggest adding any essential category missing from the active allocations
pub struct EssentialCoverageRule;

impl OptimizationRule for EssentialCoverageRule {
    fn id(&self) -> &'static str {
        "essential_coverage"
    }

    fn name(&self) -> &'static str {
        "Essential Coverage"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        let mut suggestions = Vec::new();

        for id in ESSENTIAL_IDS {
            if ctx.has_active(id) {
                continue;
            }
            let Some(category) = ctx.category(id) else {
                continue;
            };
            let amount = round_cents(ctx.income_share(category));
            suggestions.push(Suggestion::add(
                category,
                amount,
                format!(
                    "{} is an essential expense missing from your budget",
                    category.name
                ),
                self.id(),
            ));
        }

        Ok(suggestions)
    }
}

/// Raise savings items when the overall savings rate is below target
pub struct SavingsRateRule;

impl OptimizationRule for SavingsRateRule {
    fn id(&self) -> &'static str {
        "savings_rate"
    }

    fn name(&self) -> &'static str {
        "Savings Rate"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        let cfg = ctx.config;
        let target = ctx.income * cfg.target_savings_rate;
        let savings_total = ctx.savings_total();
        if savings_total >= target {
            return Ok(vec![]);
        }

        let rate = savings_total / ctx.income * 100.0;
        let suggestions = ctx
            .active()
            .filter(|a| a.allocation_type == AllocationType::Savings)
            .filter_map(|a| {
                let raised = round_cents((a.allocated_amount * cfg.savings_increase_factor).min(target));
                (raised > a.allocated_amount + 0.005).then(|| {
                    Suggestion::increase(
                        a,
                        raised,
                        format!(
                            "You are saving {:.1}% of income; aim for {:.0}%",
                            rate,
                            cfg.target_savings_rate * 100.0
                        ),
                        self.id(),
                    )
                })
            })
            .collect();

        Ok(suggestions)
    }
}

/// Bring housing items down when housing exceeds the warning ratio
pub struct HousingCostRule;

impl OptimizationRule for HousingCostRule {
    fn id(&self) -> &'static str {
        "housing_cost"
    }

    fn name(&self) -> &'static str {
        "Housing Cost"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        let cfg = ctx.config;
        let housing_total = ctx.total_for_type(CategoryType::Housing);
        if housing_total <= ctx.income * cfg.housing_warning_ratio {
            return Ok(vec![]);
        }

        let target = ctx.income * cfg.housing_target_ratio;
        let reason = format!(
            "Housing takes {:.1}% of income; bring it down to {:.0}%",
            housing_total / ctx.income * 100.0,
            cfg.housing_target_ratio * 100.0
        );
        let housing: Vec<_> = ctx
            .active()
            .filter(|a| a.category_type == CategoryType::Housing)
            .collect();

        let capped: Vec<Suggestion> = housing
            .iter()
            .filter(|a| a.allocated_amount > target)
            .map(|a| Suggestion::decrease(a, round_cents(target), reason.clone(), self.id()))
            .collect();
        if !capped.is_empty() {
            return Ok(capped);
        }

        // No single line is over the target, so scale them all down together
        let factor = target / housing_total;
        Ok(housing
            .iter()
            .filter(|a| a.allocated_amount > 0.0)
            .map(|a| {
                Suggestion::decrease(
                    a,
                    round_cents(a.allocated_amount * factor),
                    reason.clone(),
                    self.id(),
                )
            })
            .collect())
    }
}

/// Suggest retirement savings once income passes the threshold
pub struct RetirementRule;

impl OptimizationRule for RetirementRule {
    fn id(&self) -> &'static str {
        "retirement"
    }

    fn name(&self) -> &'static str {
        "Retirement Savings"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        if ctx.income < ctx.config.retirement_income_threshold || ctx.has_active(ids::RETIREMENT) {
            return Ok(vec![]);
        }
        let Some(category) = ctx.category(ids::RETIREMENT) else {
            return Ok(vec![]);
        };

        Ok(vec![Suggestion::add(
            category,
            round_cents(ctx.income_share(category)),
            "Your income supports regular retirement contributions",
            self.id(),
        )])
    }
}

/// Suggest a health budget when no health category is active
pub struct HealthCoverageRule;

impl OptimizationRule for HealthCoverageRule {
    fn id(&self) -> &'static str {
        "health_coverage"
    }

    fn name(&self) -> &'static str {
        "Health Coverage"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        let covered = ctx.active().any(|a| {
            a.category_type == CategoryType::Health || HEALTH_IDS.contains(&a.category_id.as_str())
        });
        if covered {
            return Ok(vec![]);
        }
        let Some(category) = ctx.category(ids::HEALTHCARE) else {
            return Ok(vec![]);
        };

        Ok(vec![Suggestion::add(
            category,
            round_cents(ctx.income * ctx.config.health_share),
            "Set aside money for medical costs",
            self.id(),
        )])
    }
}

/// Suggest a quality-of-life category once income passes its threshold
pub struct LifestyleRule {
    id: &'static str,
    category_id: &'static str,
    threshold: fn(&OptimizationConfig) -> f64,
    reason: &'static str,
}

impl LifestyleRule {
    pub fn entertainment() -> Self {
        Self {
            id: "lifestyle_entertainment",
            category_id: ids::ENTERTAINMENT,
            threshold: |cfg| cfg.entertainment_income_threshold,
            reason: "A small entertainment budget makes the plan easier to stick to",
        }
    }

    pub fn gifts() -> Self {
        Self {
            id: "lifestyle_gifts",
            category_id: ids::GIFTS,
            threshold: |cfg| cfg.gifts_income_threshold,
            reason: "Plan ahead for gifts and donations",
        }
    }

    pub fn personal_development() -> Self {
        Self {
            id: "lifestyle_personal_development",
            category_id: ids::PERSONAL_DEVELOPMENT,
            threshold: |cfg| cfg.personal_development_income_threshold,
            reason: "Invest in courses, books and skills",
        }
    }

    pub fn vacation() -> Self {
        Self {
            id: "lifestyle_vacation",
            category_id: ids::VACATION,
            threshold: |cfg| cfg.vacation_income_threshold,
            reason: "Your income leaves room to save for time off",
        }
    }
}

impl OptimizationRule for LifestyleRule {
    fn id(&self) -> &'static str {
        self.id
    }

    fn name(&self) -> &'static str {
        "Lifestyle"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        if ctx.income < (self.threshold)(ctx.config) || ctx.has_active(self.category_id) {
            return Ok(vec![]);
        }
        let Some(category) = ctx.category(self.category_id) else {
            return Ok(vec![]);
        };

        Ok(vec![Suggestion::add(
            category,
            round_cents(ctx.income_share(category)),
            self.reason,
            self.id(),
        )])
    }
}

/// Suggest removing active allocations with nothing allocated or spent
pub struct EmptyAllocationRule;

impl OptimizationRule for EmptyAllocationRule {
    fn id(&self) -> &'static str {
        "empty_allocation"
    }

    fn name(&self) -> &'static str {
        "Empty Allocation"
    }

    fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<Vec<Suggestion>> {
        let suggestions = ctx
            .active()
            .filter(|a| {
                a.priority != Priority::Essential
                    && a.allocated_amount <= 0.0
                    && a.spent_amount <= 0.0
            })
            .map(|a| {
                Suggestion::remove(
                    a,
                    format!("{} has no money allocated or spent", a.name),
                    self.id(),
                )
            })
            .collect();

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryCatalog;
    use crate::models::Allocation;
    use crate::optimize::types::{PriorityClass, SuggestionKind};

    fn allocation(catalog: &CategoryCatalog, id: &str, amount: f64) -> Allocation {
        Allocation::from_category(catalog.get(id).unwrap(), amount)
    }

    fn evaluate(
        rule: &dyn OptimizationRule,
        allocations: &[Allocation],
        income: f64,
    ) -> Vec<Suggestion> {
        let catalog = CategoryCatalog::builtin().unwrap();
        let config = OptimizationConfig::default();
        let ctx = OptimizationContext::new(allocations, income, &catalog, &config);
        rule.evaluate(&ctx).unwrap()
    }

    #[test]
    fn test_essential_coverage_adds_missing() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![
            allocation(&catalog, ids::HOUSING, 1_200.0),
            allocation(&catalog, ids::GROCERIES, 400.0),
        ];

        let suggestions = evaluate(&EssentialCoverageRule, &allocations, 4_000.0);
        let targets: Vec<&str> = suggestions.iter().map(|s| s.category_id()).collect();

        assert_eq!(
            targets,
            vec![ids::UTILITIES, ids::TRANSPORTATION, ids::EMERGENCY_SAVINGS]
        );
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Add));
        assert!(suggestions
            .iter()
            .all(|s| s.priority_class == PriorityClass::EssentialAdd));
        // utilities: 5% of 4000
        assert_eq!(suggestions[0].amount, 200.0);
    }

    #[test]
    fn test_inactive_essential_counts_as_missing() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let mut housing = allocation(&catalog, ids::HOUSING, 1_200.0);
        housing.is_active = false;

        let suggestions = evaluate(&EssentialCoverageRule, &[housing], 4_000.0);
        assert!(suggestions.iter().any(|s| s.category_id() == ids::HOUSING));
    }

    #[test]
    fn test_savings_rate_increase_capped() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![
            allocation(&catalog, ids::EMERGENCY_SAVINGS, 200.0),
            allocation(&catalog, "investments", 950.0),
            allocation(&catalog, ids::GROCERIES, 500.0),
        ];

        // 1150 of 6000 is 19.2%, under the 20% target of 1200
        let suggestions = evaluate(&SavingsRateRule, &allocations, 6_000.0);
        assert_eq!(suggestions.len(), 2);

        assert_eq!(suggestions[0].category_id(), ids::EMERGENCY_SAVINGS);
        assert_eq!(suggestions[0].amount, 240.0);
        assert_eq!(suggestions[0].kind, SuggestionKind::Increase);
        assert_eq!(suggestions[0].priority_class, PriorityClass::Savings);

        // 950 * 1.2 = 1140, within the 1200 cap
        assert_eq!(suggestions[1].amount, 1_140.0);
    }

    #[test]
    fn test_savings_rate_met_produces_nothing() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![allocation(&catalog, ids::RETIREMENT, 1_000.0)];
        assert!(evaluate(&SavingsRateRule, &allocations, 5_000.0).is_empty());
    }

    #[test]
    fn test_housing_over_limit_decreases() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![
            allocation(&catalog, ids::HOUSING, 2_000.0),
            allocation(&catalog, ids::HOME_MAINTENANCE, 100.0),
        ];

        // 2100 of 5000 is 42%
        let suggestions = evaluate(&HousingCostRule, &allocations, 5_000.0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Decrease);
        assert_eq!(suggestions[0].category_id(), ids::HOUSING);
        assert_eq!(suggestions[0].amount, 1_500.0);
        assert_eq!(suggestions[0].priority_class, PriorityClass::ExcessDecrease);
    }

    #[test]
    fn test_housing_combined_overage_scales_all_lines() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![
            allocation(&catalog, ids::HOUSING, 1_400.0),
            allocation(&catalog, ids::HOME_MAINTENANCE, 400.0),
        ];

        // 1800 of 5000 is 36%, but neither line is above the 1500 target
        let suggestions = evaluate(&HousingCostRule, &allocations, 5_000.0);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Decrease));
        assert_eq!(suggestions[0].category_id(), ids::HOUSING);
        assert_eq!(suggestions[0].amount, 1_166.67);
        assert_eq!(suggestions[1].category_id(), ids::HOME_MAINTENANCE);
        assert_eq!(suggestions[1].amount, 333.33);

        let total: f64 = suggestions.iter().map(|s| s.amount).sum();
        assert!((total - 1_500.0).abs() < 0.02);
        assert!(suggestions[0].reason.contains("30%"));
    }

    #[test]
    fn test_housing_within_limit() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![allocation(&catalog, ids::HOUSING, 1_750.0)];
        // Exactly 35% is not over the limit
        assert!(evaluate(&HousingCostRule, &allocations, 5_000.0).is_empty());
    }

    #[test]
    fn test_retirement_threshold() {
        assert!(evaluate(&RetirementRule, &[], 3_999.0).is_empty());

        let suggestions = evaluate(&RetirementRule, &[], 4_000.0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category_id(), ids::RETIREMENT);
        assert_eq!(suggestions[0].amount, 400.0);
        assert_eq!(suggestions[0].priority_class, PriorityClass::Savings);
    }

    #[test]
    fn test_health_coverage() {
        let suggestions = evaluate(&HealthCoverageRule, &[], 3_000.0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category_id(), ids::HEALTHCARE);
        assert_eq!(suggestions[0].amount, 150.0);

        let catalog = CategoryCatalog::builtin().unwrap();
        let covered = vec![allocation(&catalog, ids::HEALTHCARE, 100.0)];
        assert!(evaluate(&HealthCoverageRule, &covered, 3_000.0).is_empty());
    }

    #[test]
    fn test_health_insurance_counts_as_coverage() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let insured = vec![allocation(&catalog, ids::HEALTH_INSURANCE, 120.0)];
        assert!(evaluate(&HealthCoverageRule, &insured, 3_000.0).is_empty());

        let mut lapsed = insured;
        lapsed[0].is_active = false;
        assert_eq!(evaluate(&HealthCoverageRule, &lapsed, 3_000.0).len(), 1);
    }

    #[test]
    fn test_lifestyle_thresholds() {
        assert!(evaluate(&LifestyleRule::vacation(), &[], 4_999.0).is_empty());
        assert_eq!(evaluate(&LifestyleRule::vacation(), &[], 5_000.0).len(), 1);

        assert!(evaluate(&LifestyleRule::gifts(), &[], 2_499.0).is_empty());
        let gifts = evaluate(&LifestyleRule::gifts(), &[], 2_500.0);
        assert_eq!(gifts[0].amount, 50.0);
        assert_eq!(gifts[0].priority_class, PriorityClass::Other);

        assert!(evaluate(&LifestyleRule::entertainment(), &[], 3_499.0).is_empty());
        assert!(evaluate(&LifestyleRule::personal_development(), &[], 3_999.0).is_empty());
    }

    #[test]
    fn test_empty_allocation_removal() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let allocations = vec![
            allocation(&catalog, ids::GIFTS, 0.0),
            allocation(&catalog, ids::GROCERIES, 0.0),
            allocation(&catalog, ids::ENTERTAINMENT, 50.0),
        ];

        let suggestions = evaluate(&EmptyAllocationRule, &allocations, 3_000.0);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category_id(), ids::GIFTS);
        assert_eq!(suggestions[0].priority_class, PriorityClass::Remove);
    }

    #[test]
    fn test_missing_catalog_entries_are_skipped() {
        let catalog = CategoryCatalog::new(vec![]).unwrap();
        let config = OptimizationConfig::default();
        let ctx = OptimizationContext::new(&[], 6_000.0, &catalog, &config);

        assert!(EssentialCoverageRule.evaluate(&ctx).unwrap().is_empty());
        assert!(RetirementRule.evaluate(&ctx).unwrap().is_empty());
        assert!(LifestyleRule::vacation().evaluate(&ctx).unwrap().is_empty());
    }
}
