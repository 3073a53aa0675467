//! Built-in affordability formulas

use crate::catalog::ids;
use crate::config::AffordabilityConfig;
use crate::error::{Error, Result};
use crate::models::{Category, FormulaKind};

use super::assumptions::{
    DEBT_AMOUNT, DOWN_PAYMENT, INTEREST_RATE, PROPERTY_TAX, SAVINGS_GOAL, TIMELINE,
};
use super::{AffordabilityContext, AffordabilityFormula};

/// Loan principal supported by a fixed monthly payment
pub fn amortized_principal(monthly_payment: f64, annual_rate_percent: f64, months: u32) -> f64 {
    let n = months as f64;
    let r = annual_rate_percent / 100.0 / 12.0;
    if r <= 0.0 {
        return monthly_payment * n;
    }
    monthly_payment * (1.0 - (1.0 + r).powf(-n)) / r
}

/// Projected home price for a mortgage-eligible monthly payment: amortize
/// over the mortgage term, gross up by the down payment, then apply
/// compounded appreciation.
pub fn mortgage_price_from_payment(
    eligible_payment: f64,
    annual_rate_percent: f64,
    down_payment_percent: f64,
    config: &AffordabilityConfig,
) -> f64 {
    if eligible_payment <= 0.0 || down_payment_percent >= 100.0 {
        return 0.0;
    }
    let principal = amortized_principal(
        eligible_payment,
        annual_rate_percent,
        config.mortgage_term_months,
    );
    let price = principal / (1.0 - down_payment_percent.max(0.0) / 100.0);
    let growth = (1.0 + config.appreciation_rate / 100.0).powi(config.appreciation_years as i32);
    price * growth
}

/// income * allocation percentage * income tier multiplier
pub struct MonthlyFormula;

impl AffordabilityFormula for MonthlyFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::Monthly
    }

    fn name(&self) -> &'static str {
        "Monthly Share"
    }

    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        let multiplier = ctx.config.income_tier_multiplier(ctx.income);
        Ok(ctx.monthly_share(category) * multiplier)
    }
}

/// Purchase price supported by front-end and back-end DTI limits
pub struct MortgageFormula;

impl AffordabilityFormula for MortgageFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::Mortgage
    }

    fn name(&self) -> &'static str {
        "Mortgage"
    }

    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        let cfg = &ctx.config.affordability;
        let down_payment = category
            .assumption(DOWN_PAYMENT)
            .unwrap_or(cfg.default_down_payment);
        let rate = category
            .assumption(INTEREST_RATE)
            .unwrap_or(cfg.default_interest_rate);
        let property_tax = category
            .assumption(PROPERTY_TAX)
            .unwrap_or(cfg.default_property_tax);

        let ratio = cfg
            .front_end_ratio
            .min(cfg.back_end_ratio - ctx.debt_to_income_ratio);
        if ratio <= 0.0 {
            return Ok(0.0);
        }

        let max_payment = ctx.income * ratio;
        let escrow_share = (property_tax + cfg.home_insurance_rate) / 100.0 / 12.0;
        let eligible_payment = max_payment - max_payment * escrow_share;

        Ok(mortgage_price_from_payment(
            eligible_payment,
            rate,
            down_payment,
            cfg,
        ))
    }
}

/// Financed share of the budget over the loan term, divided by the debt headroom
pub struct AutoLoanFormula;

impl AffordabilityFormula for AutoLoanFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::AutoLoan
    }

    fn name(&self) -> &'static str {
        "Auto Loan"
    }

    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        let cfg = &ctx.config.affordability;
        let headroom = 1.0 - ctx.debt_to_income_ratio;
        if headroom <= 0.0 {
            return Ok(0.0);
        }
        let rate = category
            .assumption(INTEREST_RATE)
            .unwrap_or(cfg.default_interest_rate);

        let base = ctx.monthly_share(category) * (rate / 100.0) / cfg.auto_loan_term_months as f64;
        Ok(base / headroom)
    }
}

/// min(savings goal, monthly share * timeline months)
pub struct SavingsGoalFormula;

impl AffordabilityFormula for SavingsGoalFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::SavingsGoal
    }

    fn name(&self) -> &'static str {
        "Savings Goal"
    }

    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        let timeline = category
            .savings_timeline
            .map(f64::from)
            .or_else(|| category.assumption(TIMELINE))
            .unwrap_or(ctx.config.affordability.default_savings_timeline as f64);
        let reachable = ctx.monthly_share(category) * timeline;

        let goal = category
            .savings_goal
            .or_else(|| category.assumption(SAVINGS_GOAL));
        Ok(match goal {
            Some(goal) => goal.min(reachable),
            None => reachable,
        })
    }
}

/// max(minimum interest payment, monthly share)
pub struct DebtPaymentFormula;

impl AffordabilityFormula for DebtPaymentFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::DebtPayment
    }

    fn name(&self) -> &'static str {
        "Debt Payment"
    }

    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        let balance = category
            .debt_amount
            .or_else(|| category.assumption(DEBT_AMOUNT))
            .unwrap_or(0.0);
        let rate = category
            .debt_interest_rate
            .or_else(|| category.assumption(INTEREST_RATE))
            .unwrap_or(ctx.config.affordability.default_interest_rate);

        let minimum_payment = balance * rate / 100.0 / 12.0;
        Ok(minimum_payment.max(ctx.monthly_share(category)))
    }
}

/// Monthly share over twelve months
pub struct AnnualFormula;

impl AffordabilityFormula for AnnualFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::Annual
    }

    fn name(&self) -> &'static str {
        "Annual Budget"
    }

    fn calculate(&self, category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        Ok(ctx.monthly_share(category) * 12.0)
    }
}

/// Yearly maintenance percentage of the home price, monthly
pub struct HomeMaintenanceFormula;

impl AffordabilityFormula for HomeMaintenanceFormula {
    fn kind(&self) -> FormulaKind {
        FormulaKind::HomeMaintenance
    }

    fn name(&self) -> &'static str {
        "Home Maintenance"
    }

    fn calculate(&self, _category: &Category, ctx: &AffordabilityContext<'_>) -> Result<f64> {
        let home = ctx.catalog.require(ids::HOME)?;
        if home.formula() == FormulaKind::HomeMaintenance {
            return Err(Error::InvalidData(
                "home category cannot use the home_maintenance formula".into(),
            ));
        }

        let price = ctx.calculator.calculate_affordable_amount(
            ctx.catalog,
            home,
            ctx.income,
            ctx.debt_to_income_ratio,
        )?;
        Ok(price * ctx.config.affordability.maintenance_rate / 100.0 / 12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amortized_principal() {
        // 30-year loan at 7%: $1200/mo supports about $180,369
        let principal = amortized_principal(1_200.0, 7.0, 360);
        assert!((principal - 180_369.08).abs() < 0.01);

        // No interest degrades to payment * months
        assert_eq!(amortized_principal(500.0, 0.0, 20), 10_000.0);
    }

    #[test]
    fn test_mortgage_price_golden_value() {
        let config = AffordabilityConfig::default();
        // 180,369.08 / 0.8 = 225,461.35; * 1.035^5 = 267,777.36
        let price = mortgage_price_from_payment(1_200.0, 7.0, 20.0, &config);
        assert!((price - 267_777.36).abs() < 0.01, "price was {}", price);
    }

    #[test]
    fn test_mortgage_price_degenerate_inputs() {
        let config = AffordabilityConfig::default();
        assert_eq!(mortgage_price_from_payment(0.0, 7.0, 20.0, &config), 0.0);
        assert_eq!(mortgage_price_from_payment(1_200.0, 7.0, 100.0, &config), 0.0);
    }
}
