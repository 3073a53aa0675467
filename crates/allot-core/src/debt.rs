//! Debt payoff calculator
//!
//! Amortization math for a single debt balance, given either a fixed monthly
//! payment (solve for months) or a target payoff date (solve for payment).
//! A payment that never covers the monthly interest yields a plan capped at
//! the payoff horizon with `pays_off = false`, never NaN or negative months.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::DebtConfig;
use crate::models::round_cents;

/// How the payoff is constrained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaymentTerms {
    /// Pay this much every month
    FixedPayment(f64),
    /// Be debt-free by this date
    TargetDate(NaiveDate),
}

/// A derived payoff schedule summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPlan {
    pub principal: f64,
    pub annual_rate: f64,
    pub monthly_payment: f64,
    pub months: u32,
    pub total_interest: f64,
    pub total_cost: f64,
    pub payoff_date: NaiveDate,
    /// False when the payment never retires the balance within the horizon
    pub pays_off: bool,
}

/// One month of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct DebtPayoffCalculator {
    horizon_months: u32,
}

impl Default for DebtPayoffCalculator {
    fn default() -> Self {
        Self::new(&DebtConfig::default())
    }
}

impl DebtPayoffCalculator {
    pub fn new(config: &DebtConfig) -> Self {
        Self {
            horizon_months: config.payoff_horizon_months.max(1),
        }
    }

    /// Month count reported for balances that never pay off
    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    /// Compute a payoff plan starting from `today`
    pub fn calculate_debt_payoff(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        terms: PaymentTerms,
        today: NaiveDate,
    ) -> DebtPlan {
        match terms {
            PaymentTerms::FixedPayment(payment) => {
                self.from_payment(principal, annual_rate_percent, payment, today)
            }
            PaymentTerms::TargetDate(target) => {
                self.from_target_date(principal, annual_rate_percent, target, today)
            }
        }
    }

    /// Solve for the number of months a fixed payment takes
    pub fn from_payment(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        payment: f64,
        today: NaiveDate,
    ) -> DebtPlan {
        let principal = non_negative(principal);
        let rate = non_negative(annual_rate_percent);
        let payment = non_negative(payment);

        if principal == 0.0 {
            return self.settled(rate, payment, today);
        }

        let monthly_rate = monthly_rate(rate);
        let interest_only = monthly_rate * principal;
        if payment <= interest_only {
            tracing::debug!(
                principal,
                payment,
                interest_only,
                "Payment does not cover interest"
            );
            return self.never_pays_off(principal, rate, payment, today);
        }

        let exact = if monthly_rate == 0.0 {
            principal / payment
        } else {
            (payment / (payment - interest_only)).ln() / (1.0 + monthly_rate).ln()
        };
        // Absorb float noise so exact multiples do not round up a month
        let months = (exact - 1e-9).ceil().max(1.0);
        if !months.is_finite() || months > self.horizon_months as f64 {
            return self.never_pays_off(principal, rate, payment, today);
        }

        self.plan(principal, rate, payment, months as u32, today)
    }

    /// Solve for the payment that retires the balance by `target`
    pub fn from_target_date(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        target: NaiveDate,
        today: NaiveDate,
    ) -> DebtPlan {
        let principal = non_negative(principal);
        let rate = non_negative(annual_rate_percent);

        if principal == 0.0 {
            return self.settled(rate, 0.0, today);
        }

        let months = months_until(today, target).min(self.horizon_months);
        let n = months as f64;
        let monthly_rate = monthly_rate(rate);
        let payment = if monthly_rate == 0.0 {
            principal / n
        } else {
            principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-n))
        };

        self.plan(principal, rate, payment, months, today)
    }

    /// Month-by-month schedule for a fixed payment, capped at the horizon
    pub fn schedule(&self, principal: f64, annual_rate_percent: f64, payment: f64) -> Vec<ScheduleRow> {
        let monthly_rate = monthly_rate(non_negative(annual_rate_percent));
        let payment = non_negative(payment);
        let mut balance = non_negative(principal);
        let mut rows = Vec::new();

        let mut month = 0;
        while balance > 0.005 && month < self.horizon_months {
            month += 1;
            let interest = balance * monthly_rate;
            let paid = payment.min(balance + interest);
            let toward_principal = paid - interest;
            balance -= toward_principal;

            rows.push(ScheduleRow {
                month,
                payment: round_cents(paid),
                interest: round_cents(interest),
                principal: round_cents(toward_principal),
                balance: round_cents(balance.max(0.0)),
            });
        }

        rows
    }

    fn plan(&self, principal: f64, rate: f64, payment: f64, months: u32, today: NaiveDate) -> DebtPlan {
        let total_interest = (payment * months as f64 - principal).max(0.0);
        DebtPlan {
            principal,
            annual_rate: rate,
            monthly_payment: round_cents(payment),
            months,
            total_interest: round_cents(total_interest),
            total_cost: round_cents(principal + total_interest),
            payoff_date: add_months(today, months),
            pays_off: true,
        }
    }

    fn never_pays_off(&self, principal: f64, rate: f64, payment: f64, today: NaiveDate) -> DebtPlan {
        DebtPlan {
            pays_off: false,
            ..self.plan(principal, rate, payment, self.horizon_months, today)
        }
    }

    fn settled(&self, rate: f64, payment: f64, today: NaiveDate) -> DebtPlan {
        DebtPlan {
            principal: 0.0,
            annual_rate: rate,
            monthly_payment: round_cents(payment),
            months: 0,
            total_interest: 0.0,
            total_cost: 0.0,
            payoff_date: today,
            pays_off: true,
        }
    }
}

/// Whole months from `today` until `target`, counting a partial month as
/// one. Dates on or before today count as one month.
pub fn months_until(today: NaiveDate, target: NaiveDate) -> u32 {
    let mut months = (target.year() - today.year()) * 12 + target.month() as i32
        - today.month() as i32;
    if target.day() > today.day() {
        months += 1;
    }
    months.max(1) as u32
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let calc = DebtPayoffCalculator::default();
        let plan = calc.from_payment(10_000.0, 0.0, 500.0, date(2026, 1, 15));

        assert_eq!(plan.months, 20);
        assert_eq!(plan.total_interest, 0.0);
        assert_eq!(plan.total_cost, 10_000.0);
        assert_eq!(plan.payoff_date, date(2027, 9, 15));
        assert!(plan.pays_off);
    }

    #[test]
    fn test_interest_bearing_payoff() {
        let calc = DebtPayoffCalculator::default();
        let plan = calc.from_payment(10_000.0, 18.0, 300.0, date(2026, 1, 1));

        // ln(300 / (300 - 150)) / ln(1.015) = 46.56 -> 47
        assert_eq!(plan.months, 47);
        assert_eq!(plan.total_interest, 4_100.0);
        assert_eq!(plan.total_cost, 14_100.0);
        assert_eq!(plan.payoff_date, date(2029, 12, 1));
    }

    #[test]
    fn test_payment_below_interest_never_pays_off() {
        let calc = DebtPayoffCalculator::default();
        // Interest alone is 150/mo
        let plan = calc.from_payment(10_000.0, 18.0, 150.0, date(2026, 1, 1));

        assert!(!plan.pays_off);
        assert_eq!(plan.months, 999);
        assert!(plan.total_interest.is_finite());
        assert!(plan.total_interest >= 0.0);
    }

    #[test]
    fn test_zero_payment_never_pays_off() {
        let calc = DebtPayoffCalculator::default();
        let plan = calc.from_payment(1_000.0, 0.0, 0.0, date(2026, 1, 1));
        assert!(!plan.pays_off);
        assert_eq!(plan.months, calc.horizon_months());
    }

    #[test]
    fn test_target_date_zero_rate() {
        let calc = DebtPayoffCalculator::default();
        let today = date(2026, 1, 15);
        let plan = calc.calculate_debt_payoff(
            5_000.0,
            0.0,
            PaymentTerms::TargetDate(date(2026, 11, 15)),
            today,
        );

        assert_eq!(plan.months, 10);
        assert_eq!(plan.monthly_payment, 500.0);
        assert_eq!(plan.total_interest, 0.0);
    }

    #[test]
    fn test_target_date_with_interest() {
        let calc = DebtPayoffCalculator::default();
        let plan = calc.from_target_date(5_000.0, 6.0, date(2027, 1, 1), date(2026, 1, 1));

        assert_eq!(plan.months, 12);
        assert_eq!(plan.monthly_payment, 430.33);
        assert!((plan.total_interest - 163.99).abs() < 0.01);
    }

    #[test]
    fn test_zero_principal_is_settled() {
        let calc = DebtPayoffCalculator::default();
        let today = date(2026, 3, 1);
        let plan = calc.from_payment(0.0, 12.0, 100.0, today);
        assert_eq!(plan.months, 0);
        assert_eq!(plan.payoff_date, today);
        assert!(plan.pays_off);
    }

    #[test]
    fn test_months_until() {
        assert_eq!(months_until(date(2026, 1, 15), date(2026, 11, 15)), 10);
        assert_eq!(months_until(date(2026, 1, 15), date(2026, 11, 16)), 11);
        assert_eq!(months_until(date(2026, 1, 15), date(2026, 1, 1)), 1);
        assert_eq!(months_until(date(2026, 12, 1), date(2027, 2, 1)), 2);
    }

    #[test]
    fn test_schedule_retires_balance() {
        let calc = DebtPayoffCalculator::default();
        let rows = calc.schedule(1_000.0, 12.0, 200.0);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].interest, 10.0);
        assert_eq!(rows[0].principal, 190.0);
        assert_eq!(rows.last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_schedule_capped_at_horizon() {
        let calc = DebtPayoffCalculator::new(&DebtConfig {
            payoff_horizon_months: 24,
        });
        let rows = calc.schedule(10_000.0, 18.0, 100.0);
        assert_eq!(rows.len(), 24);
    }
}
