//! Debt payoff plans

use allot_core::{DebtPayoffCalculator, PaymentTerms};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use super::{money, validate_amount, Workspace};

pub fn cmd_debt(
    ws: &Workspace,
    principal: f64,
    rate: f64,
    payment: Option<f64>,
    by: Option<&str>,
    schedule: bool,
) -> Result<()> {
    let principal = validate_amount("principal", principal)?;
    let rate = validate_amount("rate", rate)?;
    let today = chrono::Local::now().date_naive();

    let terms = match (payment, by) {
        (Some(payment), None) => PaymentTerms::FixedPayment(validate_amount("payment", payment)?),
        (None, Some(date)) => PaymentTerms::TargetDate(parse_date(date)?),
        _ => bail!("Pass either --payment or --by"),
    };

    let calculator = DebtPayoffCalculator::new(&ws.config.debt);
    let plan = calculator.calculate_debt_payoff(principal, rate, terms, today);

    println!();
    println!("💳 Debt Payoff Plan");
    println!("   ─────────────────────────────");
    println!("   Balance:          {}", money(plan.principal));
    println!("   Interest rate:    {:.2}%", plan.annual_rate);
    println!("   Monthly payment:  {}", money(plan.monthly_payment));

    if !plan.pays_off {
        println!();
        println!(
            "   ⚠️  This payment never pays off the balance within {} months.",
            calculator.horizon_months()
        );
        println!(
            "      Pay more than {} / month to cover interest.",
            money(plan.principal * plan.annual_rate / 100.0 / 12.0)
        );
        println!();
        return Ok(());
    }

    println!("   Months:           {}", plan.months);
    println!("   Total interest:   {}", money(plan.total_interest));
    println!("   Total cost:       {}", money(plan.total_cost));
    println!("   Debt-free by:     {}", plan.payoff_date.format("%B %Y"));

    if schedule {
        println!();
        println!(
            "   {:>5}  {:>12}  {:>12}  {:>12}  {:>14}",
            "Month", "Payment", "Interest", "Principal", "Balance"
        );
        for row in calculator.schedule(plan.principal, plan.annual_rate, plan.monthly_payment) {
            println!(
                "   {:>5}  {:>12}  {:>12}  {:>12}  {:>14}",
                row.month,
                money(row.payment),
                money(row.interest),
                money(row.principal),
                money(row.balance)
            );
        }
    }

    println!();
    Ok(())
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}
