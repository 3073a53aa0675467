//! Affordability lookups

use allot_core::affordability::{debt_to_income_ratio, peer_debt_total};
use allot_core::{AffordabilityCalculator, DisplayType};
use anyhow::{bail, Context, Result};

use super::{money, validate_amount, Workspace};

pub fn cmd_afford(
    ws: &Workspace,
    category_id: &str,
    income: Option<f64>,
    debt: Option<f64>,
) -> Result<()> {
    let ledger = ws.try_open_ledger()?;

    let income = match (income, &ledger) {
        (Some(income), _) => validate_amount("income", income)?,
        (None, Some(ledger)) => ledger.income(),
        (None, None) => bail!("Pass --income or create a ledger with: allot plan --save"),
    };
    let peer_debt = match (debt, &ledger) {
        (Some(debt), _) => validate_amount("debt", debt)?,
        (None, Some(ledger)) => peer_debt_total(ledger.allocations(), category_id),
        (None, None) => 0.0,
    };

    let category = match ws.catalog.get(category_id) {
        Some(category) => category,
        None => ledger
            .as_ref()
            .and_then(|l| l.custom_category(category_id))
            .with_context(|| format!("Unknown category: {}", category_id))?,
    };

    let calculator = AffordabilityCalculator::new(ws.config.clone());
    let dti = debt_to_income_ratio(peer_debt, income);
    let amount = calculator
        .calculate_affordable_amount(&ws.catalog, category, income, dti)
        .with_context(|| format!("Failed to calculate {}", category_id))?;

    println!();
    println!("💵 {} ({})", category.name, category.formula());
    println!("   ─────────────────────────────");
    println!("   Monthly income:   {}", money(income));
    println!(
        "   Other debt:       {} ({:.1}% of income)",
        money(peer_debt),
        dti * 100.0
    );
    for assumption in &category.assumptions {
        println!("   {:<17} {}", format!("{}:", assumption.title), assumption.value);
    }
    println!();
    match category.display_type {
        DisplayType::Monthly => println!("   ✅ Recommended: {} / month", money(amount)),
        DisplayType::Total => println!("   ✅ Recommended total: {}", money(amount)),
    }
    if amount == 0.0 && dti > 0.0 {
        println!("   ⚠️  Existing debt leaves no room for this category");
    }
    println!();

    Ok(())
}
