//! Smart budget generation

use allot_core::{AllocationEngine, BudgetLedger, Priority};
use anyhow::Result;

use super::{money, truncate, validate_amount, Workspace};

pub fn cmd_plan(ws: &Workspace, income: f64, save: bool) -> Result<()> {
    let income = validate_amount("income", income)?;
    let engine = AllocationEngine::new(ws.config.allocation.clone());
    let plan = engine.generate_plan(income, &ws.catalog);

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           🧮 Smart Budget               │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Monthly income:    {}", money(plan.income));
    println!("  Reserved surplus:  {}", money(plan.reserved_surplus));
    println!("  Available:         {}", money(plan.available_income));

    for priority in [Priority::Essential, Priority::Important, Priority::Discretionary] {
        let lines: Vec<_> = plan
            .allocations
            .iter()
            .filter(|a| a.priority == priority)
            .collect();
        if lines.is_empty() {
            continue;
        }

        let scale = match priority {
            Priority::Essential => 1.0,
            Priority::Important => plan.important_scale,
            Priority::Discretionary => plan.discretionary_scale,
        };
        println!();
        println!("  {} ({:.0}% funded)", priority, scale * 100.0);
        for a in lines {
            println!("     {:<26} {:>12}", truncate(&a.name, 26), money(a.allocated_amount));
        }
    }

    println!();
    println!("  Total allocated:   {}", money(plan.total_allocated()));
    if plan.essential_shortfall() > 0.0 {
        println!(
            "  ⚠️  Essentials exceed available income by {}",
            money(plan.essential_shortfall())
        );
    }

    if save {
        let ledger = BudgetLedger::with_allocations(income, plan.allocations);
        ws.save_ledger(&ledger)?;
        println!();
        println!("✅ Saved {} allocations to {}", ledger.len(), ws.ledger_path.display());
        println!("   Next: allot optimize");
    }

    println!();
    Ok(())
}
