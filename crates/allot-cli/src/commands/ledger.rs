//! Ledger commands (show, toggle, set, spent, add, delete, income)

use allot_core::CategoryType;
use anyhow::{anyhow, Context, Result};

use super::{money, truncate, validate_amount, Workspace};

pub fn cmd_ledger_show(ws: &Workspace, json: bool) -> Result<()> {
    let ledger = ws.open_ledger()?;
    let summary = ledger.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("📒 Ledger: {}", ws.ledger_path.display());
    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   {:<28} {:>12} {:>12} {:>12}",
        "Category", "Allocated", "Spent", "Remaining"
    );
    for line in &summary.lines {
        let marker = if line.is_active { " " } else { "⏸" };
        println!(
            "  {}{:<28} {:>12} {:>12} {:>12}",
            marker,
            truncate(&format!("{} ({})", line.name, line.category_id), 28),
            money(line.allocated),
            money(line.spent),
            money(line.remaining)
        );
    }

    println!();
    println!("   Income:           {}", money(summary.income));
    println!("   Allocated:        {}", money(summary.total_allocated));
    println!("   Spent:            {}", money(summary.total_spent));
    println!("   Unused:           {}", money(summary.unused_amount));
    println!("   Savings rate:     {:.1}%", summary.savings_rate * 100.0);
    if summary.is_deficit {
        println!();
        println!(
            "   ⚠️  Over budget by {}",
            money(-summary.unused_amount)
        );
    }
    println!();

    Ok(())
}

pub fn cmd_ledger_toggle(ws: &Workspace, category_id: &str) -> Result<()> {
    let mut ledger = ws.open_ledger()?;
    let active = ledger.toggle(category_id)?;
    ws.save_ledger(&ledger)?;

    if active {
        println!("▶️  Enabled {}", category_id);
    } else {
        println!("⏸  Disabled {} (amount kept)", category_id);
    }
    Ok(())
}

pub fn cmd_ledger_set(ws: &Workspace, category_id: &str, amount: f64) -> Result<()> {
    let amount = validate_amount("amount", amount)?;
    let mut ledger = ws.open_ledger()?;
    ledger.update_allocation(category_id, amount)?;
    ws.save_ledger(&ledger)?;

    println!("✏️  Set {} to {}", category_id, money(amount));
    println!("   Unused: {}", money(ledger.unused_amount()));
    Ok(())
}

pub fn cmd_ledger_spent(ws: &Workspace, category_id: &str, amount: f64) -> Result<()> {
    let amount = validate_amount("amount", amount)?;
    let mut ledger = ws.open_ledger()?;
    ledger.update_spent(category_id, amount)?;
    ws.save_ledger(&ledger)?;

    let remaining = ledger
        .get(category_id)
        .map(|a| a.remaining())
        .unwrap_or_default();
    println!("🧾 Recorded {} spent on {}", money(amount), category_id);
    if remaining < 0.0 {
        println!("   ⚠️  Over by {}", money(-remaining));
    } else {
        println!("   Remaining: {}", money(remaining));
    }
    Ok(())
}

pub fn cmd_ledger_add(ws: &Workspace, name: &str, amount: f64, category_type: &str) -> Result<()> {
    let amount = validate_amount("amount", amount)?;
    let category_type: CategoryType = category_type.parse().map_err(|e: String| anyhow!(e))?;

    let mut ledger = ws.open_ledger()?;
    let id = ledger
        .add_custom_category(name, category_type, amount)
        .context("Failed to add category")?;
    ws.save_ledger(&ledger)?;

    println!("➕ Added {} ({}) at {}", name, id, money(amount));
    Ok(())
}

pub fn cmd_ledger_delete(ws: &Workspace, category_id: &str) -> Result<()> {
    let mut ledger = ws.open_ledger()?;
    let removed = ledger.delete(category_id)?;
    ws.save_ledger(&ledger)?;

    println!("🗑️  Deleted {}", removed.name);
    Ok(())
}

pub fn cmd_ledger_income(ws: &Workspace, amount: f64) -> Result<()> {
    let amount = validate_amount("income", amount)?;
    let mut ledger = ws.open_ledger()?;
    ledger.set_income(amount)?;
    ws.save_ledger(&ledger)?;

    println!("💰 Income set to {}", money(amount));
    println!("   Unused: {}", money(ledger.unused_amount()));
    Ok(())
}
