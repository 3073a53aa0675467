//! Optimization suggestions

use allot_core::{OptimizationEngine, Suggestion, SuggestionKind};
use anyhow::{bail, Result};

use super::{money, Workspace};

pub fn cmd_optimize(ws: &Workspace, apply: &[usize], apply_all: bool) -> Result<()> {
    let mut ledger = ws.open_ledger()?;
    let engine = OptimizationEngine::new(ws.config.optimization.clone());

    let allocations: Vec<_> = ledger.allocations().cloned().collect();
    let suggestions = engine.generate_optimizations(&allocations, ledger.income(), &ws.catalog);

    if suggestions.is_empty() {
        println!();
        println!("✅ No suggestions. Your budget looks balanced!");
        println!();
        return Ok(());
    }

    println!();
    println!("💡 Suggestions ({})", suggestions.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for (i, s) in suggestions.iter().enumerate() {
        println!("   {}. {}", i + 1, describe(s));
        println!("      {}", s.reason);
    }

    if !apply_all && apply.is_empty() {
        println!();
        println!("   Apply with: allot optimize --apply 1,2  (or --apply-all)");
        println!();
        return Ok(());
    }

    let selected = select(suggestions, apply, apply_all)?;
    let applied = ledger.apply_optimizations(&selected);
    ws.save_ledger(&ledger)?;

    println!();
    println!("✅ Applied {} suggestion(s)", applied);
    println!(
        "   Unused: {}  Savings rate: {:.1}%",
        money(ledger.unused_amount()),
        ledger.savings_rate() * 100.0
    );
    println!();
    Ok(())
}

/// Mark suggestions selected by 1-based number, or all of them
pub fn select(suggestions: Vec<Suggestion>, numbers: &[usize], all: bool) -> Result<Vec<Suggestion>> {
    if let Some(&bad) = numbers
        .iter()
        .find(|&&n| n == 0 || n > suggestions.len())
    {
        bail!(
            "No suggestion #{} (choose 1-{})",
            bad,
            suggestions.len()
        );
    }

    Ok(suggestions
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let selected = all || numbers.contains(&(i + 1));
            s.with_selected(selected)
        })
        .collect())
}

fn describe(s: &Suggestion) -> String {
    match s.kind {
        SuggestionKind::Increase => format!("📈 Increase {} to {}", s.category_id(), money(s.amount)),
        SuggestionKind::Decrease => format!("📉 Decrease {} to {}", s.category_id(), money(s.amount)),
        SuggestionKind::Add => format!("➕ Add {} at {}", s.category_id(), money(s.amount)),
        SuggestionKind::Remove => format!("🗑️  Remove {}", s.category_id()),
    }
}
