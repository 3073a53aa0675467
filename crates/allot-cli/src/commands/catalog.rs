//! Catalog listing

use anyhow::Result;

use super::{truncate, Workspace};

pub fn cmd_catalog(ws: &Workspace) -> Result<()> {
    println!();
    println!("📚 Category Catalog ({} categories)", ws.catalog.len());
    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   {:<22} {:<24} {:<15} {:>6}  {:<13} Formula",
        "ID", "Name", "Type", "Share", "Priority"
    );

    for category in ws.catalog.iter() {
        println!(
            "   {:<22} {:<24} {:<15} {:>5.1}%  {:<13} {}",
            truncate(&category.id, 22),
            truncate(&category.name, 24),
            category.category_type,
            category.allocation_percentage * 100.0,
            category.priority(),
            category.formula()
        );
    }

    println!();
    Ok(())
}
