//! Allot CLI - Budget allocation planner
//!
//! Usage:
//!   allot plan --income 5000 --save   Generate and save a smart budget
//!   allot optimize                    Suggest corrections to the ledger
//!   allot afford home --income 8000   Recommended amount for a category
//!   allot debt 5000 --rate 18 --payment 250

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let ws = commands::Workspace::load(&cli.ledger, cli.config.as_deref(), cli.catalog.as_deref())?;

    match cli.command {
        Commands::Catalog => commands::cmd_catalog(&ws),
        Commands::Afford {
            category,
            income,
            debt,
        } => commands::cmd_afford(&ws, &category, income, debt),
        Commands::Debt {
            principal,
            rate,
            payment,
            by,
            schedule,
        } => commands::cmd_debt(&ws, principal, rate, payment, by.as_deref(), schedule),
        Commands::Plan { income, save } => commands::cmd_plan(&ws, income, save),
        Commands::Optimize { apply, apply_all } => commands::cmd_optimize(&ws, &apply, apply_all),
        Commands::Ledger { action } => match action {
            None => commands::cmd_ledger_show(&ws, false),
            Some(LedgerAction::Show { json }) => commands::cmd_ledger_show(&ws, json),
            Some(LedgerAction::Toggle { category }) => commands::cmd_ledger_toggle(&ws, &category),
            Some(LedgerAction::Set { category, amount }) => {
                commands::cmd_ledger_set(&ws, &category, amount)
            }
            Some(LedgerAction::Spent { category, amount }) => {
                commands::cmd_ledger_spent(&ws, &category, amount)
            }
            Some(LedgerAction::Add {
                name,
                amount,
                category_type,
            }) => commands::cmd_ledger_add(&ws, &name, amount, &category_type),
            Some(LedgerAction::Delete { category }) => commands::cmd_ledger_delete(&ws, &category),
            Some(LedgerAction::Income { amount }) => commands::cmd_ledger_income(&ws, amount),
        },
    }
}
