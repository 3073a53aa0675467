//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Allot - Plan where every dollar goes
#[derive(Parser)]
#[command(name = "allot")]
#[command(about = "Budget allocation and optimization planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(long, default_value = "allot.json", global = true)]
    pub ledger: PathBuf,

    /// Tuning config override (defaults to the platform data dir, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Category catalog override (defaults to the built-in catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog categories
    Catalog,

    /// Show the recommended amount for a category
    Afford {
        /// Category id (e.g., home, groceries, car)
        category: String,

        /// Monthly income (defaults to the ledger income)
        #[arg(short, long)]
        income: Option<f64>,

        /// Other monthly debt payments (defaults to active debt lines in the ledger)
        #[arg(long)]
        debt: Option<f64>,
    },

    /// Compute a debt payoff plan
    Debt {
        /// Outstanding balance
        principal: f64,

        /// Annual interest rate in percent
        #[arg(short, long, default_value_t = 0.0)]
        rate: f64,

        /// Fixed monthly payment
        #[arg(short, long, conflicts_with = "by")]
        payment: Option<f64>,

        /// Target payoff date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,

        /// Print the month-by-month schedule
        #[arg(long)]
        schedule: bool,
    },

    /// Generate a smart budget from monthly income
    Plan {
        /// Monthly income
        #[arg(short, long)]
        income: f64,

        /// Write the plan to the ledger file, replacing its allocations
        #[arg(long)]
        save: bool,
    },

    /// Suggest corrections to the current ledger
    Optimize {
        /// Suggestion numbers to apply (comma-separated, from the listing)
        #[arg(long, value_delimiter = ',', conflicts_with = "apply_all")]
        apply: Vec<usize>,

        /// Apply every suggestion
        #[arg(long)]
        apply_all: bool,
    },

    /// View and edit the ledger
    Ledger {
        #[command(subcommand)]
        action: Option<LedgerAction>,
    },
}

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Show allocations and totals
    Show {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enable or disable an allocation (keeps its amount)
    Toggle {
        /// Category id
        category: String,
    },

    /// Set the allocated amount
    Set {
        /// Category id
        category: String,
        /// Monthly amount
        amount: f64,
    },

    /// Record the amount spent
    Spent {
        /// Category id
        category: String,
        /// Amount spent this month
        amount: f64,
    },

    /// Add a custom category
    Add {
        /// Display name
        name: String,
        /// Monthly amount
        amount: f64,
        /// Category type (housing, food, savings, other, ...)
        #[arg(short = 't', long = "type", default_value = "other")]
        category_type: String,
    },

    /// Permanently delete an allocation
    Delete {
        /// Category id
        category: String,
    },

    /// Change the monthly income
    Income {
        /// Monthly income
        amount: f64,
    },
}
