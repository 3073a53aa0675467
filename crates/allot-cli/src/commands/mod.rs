//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (workspace loading, ledger persistence, input checks)
//! - `catalog` - Catalog listing
//! - `afford` - Affordability lookups
//! - `debt` - Debt payoff plans and schedules
//! - `plan` - Smart budget generation
//! - `optimize` - Optimization suggestions
//! - `ledger` - Ledger viewing and editing

pub mod afford;
pub mod catalog;
pub mod core;
pub mod debt;
pub mod ledger;
pub mod optimize;
pub mod plan;

// Re-export command functions for main.rs
pub use afford::*;
pub use catalog::*;
pub use core::*;
pub use debt::*;
pub use ledger::*;
pub use optimize::*;
pub use plan::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
