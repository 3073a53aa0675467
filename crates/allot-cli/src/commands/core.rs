//! Shared command utilities
//!
//! This module contains:
//! - `Workspace` - Loaded config, catalog and ledger location
//! - `open_ledger` / `save_ledger` - Ledger file persistence
//! - `validate_amount` - Rejects non-numeric and negative inputs before they reach the engine

use std::fs;
use std::path::{Path, PathBuf};

use allot_core::{BudgetConfig, BudgetLedger, CategoryCatalog};
use anyhow::{bail, Context, Result};

/// Everything a command needs besides its own arguments
pub struct Workspace {
    pub ledger_path: PathBuf,
    pub config: BudgetConfig,
    pub catalog: CategoryCatalog,
}

impl Workspace {
    pub fn load(
        ledger_path: &Path,
        config_path: Option<&Path>,
        catalog_path: Option<&Path>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => BudgetConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => BudgetConfig::load().context("Failed to load config")?,
        };

        let catalog = match catalog_path {
            Some(path) => CategoryCatalog::load(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => CategoryCatalog::builtin().context("Failed to load built-in catalog")?,
        };

        Ok(Self::new(ledger_path, config, catalog))
    }

    pub fn new(ledger_path: &Path, config: BudgetConfig, catalog: CategoryCatalog) -> Self {
        Self {
            ledger_path: ledger_path.to_path_buf(),
            config,
            catalog,
        }
    }

    /// Open the ledger file, failing with a hint when it does not exist yet
    pub fn open_ledger(&self) -> Result<BudgetLedger> {
        match self.try_open_ledger()? {
            Some(ledger) => Ok(ledger),
            None => bail!(
                "No ledger at {}. Create one with: allot plan --income <amount> --save",
                self.ledger_path.display()
            ),
        }
    }

    /// Open the ledger file if it exists
    pub fn try_open_ledger(&self) -> Result<Option<BudgetLedger>> {
        if !self.ledger_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.ledger_path)
            .with_context(|| format!("Failed to read ledger {}", self.ledger_path.display()))?;
        let ledger = BudgetLedger::from_json(&content)
            .with_context(|| format!("Failed to parse ledger {}", self.ledger_path.display()))?;
        Ok(Some(ledger))
    }

    /// Write the ledger as pretty JSON, replacing the file atomically
    pub fn save_ledger(&self, ledger: &BudgetLedger) -> Result<()> {
        let json = ledger.to_json().context("Failed to serialize ledger")?;

        let tmp = self.ledger_path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write ledger {}", tmp.display()))?;
        fs::rename(&tmp, &self.ledger_path)
            .with_context(|| format!("Failed to replace ledger {}", self.ledger_path.display()))?;

        tracing::debug!(path = %self.ledger_path.display(), "Saved ledger");
        Ok(())
    }
}

/// Reject NaN, infinities and negative amounts
pub fn validate_amount(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        bail!("{} must be a number, got {}", field, value);
    }
    if value < 0.0 {
        bail!("{} cannot be negative, got {}", field, value);
    }
    Ok(value)
}

/// Format a dollar amount with thousands separators
pub fn money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}
