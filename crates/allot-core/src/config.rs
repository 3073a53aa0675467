//! Tuning constants for the allocation, affordability and optimization engines
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/allot/budget.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every key is optional; missing keys keep their canonical value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/budget.toml");

/// All tuning constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub allocation: AllocationConfig,
    pub affordability: AffordabilityConfig,
    pub income_tiers: Vec<IncomeTier>,
    pub debt: DebtConfig,
    pub optimization: OptimizationConfig,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            allocation: AllocationConfig::default(),
            affordability: AffordabilityConfig::default(),
            income_tiers: default_income_tiers(),
            debt: DebtConfig::default(),
            optimization: OptimizationConfig::default(),
        }
    }
}

/// Constants for the smart budget generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Share of income reserved as surplus
    pub surplus_fraction: f64,
    pub max_housing_ratio: f64,
    /// Emergency savings floor per year
    pub emergency_floor_annual: f64,
    pub emergency_ceiling_ratio: f64,
    pub min_retirement_percentage: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            surplus_fraction: 0.10,
            max_housing_ratio: 0.30,
            emergency_floor_annual: 1000.0,
            emergency_ceiling_ratio: 0.20,
            min_retirement_percentage: 0.05,
        }
    }
}

impl AllocationConfig {
    /// Monthly emergency savings floor
    pub fn emergency_floor(&self) -> f64 {
        self.emergency_floor_annual / 12.0
    }
}

/// Constants for the affordability formulas. Rates are in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordabilityConfig {
    pub front_end_ratio: f64,
    pub back_end_ratio: f64,
    /// Homeowner's insurance, percent per year; added to property tax
    pub home_insurance_rate: f64,
    pub mortgage_term_months: u32,
    pub auto_loan_term_months: u32,
    pub appreciation_rate: f64,
    pub appreciation_years: u32,
    /// Yearly upkeep as a percent of the home price
    pub maintenance_rate: f64,
    pub default_down_payment: f64,
    pub default_interest_rate: f64,
    pub default_property_tax: f64,
    pub default_savings_timeline: u32,
}

impl Default for AffordabilityConfig {
    fn default() -> Self {
        Self {
            front_end_ratio: 0.28,
            back_end_ratio: 0.36,
            home_insurance_rate: 0.4,
            mortgage_term_months: 360,
            auto_loan_term_months: 60,
            appreciation_rate: 3.5,
            appreciation_years: 5,
            maintenance_rate: 1.0,
            default_down_payment: 20.0,
            default_interest_rate: 7.0,
            default_property_tax: 1.1,
            default_savings_timeline: 12,
        }
    }
}

/// Income bracket for the affordability multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTier {
    /// Exclusive upper bound on annual income; `None` for the top bracket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_below: Option<f64>,
    pub multiplier: f64,
}

fn default_income_tiers() -> Vec<IncomeTier> {
    vec![
        IncomeTier {
            annual_below: Some(50_000.0),
            multiplier: 0.9,
        },
        IncomeTier {
            annual_below: Some(100_000.0),
            multiplier: 1.0,
        },
        IncomeTier {
            annual_below: Some(200_000.0),
            multiplier: 1.1,
        },
        IncomeTier {
            annual_below: None,
            multiplier: 1.2,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtConfig {
    /// Month count reported for payments that never cover the interest
    pub payoff_horizon_months: u32,
}

impl Default for DebtConfig {
    fn default() -> Self {
        Self {
            payoff_horizon_months: 999,
        }
    }
}

/// Thresholds for the optimization rules. Ratios are fractions of monthly
/// income, thresholds are monthly income amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub max_suggestions: usize,
    pub target_savings_rate: f64,
    pub savings_increase_factor: f64,
    pub housing_warning_ratio: f64,
    pub housing_target_ratio: f64,
    pub health_share: f64,
    pub retirement_income_threshold: f64,
    pub entertainment_income_threshold: f64,
    pub gifts_income_threshold: f64,
    pub personal_development_income_threshold: f64,
    pub vacation_income_threshold: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            target_savings_rate: 0.20,
            savings_increase_factor: 1.2,
            housing_warning_ratio: 0.35,
            housing_target_ratio: 0.30,
            health_share: 0.05,
            retirement_income_threshold: 4000.0,
            entertainment_income_threshold: 3500.0,
            gifts_income_threshold: 2500.0,
            personal_development_income_threshold: 4000.0,
            vacation_income_threshold: 5000.0,
        }
    }
}

impl BudgetConfig {
    /// Load from the default override location, falling back to the embedded config
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path, falling back to the embedded config if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Multiplier for the bracket containing this monthly income
    pub fn income_tier_multiplier(&self, monthly_income: f64) -> f64 {
        let annual = monthly_income * 12.0;
        self.income_tiers
            .iter()
            .find(|tier| tier.annual_below.map_or(true, |below| annual < below))
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("allot").join("budget.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<BudgetConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(ref path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading budget config override");
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<BudgetConfig> {
    let config: BudgetConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &BudgetConfig) -> Result<()> {
    let alloc = &config.allocation;
    if !(0.0..1.0).contains(&alloc.surplus_fraction) {
        return Err(Error::Config(format!(
            "surplus_fraction must be in [0, 1), got {}",
            alloc.surplus_fraction
        )));
    }
    for (name, value) in [
        ("max_housing_ratio", alloc.max_housing_ratio),
        ("emergency_ceiling_ratio", alloc.emergency_ceiling_ratio),
        ("min_retirement_percentage", alloc.min_retirement_percentage),
        ("front_end_ratio", config.affordability.front_end_ratio),
        ("back_end_ratio", config.affordability.back_end_ratio),
        ("target_savings_rate", config.optimization.target_savings_rate),
        ("housing_target_ratio", config.optimization.housing_target_ratio),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::Config(format!(
                "{} must be in [0, 1], got {}",
                name, value
            )));
        }
    }
    if config.affordability.mortgage_term_months == 0
        || config.affordability.auto_loan_term_months == 0
    {
        return Err(Error::Config("loan terms must be at least one month".into()));
    }
    if config.debt.payoff_horizon_months == 0 {
        return Err(Error::Config(
            "payoff_horizon_months must be at least one month".into(),
        ));
    }
    Ok(())
}
