//! Category catalog
//!
//! The catalog is a read-only set of category definitions, loaded once and
//! passed explicitly into every engine call. Category priority is not stored
//! per entry; it comes from the fixed id lookup in [`priority_for`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Category, Priority};

/// Embedded default catalog (compiled into binary)
const DEFAULT_CATALOG: &str = include_str!("../../../config/catalog.toml");

/// Well-known category ids referenced by the engines
pub mod ids {
    pub const HOUSING: &str = "housing";
    pub const HOME: &str = "home";
    pub const HOME_MAINTENANCE: &str = "home_maintenance";
    pub const GROCERIES: &str = "groceries";
    pub const UTILITIES: &str = "utilities";
    pub const TRANSPORTATION: &str = "transportation";
    pub const EMERGENCY_SAVINGS: &str = "emergency_savings";
    pub const RETIREMENT: &str = "retirement";
    pub const HEALTHCARE: &str = "healthcare";
    pub const HEALTH_INSURANCE: &str = "health_insurance";
    pub const ENTERTAINMENT: &str = "entertainment";
    pub const GIFTS: &str = "gifts";
    pub const PERSONAL_DEVELOPMENT: &str = "personal_development";
    pub const VACATION: &str = "vacation";
}

/// Categories every budget should cover
pub const ESSENTIAL_IDS: &[&str] = &[
    ids::HOUSING,
    ids::GROCERIES,
    ids::UTILITIES,
    ids::TRANSPORTATION,
    ids::EMERGENCY_SAVINGS,
];

/// Categories that count as health coverage regardless of type
pub const HEALTH_IDS: &[&str] = &[ids::HEALTHCARE, ids::HEALTH_INSURANCE];

/// Categories funded after essentials and before discretionary spending
pub const IMPORTANT_IDS: &[&str] = &[
    "car",
    "public_transit",
    "investments",
    "credit_cards",
    "loans",
    ids::RETIREMENT,
    ids::HEALTHCARE,
    ids::HEALTH_INSURANCE,
    "childcare",
];

/// Priority tier for a category id. Unknown and custom ids are discretionary.
pub fn priority_for(id: &str) -> Priority {
    if ESSENTIAL_IDS.contains(&id) {
        Priority::Essential
    } else if IMPORTANT_IDS.contains(&id) {
        Priority::Important
    } else {
        Priority::Discretionary
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Read-only catalog keyed by category id, preserving file order
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryCatalog {
    /// Build a catalog, rejecting duplicate ids and out-of-range percentages
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut index = HashMap::with_capacity(categories.len());

        for (position, category) in categories.iter().enumerate() {
            validate_category(category)?;
            if index.insert(category.id.clone(), position).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate category id: {}",
                    category.id
                )));
            }
        }

        Ok(Self { categories, index })
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawCatalog = toml::from_str(content)?;
        Self::new(raw.categories)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            categories = catalog.len(),
            "Loaded category catalog"
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.index.get(id).map(|&i| &self.categories[i])
    }

    /// Like [`get`](Self::get), but a missing id is a typed failure
    pub fn require(&self, id: &str) -> Result<&Category> {
        self.get(id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Categories in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn validate_category(category: &Category) -> Result<()> {
    if category.id.trim().is_empty() {
        return Err(Error::InvalidData("Category id cannot be empty".into()));
    }
    if !(0.0..=1.0).contains(&category.allocation_percentage) {
        return Err(Error::InvalidData(format!(
            "Category {} allocation_percentage must be in [0, 1], got {}",
            category.id, category.allocation_percentage
        )));
    }
    if let Some(bad) = category.assumptions.iter().find(|a| a.numeric().is_none()) {
        return Err(Error::InvalidData(format!(
            "Category {} assumption '{}' is not numeric: {}",
            category.id, bad.title, bad.value
        )));
    }
    Ok(())
}
