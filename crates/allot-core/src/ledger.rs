//! Budget ledger
//!
//! Owns the allocation collection for one budget. Allocations are keyed by
//! category id, with a separate list preserving display order. Aggregates
//! (totals, unused amount, savings rate) are always derived, never stored.
//!
//! Every mutation takes `&mut self`, so a ledger has a single writer at a
//! time. Callers that share one across threads wrap it in a `Mutex`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::priority_for;
use crate::error::{Error, Result};
use crate::models::{
    Allocation, AllocationType, Category, CategoryType, Priority, CUSTOM_ID_PREFIX,
};
use crate::optimize::{Suggestion, SuggestionKind, SuggestionTarget};

/// Serialized form of a ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub income: f64,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub custom_categories: Vec<Category>,
}

/// Derived totals for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub income: f64,
    pub total_allocated: f64,
    pub total_spent: f64,
    /// Income minus active allocations; negative in a deficit
    pub unused_amount: f64,
    pub savings_total: f64,
    /// Savings as a fraction of income
    pub savings_rate: f64,
    pub is_deficit: bool,
    pub lines: Vec<LineSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    pub category_id: String,
    pub name: String,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LedgerSnapshot", into = "LedgerSnapshot")]
pub struct BudgetLedger {
    income: f64,
    allocations: HashMap<String, Allocation>,
    order: Vec<String>,
    custom_categories: HashMap<String, Category>,
}

impl BudgetLedger {
    pub fn new(income: f64) -> Self {
        Self {
            income: non_negative(income),
            ..Self::default()
        }
    }

    /// Build a ledger from allocations; a repeated id replaces the earlier one
    pub fn with_allocations(income: f64, allocations: impl IntoIterator<Item = Allocation>) -> Self {
        let mut ledger = Self::new(income);
        for allocation in allocations {
            ledger.upsert(allocation);
        }
        ledger
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self> {
        if !snapshot.income.is_finite() || snapshot.income < 0.0 {
            return Err(Error::InvalidData(format!(
                "income must be a non-negative number, got {}",
                snapshot.income
            )));
        }

        let mut ledger = Self::new(snapshot.income);
        for allocation in snapshot.allocations {
            if ledger.contains(&allocation.category_id) {
                return Err(Error::InvalidData(format!(
                    "duplicate allocation: {}",
                    allocation.category_id
                )));
            }
            validate_amount("allocated amount", allocation.allocated_amount)?;
            validate_amount("spent amount", allocation.spent_amount)?;
            ledger.upsert(allocation);
        }
        for category in snapshot.custom_categories {
            ledger.custom_categories.insert(category.id.clone(), category);
        }

        Ok(ledger)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut custom_categories: Vec<Category> =
            self.custom_categories.values().cloned().collect();
        custom_categories.sort_by(|a, b| a.id.cmp(&b.id));

        LedgerSnapshot {
            income: self.income,
            allocations: self.allocations().cloned().collect(),
            custom_categories,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a ledger written by [`BudgetLedger::to_json`]
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn set_income(&mut self, income: f64) -> Result<()> {
        self.income = validate_amount("income", income)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, category_id: &str) -> Option<&Allocation> {
        self.allocations.get(category_id)
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.allocations.contains_key(category_id)
    }

    /// All allocations in display order
    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.order.iter().filter_map(|id| self.allocations.get(id))
    }

    pub fn active_allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations().filter(|a| a.is_active)
    }

    pub fn custom_category(&self, category_id: &str) -> Option<&Category> {
        self.custom_categories.get(category_id)
    }

    /// Insert an allocation, or replace the one with the same id in place.
    /// Priority is reset from the category id lookup.
    pub fn upsert(&mut self, mut allocation: Allocation) {
        allocation.priority = priority_for(&allocation.category_id);
        let id = allocation.category_id.clone();
        if self.allocations.insert(id.clone(), allocation).is_none() {
            self.order.push(id);
        }
    }

    /// Enable or disable an allocation without touching its amount
    pub fn set_active(&mut self, category_id: &str, active: bool) -> Result<()> {
        let allocation = self.require_mut(category_id)?;
        allocation.is_active = active;
        tracing::debug!(category = category_id, active, "Set allocation active state");
        Ok(())
    }

    /// Flip the active flag and return the new state
    pub fn toggle(&mut self, category_id: &str) -> Result<bool> {
        let allocation = self.require_mut(category_id)?;
        allocation.is_active = !allocation.is_active;
        let active = allocation.is_active;
        tracing::debug!(category = category_id, active, "Toggled allocation");
        Ok(active)
    }

    pub fn update_allocation(&mut self, category_id: &str, amount: f64) -> Result<()> {
        let amount = validate_amount("allocated amount", amount)?;
        self.require_mut(category_id)?.allocated_amount = amount;
        tracing::debug!(category = category_id, amount, "Updated allocation");
        Ok(())
    }

    pub fn update_spent(&mut self, category_id: &str, amount: f64) -> Result<()> {
        let amount = validate_amount("spent amount", amount)?;
        self.require_mut(category_id)?.spent_amount = amount;
        tracing::debug!(category = category_id, amount, "Updated spent amount");
        Ok(())
    }

    /// Add a user-defined category with an active allocation and return its
    /// id. The allocation percentage is derived as `amount / income`.
    pub fn add_custom_category(
        &mut self,
        name: &str,
        category_type: CategoryType,
        amount: f64,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("category name cannot be empty".into()));
        }
        let amount = validate_amount("allocated amount", amount)?;

        let id = self.unique_custom_id(name);
        let percentage = if self.income > 0.0 {
            (amount / self.income).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let category = Category::new(id.clone(), name, category_type, percentage);

        self.upsert(Allocation::from_category(&category, amount));
        self.custom_categories.insert(id.clone(), category);

        tracing::info!(category = id.as_str(), amount, "Added custom category");
        Ok(id)
    }

    /// Permanently remove an allocation. Essential catalog categories are
    /// protected; custom categories can always be deleted.
    pub fn delete(&mut self, category_id: &str) -> Result<Allocation> {
        let allocation = self
            .get(category_id)
            .ok_or_else(|| Error::AllocationNotFound(category_id.to_string()))?;
        if priority_for(category_id) == Priority::Essential && !allocation.is_custom() {
            return Err(Error::ProtectedCategory(category_id.to_string()));
        }

        self.order.retain(|id| id != category_id);
        self.custom_categories.remove(category_id);
        let removed = self
            .allocations
            .remove(category_id)
            .ok_or_else(|| Error::AllocationNotFound(category_id.to_string()))?;

        tracing::info!(category = category_id, "Deleted allocation");
        Ok(removed)
    }

    /// Sum of active allocated amounts
    pub fn total_allocated(&self) -> f64 {
        self.active_allocations().map(|a| a.allocated_amount).sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.active_allocations().map(|a| a.spent_amount).sum()
    }

    pub fn unused_amount(&self) -> f64 {
        self.income - self.total_allocated()
    }

    pub fn savings_total(&self) -> f64 {
        self.active_allocations()
            .filter(|a| a.allocation_type == AllocationType::Savings)
            .map(|a| a.allocated_amount)
            .sum()
    }

    /// Savings as a fraction of income; 0 without income
    pub fn savings_rate(&self) -> f64 {
        if self.income <= 0.0 {
            return 0.0;
        }
        self.savings_total() / self.income
    }

    pub fn is_deficit(&self) -> bool {
        self.unused_amount() < 0.0
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            income: self.income,
            total_allocated: self.total_allocated(),
            total_spent: self.total_spent(),
            unused_amount: self.unused_amount(),
            savings_total: self.savings_total(),
            savings_rate: self.savings_rate(),
            is_deficit: self.is_deficit(),
            lines: self
                .allocations()
                .map(|a| LineSummary {
                    category_id: a.category_id.clone(),
                    name: a.name.clone(),
                    allocated: a.allocated_amount,
                    spent: a.spent_amount,
                    remaining: a.remaining(),
                    is_active: a.is_active,
                })
                .collect(),
        }
    }

    /// Apply the selected suggestions and return how many changed the ledger.
    ///
    /// Increase and decrease set the target amount, add inserts (or
    /// reactivates) an allocation at the suggested amount, remove deletes.
    /// Every kind sets a final state, so re-applying is a no-op.
    pub fn apply_optimizations(&mut self, suggestions: &[Suggestion]) -> usize {
        let mut applied = 0;

        for suggestion in suggestions.iter().filter(|s| s.selected) {
            match self.apply_one(suggestion) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        category = suggestion.category_id(),
                        kind = suggestion.kind.as_str(),
                        error = %e,
                        "Skipped suggestion"
                    );
                }
            }
        }

        tracing::info!(applied, "Applied optimizations");
        applied
    }

    fn apply_one(&mut self, suggestion: &Suggestion) -> Result<bool> {
        let id = suggestion.category_id();

        match (suggestion.kind, &suggestion.target) {
            (SuggestionKind::Add, SuggestionTarget::New { category }) => {
                let amount = validate_amount("allocated amount", suggestion.amount)?;
                if let Some(existing) = self.allocations.get_mut(id) {
                    let changed = existing.allocated_amount != amount || !existing.is_active;
                    existing.allocated_amount = amount;
                    existing.is_active = true;
                    return Ok(changed);
                }
                self.upsert(Allocation::from_category(category, amount));
                Ok(true)
            }
            (SuggestionKind::Remove, _) => {
                if !self.contains(id) {
                    return Ok(false);
                }
                self.delete(id)?;
                Ok(true)
            }
            (SuggestionKind::Increase | SuggestionKind::Decrease, _)
            | (SuggestionKind::Add, SuggestionTarget::Existing { .. }) => {
                let amount = validate_amount("allocated amount", suggestion.amount)?;
                let allocation = self.require_mut(id)?;
                let changed = allocation.allocated_amount != amount;
                allocation.allocated_amount = amount;
                Ok(changed)
            }
        }
    }

    fn require_mut(&mut self, category_id: &str) -> Result<&mut Allocation> {
        self.allocations
            .get_mut(category_id)
            .ok_or_else(|| Error::AllocationNotFound(category_id.to_string()))
    }

    fn unique_custom_id(&self, name: &str) -> String {
        let base = format!("{}{}", CUSTOM_ID_PREFIX, slugify(name));
        if !self.contains(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|id| !self.contains(id))
            .unwrap_or(base)
    }
}

impl TryFrom<LedgerSnapshot> for BudgetLedger {
    type Error = Error;

    fn try_from(snapshot: LedgerSnapshot) -> Result<Self> {
        Self::from_snapshot(snapshot)
    }
}

impl From<BudgetLedger> for LedgerSnapshot {
    fn from(ledger: BudgetLedger) -> Self {
        ledger.snapshot()
    }
}

/// Lowercase ascii alphanumerics joined by single underscores
fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "category".to_string()
    } else {
        slug
    }
}

fn validate_amount(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidData(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )))
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
