//! Core types for the Optimization Engine

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Allocation, AllocationType, Category, Priority};

/// What a suggestion does to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Increase,
    Decrease,
    Add,
    Remove,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Increase => "increase",
            SuggestionKind::Decrease => "decrease",
            SuggestionKind::Add => "add",
            SuggestionKind::Remove => "remove",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ranking class; lower sorts first when suggestions are truncated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    EssentialAdd = 1,
    Savings = 2,
    ExcessDecrease = 3,
    Other = 4,
    Remove = 5,
}

impl PriorityClass {
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

/// What a suggestion applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum SuggestionTarget {
    /// An allocation already in the ledger
    Existing { category_id: String },
    /// A category to add to the ledger
    New { category: Category },
}

/// A proposed correction to the current allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub target: SuggestionTarget,
    /// Amount the target is set to (unused for removals)
    pub amount: f64,
    /// Informational explanation for display
    pub reason: String,
    pub priority_class: PriorityClass,
    /// Id of the rule that produced this suggestion
    pub rule: String,
    /// Only selected suggestions are applied
    pub selected: bool,
}

impl Suggestion {
    /// Set an existing allocation to a higher amount
    pub fn increase(
        allocation: &Allocation,
        amount: f64,
        reason: impl Into<String>,
        rule: &str,
    ) -> Self {
        let class = if allocation.allocation_type == AllocationType::Savings {
            PriorityClass::Savings
        } else {
            PriorityClass::Other
        };
        Self::existing(SuggestionKind::Increase, allocation, amount, reason, rule, class)
    }

    /// Set an existing allocation to a lower amount
    pub fn decrease(
        allocation: &Allocation,
        amount: f64,
        reason: impl Into<String>,
        rule: &str,
    ) -> Self {
        Self::existing(
            SuggestionKind::Decrease,
            allocation,
            amount,
            reason,
            rule,
            PriorityClass::ExcessDecrease,
        )
    }

    /// Delete an allocation from the ledger
    pub fn remove(allocation: &Allocation, reason: impl Into<String>, rule: &str) -> Self {
        Self::existing(
            SuggestionKind::Remove,
            allocation,
            0.0,
            reason,
            rule,
            PriorityClass::Remove,
        )
    }

    /// Add a new active allocation for a catalog category
    pub fn add(category: &Category, amount: f64, reason: impl Into<String>, rule: &str) -> Self {
        let class = if category.priority() == Priority::Essential {
            PriorityClass::EssentialAdd
        } else if category.allocation_type() == AllocationType::Savings {
            PriorityClass::Savings
        } else {
            PriorityClass::Other
        };
        Self {
            kind: SuggestionKind::Add,
            target: SuggestionTarget::New {
                category: category.clone(),
            },
            amount,
            reason: reason.into(),
            priority_class: class,
            rule: rule.to_string(),
            selected: true,
        }
    }

    fn existing(
        kind: SuggestionKind,
        allocation: &Allocation,
        amount: f64,
        reason: impl Into<String>,
        rule: &str,
        priority_class: PriorityClass,
    ) -> Self {
        Self {
            kind,
            target: SuggestionTarget::Existing {
                category_id: allocation.category_id.clone(),
            },
            amount,
            reason: reason.into(),
            priority_class,
            rule: rule.to_string(),
            selected: true,
        }
    }

    /// Category id the suggestion applies to
    pub fn category_id(&self) -> &str {
        match &self.target {
            SuggestionTarget::Existing { category_id } => category_id,
            SuggestionTarget::New { category } => &category.id,
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}
