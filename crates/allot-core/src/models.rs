//! Domain models for Allot

use serde::{Deserialize, Serialize};

use crate::catalog;

/// Id prefix for categories created by the user rather than the catalog
pub const CUSTOM_ID_PREFIX: &str = "custom_";

/// Spending category type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Housing,
    Transportation,
    Savings,
    Debt,
    Utilities,
    Food,
    Insurance,
    Education,
    Personal,
    Health,
    Family,
    Entertainment,
    Other,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Transportation => "transportation",
            Self::Savings => "savings",
            Self::Debt => "debt",
            Self::Utilities => "utilities",
            Self::Food => "food",
            Self::Insurance => "insurance",
            Self::Education => "education",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Family => "family",
            Self::Entertainment => "entertainment",
            Self::Other => "other",
        }
    }

    /// Position in the fixed allocation order used to make generated
    /// budgets deterministic within a tier.
    pub fn allocation_order(&self) -> usize {
        match self {
            Self::Savings => 0,
            Self::Housing => 1,
            Self::Utilities => 2,
            Self::Food => 3,
            Self::Health => 4,
            Self::Insurance => 5,
            Self::Transportation => 6,
            Self::Family => 7,
            Self::Education => 8,
            Self::Personal => 9,
            Self::Entertainment => 10,
            Self::Debt => 11,
            Self::Other => 12,
        }
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "housing" => Ok(Self::Housing),
            "transportation" => Ok(Self::Transportation),
            "savings" => Ok(Self::Savings),
            "debt" => Ok(Self::Debt),
            "utilities" => Ok(Self::Utilities),
            "food" => Ok(Self::Food),
            "insurance" => Ok(Self::Insurance),
            "education" => Ok(Self::Education),
            "personal" => Ok(Self::Personal),
            "health" => Ok(Self::Health),
            "family" => Ok(Self::Family),
            "entertainment" => Ok(Self::Entertainment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category type: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a category's recommended amount is a monthly figure or a total
/// (purchase price, savings target, annual budget)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Monthly,
    Total,
}

/// Priority tier governing which categories absorb income shortfalls first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Essential,
    Important,
    Discretionary,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Important => "important",
            Self::Discretionary => "discretionary",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Affordability formula tag. Selects the strategy used by
/// [`crate::affordability::AffordabilityCalculator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormulaKind {
    /// Share of income scaled by the income tier multiplier
    Monthly,
    /// Home purchase price from mortgage underwriting ratios
    Mortgage,
    /// Vehicle affordability adjusted for existing debt load
    AutoLoan,
    /// Savings goal reachable within the timeline
    SavingsGoal,
    /// Larger of the minimum payment and the budget share
    DebtPayment,
    /// Budget share over a year
    Annual,
    /// Upkeep derived from the home purchase price
    HomeMaintenance,
    /// A strategy registered by the caller under this name
    Custom(String),
}

impl FormulaKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Monthly => "monthly",
            Self::Mortgage => "mortgage",
            Self::AutoLoan => "auto_loan",
            Self::SavingsGoal => "savings_goal",
            Self::DebtPayment => "debt_payment",
            Self::Annual => "annual",
            Self::HomeMaintenance => "home_maintenance",
            Self::Custom(name) => name,
        }
    }
}

impl std::str::FromStr for FormulaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "mortgage" => Ok(Self::Mortgage),
            "auto_loan" => Ok(Self::AutoLoan),
            "savings_goal" => Ok(Self::SavingsGoal),
            "debt_payment" => Ok(Self::DebtPayment),
            "annual" => Ok(Self::Annual),
            "home_maintenance" => Ok(Self::HomeMaintenance),
            other => match other.strip_prefix("custom:") {
                Some(name) if !name.is_empty() => Ok(Self::Custom(name.to_string())),
                _ => Err(format!("Unknown formula: {}", s)),
            },
        }
    }
}

impl TryFrom<String> for FormulaKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormulaKind> for String {
    fn from(kind: FormulaKind) -> Self {
        match kind {
            FormulaKind::Custom(name) => format!("custom:{}", name),
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(name) => write!(f, "custom:{}", name),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Base allocation rule used by the smart budget generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationRule {
    /// income * allocation percentage
    Proportional,
    /// Capped at the maximum housing ratio
    Housing,
    /// Always zero; debt is handled through payoff plans
    Debt,
    /// Clamped between the emergency floor and ceiling
    EmergencySavings,
    /// At least the minimum retirement percentage
    Retirement,
}

/// A titled, string-encoded numeric assumption ("Down Payment" = "20%")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub title: String,
    pub value: String,
}

impl Assumption {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }

    /// Parse the value, tolerating "%", "$" and thousands separators
    pub fn numeric(&self) -> Option<f64> {
        let cleaned: String = self
            .value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '%' | '$' | ',' | ' '))
            .collect();
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Whether an allocation counts toward spending or saving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationType {
    Expense,
    Savings,
}

impl AllocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Savings => "savings",
        }
    }
}

/// A catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub display_type: DisplayType,
    /// Fraction of monthly income nominally assigned (0..=1)
    pub allocation_percentage: f64,
    #[serde(default)]
    pub assumptions: Vec<Assumption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goal: Option<f64>,
    /// Savings timeline in months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_timeline: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_amount: Option<f64>,
    /// Annual interest rate in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<FormulaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_rule: Option<AllocationRule>,
}

impl Category {
    /// Create a monthly category with no assumptions
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category_type: CategoryType,
        allocation_percentage: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_type,
            display_type: DisplayType::Monthly,
            allocation_percentage,
            assumptions: Vec::new(),
            savings_goal: None,
            savings_timeline: None,
            debt_amount: None,
            debt_interest_rate: None,
            formula: None,
            allocation_rule: None,
        }
    }

    pub fn with_display_type(mut self, display_type: DisplayType) -> Self {
        self.display_type = display_type;
        self
    }

    pub fn with_assumption(mut self, title: impl Into<String>, value: impl Into<String>) -> Self {
        self.assumptions.push(Assumption::new(title, value));
        self
    }

    pub fn with_formula(mut self, formula: FormulaKind) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn with_allocation_rule(mut self, rule: AllocationRule) -> Self {
        self.allocation_rule = Some(rule);
        self
    }

    pub fn with_savings_goal(mut self, goal: f64, timeline_months: u32) -> Self {
        self.savings_goal = Some(goal);
        self.savings_timeline = Some(timeline_months);
        self
    }

    pub fn with_debt(mut self, amount: f64, interest_rate: f64) -> Self {
        self.debt_amount = Some(amount);
        self.debt_interest_rate = Some(interest_rate);
        self
    }

    /// Priority from the fixed id lookup table
    pub fn priority(&self) -> Priority {
        catalog::priority_for(&self.id)
    }

    pub fn is_custom(&self) -> bool {
        self.id.starts_with(CUSTOM_ID_PREFIX)
    }

    /// Explicit formula tag, or the default for this display type and type
    pub fn formula(&self) -> FormulaKind {
        if let Some(ref formula) = self.formula {
            return formula.clone();
        }
        match (self.display_type, self.category_type) {
            (DisplayType::Monthly, _) => FormulaKind::Monthly,
            (DisplayType::Total, CategoryType::Housing) => FormulaKind::Mortgage,
            (DisplayType::Total, CategoryType::Transportation) => FormulaKind::AutoLoan,
            (DisplayType::Total, CategoryType::Savings) => FormulaKind::SavingsGoal,
            (DisplayType::Total, CategoryType::Debt) => FormulaKind::DebtPayment,
            (DisplayType::Total, _) => FormulaKind::Annual,
        }
    }

    /// Explicit allocation rule, or the default for this type
    pub fn allocation_rule(&self) -> AllocationRule {
        if let Some(rule) = self.allocation_rule {
            return rule;
        }
        match self.category_type {
            CategoryType::Housing => AllocationRule::Housing,
            CategoryType::Debt => AllocationRule::Debt,
            _ => AllocationRule::Proportional,
        }
    }

    /// Look up an assumption by title (case-insensitive) and parse it
    pub fn assumption(&self, title: &str) -> Option<f64> {
        self.assumptions
            .iter()
            .find(|a| a.title.eq_ignore_ascii_case(title))
            .and_then(Assumption::numeric)
    }

    pub fn allocation_type(&self) -> AllocationType {
        if self.category_type == CategoryType::Savings {
            AllocationType::Savings
        } else {
            AllocationType::Expense
        }
    }
}

/// A budget line item owned by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub category_id: String,
    pub name: String,
    pub category_type: CategoryType,
    pub allocated_amount: f64,
    #[serde(default)]
    pub spent_amount: f64,
    #[serde(rename = "type")]
    pub allocation_type: AllocationType,
    pub priority: Priority,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Allocation {
    /// Create an active allocation for a category
    pub fn from_category(category: &Category, amount: f64) -> Self {
        Self {
            category_id: category.id.clone(),
            name: category.name.clone(),
            category_type: category.category_type,
            allocated_amount: amount,
            spent_amount: 0.0,
            allocation_type: category.allocation_type(),
            priority: category.priority(),
            is_active: true,
        }
    }

    /// Allocated minus spent (negative when overspent)
    pub fn remaining(&self) -> f64 {
        self.allocated_amount - self.spent_amount
    }

    pub fn is_custom(&self) -> bool {
        self.category_id.starts_with(CUSTOM_ID_PREFIX)
    }
}

/// Round to the nearest 0.1 unit
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to whole cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assumption_numeric_parsing() {
        assert_eq!(Assumption::new("Down Payment", "20%").numeric(), Some(20.0));
        assert_eq!(Assumption::new("Goal", "$12,500").numeric(), Some(12500.0));
        assert_eq!(Assumption::new("Rate", " 6.5 ").numeric(), Some(6.5));
        assert_eq!(Assumption::new("Rate", "abc").numeric(), None);
    }

    #[test]
    fn test_default_formula_from_display_and_type() {
        let home = Category::new("home", "Home", CategoryType::Housing, 0.28)
            .with_display_type(DisplayType::Total);
        assert_eq!(home.formula(), FormulaKind::Mortgage);

        let rent = Category::new("housing", "Rent", CategoryType::Housing, 0.3);
        assert_eq!(rent.formula(), FormulaKind::Monthly);

        let education = Category::new("education", "Education", CategoryType::Education, 0.03)
            .with_display_type(DisplayType::Total);
        assert_eq!(education.formula(), FormulaKind::Annual);

        let explicit = education.with_formula(FormulaKind::Custom("tuition".into()));
        assert_eq!(explicit.formula(), FormulaKind::Custom("tuition".into()));
    }

    #[test]
    fn test_formula_kind_string_form() {
        assert_eq!("auto_loan".parse::<FormulaKind>().unwrap(), FormulaKind::AutoLoan);
        assert_eq!(
            "custom:tuition".parse::<FormulaKind>().unwrap(),
            FormulaKind::Custom("tuition".into())
        );
        assert!("custom:".parse::<FormulaKind>().is_err());
        assert_eq!(
            String::from(FormulaKind::Custom("tuition".into())),
            "custom:tuition"
        );
    }

    #[test]
    fn test_allocation_rule_defaults() {
        let debt = Category::new("loans", "Loans", CategoryType::Debt, 0.05);
        assert_eq!(debt.allocation_rule(), AllocationRule::Debt);

        let food = Category::new("groceries", "Groceries", CategoryType::Food, 0.1);
        assert_eq!(food.allocation_rule(), AllocationRule::Proportional);
    }

    #[test]
    fn test_allocation_from_category() {
        let savings = Category::new("emergency_savings", "Emergency", CategoryType::Savings, 0.1);
        let alloc = Allocation::from_category(&savings, 250.0);

        assert_eq!(alloc.allocation_type, AllocationType::Savings);
        assert_eq!(alloc.priority, Priority::Essential);
        assert!(alloc.is_active);
        assert_eq!(alloc.remaining(), 250.0);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round_tenth(123.456), 123.5);
        assert_eq!(round_cents(10.005_1), 10.01);
    }
}
