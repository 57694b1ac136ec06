use crate::assignment::AssignmentMode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Stable identity of a person. Opaque string; hosts generate it and pass it
/// inside actions so reducers stay pure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

/// Stable identity of an expense line
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Fresh random identifier (UUID v4)
            pub fn generate() -> Self {
                $name(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_id!(PersonId);
impl_id!(ExpenseId);

// ============================================================================
// MODES
// ============================================================================

/// How "covered" is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Covered = sum of the engine's equal-split shares
    #[default]
    Equally,
    /// Covered = sum of the manually entered per-person amounts
    Amounts,
}

/// How an expense's entered price is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Price is the line total, divided among assignees
    #[default]
    Total,
    /// Price is per assignee; line cost = price × assignee count
    Each,
}

impl PricingMode {
    /// Short label shown next to a price ("tot" / "ea")
    pub fn label(&self) -> &'static str {
        match self {
            PricingMode::Total => "tot",
            PricingMode::Each => "ea",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Editing the split
    #[default]
    Consumption,
    /// Running the settle-up flow
    Settle,
}

// ============================================================================
// ENTITIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,

    #[serde(default)]
    pub name: String,

    /// Manual-mode entry; may be empty or unparsable
    #[serde(default)]
    pub amount: String,
}

impl Person {
    pub fn new(id: PersonId) -> Self {
        Person {
            id,
            name: String::new(),
            amount: String::new(),
        }
    }

    pub fn named(id: PersonId, name: &str) -> Self {
        Person {
            id,
            name: name.to_string(),
            amount: String::new(),
        }
    }

    /// Avatar initial: first letter of the name, "?" when unnamed
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "Unnamed"
        } else {
            trimmed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,

    #[serde(default)]
    pub description: String,

    /// Entered price; may be empty or unparsable
    #[serde(default)]
    pub price: String,

    /// Per-expense override of the global pricing mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_mode: Option<PricingMode>,
}

impl Expense {
    pub fn new(id: ExpenseId, price: &str) -> Self {
        Expense {
            id,
            description: String::new(),
            price: price.to_string(),
            pricing_mode: None,
        }
    }

    pub fn display_name(&self) -> &str {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            "Untitled"
        } else {
            trimmed
        }
    }
}

// ============================================================================
// STATE SNAPSHOT
// ============================================================================

/// Names of the roster a fresh session starts with
pub const SAMPLE_ROSTER: [&str; 4] = ["Rus", "Don", "Art", "Faz"];

/// The authoritative snapshot a host owns and hands to the engine.
///
/// Assignment sequences are ordered `Vec`s, not sets: the remainder cent of
/// an equal split lands on the last id in the sequence, so insertion order is
/// observable in the computed shares.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitState {
    #[serde(default)]
    pub people: Vec<Person>,

    #[serde(default)]
    pub expenses: Vec<Expense>,

    /// Used only while there are no expenses
    #[serde(default)]
    pub manual_total: String,

    #[serde(default)]
    pub assignments: BTreeMap<ExpenseId, Vec<PersonId>>,

    #[serde(default)]
    pub split_mode: SplitMode,

    #[serde(default)]
    pub pricing_mode: PricingMode,

    #[serde(default)]
    pub assignment_mode: AssignmentMode,

    #[serde(default)]
    pub view_mode: ViewMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<PersonId>,
}

impl SplitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty bill with one person per name (random ids)
    pub fn with_roster<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SplitState {
            people: names
                .into_iter()
                .map(|name| Person::named(PersonId::generate(), name.as_ref()))
                .collect(),
            ..Self::default()
        }
    }

    /// The four-person sample roster with ids "1".."4"
    pub fn sample() -> Self {
        SplitState {
            people: SAMPLE_ROSTER
                .iter()
                .enumerate()
                .map(|(i, name)| Person::named(PersonId::from((i + 1).to_string()), name))
                .collect(),
            ..Self::default()
        }
    }

    /// Item mode: at least one expense exists and the manual total is ignored
    pub fn has_items(&self) -> bool {
        !self.expenses.is_empty()
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    pub fn contains_person(&self, id: &PersonId) -> bool {
        self.person(id).is_some()
    }

    pub fn contains_expense(&self, id: &ExpenseId) -> bool {
        self.expense(id).is_some()
    }

    pub fn person_ids(&self) -> Vec<PersonId> {
        self.people.iter().map(|p| p.id.clone()).collect()
    }

    /// Assignment sequence of an expense, in insertion order
    pub fn assignees(&self, expense_id: &ExpenseId) -> &[PersonId] {
        self.assignments
            .get(expense_id)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_assigned(&self, expense_id: &ExpenseId, person_id: &PersonId) -> bool {
        self.assignees(expense_id).contains(person_id)
    }

    /// Per-expense override if set, else the global pricing mode
    pub fn effective_pricing_mode(&self, expense: &Expense) -> PricingMode {
        expense.pricing_mode.unwrap_or(self.pricing_mode)
    }

    /// Number of expenses a person is assigned to
    pub fn item_count(&self, person_id: &PersonId) -> usize {
        self.expenses
            .iter()
            .filter(|e| self.is_assigned(&e.id, person_id))
            .count()
    }

    /// Whether every person is in the expense's sequence
    pub fn all_people_assigned(&self, expense_id: &ExpenseId) -> bool {
        self.assignees(expense_id).len() == self.people.len()
    }

    /// Whether the person is in every expense's sequence
    pub fn assigned_to_all_expenses(&self, person_id: &PersonId) -> bool {
        self.expenses
            .iter()
            .all(|e| self.is_assigned(&e.id, person_id))
    }

    pub fn payer(&self) -> Option<&Person> {
        self.payer_id.as_ref().and_then(|id| self.person(id))
    }

    /// SHA-256 of the canonical JSON snapshot.
    /// Identical snapshots always hash identically, so hosts can memoize
    /// engine results on it.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================
