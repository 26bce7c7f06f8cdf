use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, Cents, MonthKey};

/// Longest description accepted when recording an expense, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// A single recorded expense.
/// Expenses are immutable - the ledger only supports appending and clearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Day the money was spent
    pub date: NaiveDate,
    pub category: Category,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    /// Free-text note, possibly empty
    pub description: String,
}

impl Expense {
    pub fn new(
        date: NaiveDate,
        category: Category,
        amount_cents: Cents,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category,
            amount_cents,
            description: description.into(),
        }
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// Sort expenses newest first for display. Same-day records keep their
/// insertion order.
pub fn newest_first(expenses: &[Expense]) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
