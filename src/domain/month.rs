use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use super::{Cents, Expense};

/// Calendar month used to group expenses, displayed as `YYYY-MM`.
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month a date falls in; the day of month is irrelevant.
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub total: Cents,
}

/// Sum expense amounts per calendar month.
/// Only months with at least one expense appear, in ascending chronological order.
/// Sums saturate at `Cents::MAX` instead of wrapping.
pub fn monthly_totals(expenses: &[Expense]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<MonthKey, Cents> = BTreeMap::new();

    for expense in expenses {
        let total = totals.entry(expense.month()).or_insert(0);
        *total = total.saturating_add(expense.amount_cents);
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Total spent in the month containing `today`; zero when nothing was recorded.
pub fn spend_in_month(expenses: &[Expense], today: NaiveDate) -> Cents {
    let current = MonthKey::of(today);
    monthly_totals(expenses)
        .into_iter()
        .find(|t| t.month == current)
        .map(|t| t.total)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn expense(date: &str, amount_cents: Cents) -> Expense {
        Expense::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            Category::Others,
            amount_cents,
            "",
        )
    }

    #[test]
    fn test_month_key_display_pads() {
        assert_eq!(MonthKey::new(2024, 3).to_string(), "2024-03");
        assert_eq!(MonthKey::new(987, 11).to_string(), "0987-11");
    }

    #[test]
    fn test_month_key_orders_chronologically() {
        assert!(MonthKey::new(2023, 12) < MonthKey::new(2024, 1));
        assert!(MonthKey::new(2024, 2) < MonthKey::new(2024, 10));
    }

    #[test]
    fn test_monthly_totals_groups_and_sorts() {
        let expenses = vec![
            expense("2024-02-01", 1000),
            expense("2024-01-20", 3000),
            expense("2023-12-31", 700),
            expense("2024-01-15", 5000),
        ];

        let totals = monthly_totals(&expenses);
        assert_eq!(
            totals,
            vec![
                MonthlyTotal { month: MonthKey::new(2023, 12), total: 700 },
                MonthlyTotal { month: MonthKey::new(2024, 1), total: 8000 },
                MonthlyTotal { month: MonthKey::new(2024, 2), total: 1000 },
            ]
        );
    }

    #[test]
    fn test_monthly_totals_skips_empty_months() {
        let expenses = vec![expense("2024-01-05", 100), expense("2024-04-05", 100)];
        let months: Vec<String> = monthly_totals(&expenses)
            .iter()
            .map(|t| t.month.to_string())
            .collect();
        assert_eq!(months, vec!["2024-01", "2024-04"]);
    }

    #[test]
    fn test_spend_in_month() {
        let expenses = vec![expense("2024-01-05", 100), expense("2024-01-28", 250)];
        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(spend_in_month(&expenses, today), 350);

        let later = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(spend_in_month(&expenses, later), 0);
    }

    #[test]
    fn test_monthly_totals_saturate_on_huge_amounts() {
        let huge = 9_000_000_000_000_000_000;
        let expenses = vec![
            expense("2024-01-05", huge),
            expense("2024-01-06", huge),
            expense("2024-02-01", 100),
        ];

        let totals = monthly_totals(&expenses);
        assert_eq!(totals[0].total, Cents::MAX);
        assert_eq!(totals[1].total, 100);
    }

    #[test]
    fn test_month_key_serializes_as_string() {
        let json = serde_json::to_string(&MonthKey::new(2024, 3)).unwrap();
        assert_eq!(json, "\"2024-03\"");
    }
}
