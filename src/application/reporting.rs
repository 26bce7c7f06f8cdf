use serde::Serialize;

use crate::domain::{Cents, MonthKey, MonthlyTotal};

/// Everything a presentation layer needs to draw the summary view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Totals per month with at least one expense, oldest first
    pub monthly_totals: Vec<MonthlyTotal>,
    pub current_month: MonthKey,
    pub current_month_spend: Cents,
    /// Monthly limit; zero when no budget is configured
    pub budget: Cents,
    pub over_budget: bool,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.monthly_totals.is_empty()
    }

    /// Budget left this month, `None` when no budget is configured.
    pub fn remaining(&self) -> Option<Cents> {
        (self.budget > 0).then(|| self.budget.saturating_sub(self.current_month_spend))
    }
}

/// What happened to the budget alert during a dashboard render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum AlertStatus {
    /// Spending is within budget, or no budget is configured
    NotTriggered,
    Sent,
    /// Over budget, but no notifier is configured
    Disabled,
    /// Over budget and delivery failed; ledger data is unaffected
    Failed(String),
}

impl AlertStatus {
    pub fn is_triggered(&self) -> bool {
        !matches!(self, AlertStatus::NotTriggered)
    }
}
