use chrono::NaiveDate;

use crate::config::Config;
use crate::domain::{
    Category, Cents, Expense, MAX_DESCRIPTION_LEN, MonthKey, MonthlyTotal, is_over_budget,
    monthly_totals, newest_first, spend_in_month,
};
use crate::notify::Notifier;
use crate::storage::Store;

use super::{AlertStatus, AppError, Dashboard};

/// Application service holding the ledger in memory.
/// This is the primary interface for any client (CLI, web form, TUI, etc.).
///
/// Every mutation is written through to the store before it returns, so the
/// in-memory ledger and the files agree after each call.
pub struct LedgerService {
    store: Store,
    expenses: Vec<Expense>,
    budget: Cents,
}

impl LedgerService {
    /// Load the full ledger from the store.
    pub fn open(store: Store) -> Result<Self, AppError> {
        let expenses = store.load_expenses()?;
        let budget = store.load_budget()?;
        tracing::debug!(expenses = expenses.len(), budget, "ledger loaded");
        Ok(Self {
            store,
            expenses,
            budget,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::open(Store::from_config(config))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Discard the in-memory ledger and read it again from the store.
    pub fn reload(&mut self) -> Result<(), AppError> {
        self.expenses = self.store.load_expenses()?;
        self.budget = self.store.load_budget()?;
        Ok(())
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense and persist the whole collection.
    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        category: Category,
        amount_cents: Cents,
        description: impl Into<String>,
    ) -> Result<Expense, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::non_positive_amount(amount_cents));
        }

        let description = description.into();
        let length = description.chars().count();
        if length > MAX_DESCRIPTION_LEN {
            return Err(AppError::DescriptionTooLong {
                length,
                max: MAX_DESCRIPTION_LEN,
            });
        }

        let expense = Expense::new(date, category, amount_cents, description);
        self.expenses.push(expense.clone());

        if let Err(err) = self.store.save_expenses(&self.expenses) {
            // Keep memory in line with what is on disk
            self.expenses.pop();
            return Err(err.into());
        }

        tracing::info!(
            date = %expense.date,
            category = %expense.category,
            amount_cents = expense.amount_cents,
            "expense added"
        );
        Ok(expense)
    }

    /// Remove every expense. The expense file is left header-only.
    ///
    /// Memory is cleared before the store is touched, so a failure part way
    /// through can never bring the deleted records back on a later save.
    pub fn delete_all(&mut self) -> Result<(), AppError> {
        let removed = self.expenses.len();
        self.expenses.clear();

        self.store.delete_all_expenses()?;
        self.store.save_expenses(&[])?;

        tracing::info!(removed, "all expenses deleted");
        Ok(())
    }

    /// All expenses in insertion order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// All expenses, most recent date first.
    pub fn expenses_newest_first(&self) -> Vec<&Expense> {
        newest_first(&self.expenses)
    }

    // ========================
    // Budget operations
    // ========================

    /// Monthly limit in cents; zero means no budget is configured.
    pub fn budget(&self) -> Cents {
        self.budget
    }

    pub fn set_budget(&mut self, budget: Cents) -> Result<(), AppError> {
        if budget < 0 {
            return Err(AppError::InvalidBudget(
                "budget cannot be negative".to_string(),
            ));
        }

        self.store.save_budget(budget)?;
        self.budget = budget;
        tracing::info!(budget, "monthly budget updated");
        Ok(())
    }

    // ========================
    // Reporting
    // ========================

    /// Totals per month, oldest first. Months without expenses are absent.
    pub fn monthly_totals(&self) -> Vec<MonthlyTotal> {
        monthly_totals(&self.expenses)
    }

    /// Spending in the month containing `today`.
    pub fn current_month_spend(&self, today: NaiveDate) -> Cents {
        spend_in_month(&self.expenses, today)
    }

    pub fn is_over_budget(spend: Cents, limit: Cents) -> bool {
        is_over_budget(spend, limit)
    }

    /// Build the summary view for `today`.
    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let monthly_totals = self.monthly_totals();
        let current_month = MonthKey::of(today);
        let current_month_spend = monthly_totals
            .iter()
            .find(|t| t.month == current_month)
            .map(|t| t.total)
            .unwrap_or(0);

        Dashboard {
            monthly_totals,
            current_month,
            current_month_spend,
            budget: self.budget,
            over_budget: is_over_budget(current_month_spend, self.budget),
        }
    }

    /// Build the summary view and, when over budget, send one alert.
    ///
    /// Each call that finds the ledger over budget notifies again. A failed
    /// delivery is reported in the returned status and never touches the ledger.
    pub fn render_dashboard(
        &self,
        today: NaiveDate,
        notifier: Option<&dyn Notifier>,
    ) -> (Dashboard, AlertStatus) {
        let dashboard = self.dashboard(today);
        if !dashboard.over_budget {
            return (dashboard, AlertStatus::NotTriggered);
        }

        let status = match notifier {
            None => {
                tracing::warn!(
                    spend = dashboard.current_month_spend,
                    budget = dashboard.budget,
                    "over budget but no notifier is configured"
                );
                AlertStatus::Disabled
            }
            Some(notifier) => match notifier.notify(dashboard.current_month_spend) {
                Ok(()) => AlertStatus::Sent,
                Err(err) => {
                    tracing::warn!(error = %err, "budget alert delivery failed");
                    AlertStatus::Failed(err.to_string())
                }
            },
        };
        (dashboard, status)
    }
}
