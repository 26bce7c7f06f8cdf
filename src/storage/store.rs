use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::config::Config;
use crate::domain::{Category, Cents, Expense, format_cents, parse_cents};

use super::{BUDGET_COLUMN, EXPENSE_COLUMNS, StoreError};

const TMP_SUFFIX: &str = "tmp";

/// Date layouts accepted when reading the expense file. Dates are always
/// written as `%Y-%m-%d`.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

#[derive(Debug, Deserialize)]
struct ExpenseRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Description")]
    description: String,
}

/// Flat-file persistence for the expense ledger and the budget setting.
///
/// The two files are independent. Each save rewrites its file in full and
/// nothing is locked, so two processes sharing the same files race and the
/// last save wins.
#[derive(Debug, Clone)]
pub struct Store {
    expenses_path: PathBuf,
    budget_path: PathBuf,
}

impl Store {
    pub fn new(expenses_path: impl Into<PathBuf>, budget_path: impl Into<PathBuf>) -> Self {
        Self {
            expenses_path: expenses_path.into(),
            budget_path: budget_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.expenses_path(), config.settings_path())
    }

    pub fn expenses_path(&self) -> &Path {
        &self.expenses_path
    }

    pub fn budget_path(&self) -> &Path {
        &self.budget_path
    }

    // ========================
    // Expenses
    // ========================

    /// Load every expense. A missing file means no expenses yet.
    pub fn load_expenses(&self) -> Result<Vec<Expense>, StoreError> {
        let path = self.expenses_path.as_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no expense file yet");
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)?;

        let headers = reader
            .headers()
            .map_err(|err| read_error(path, err))?
            .clone();
        if headers.is_empty() {
            return Err(StoreError::corrupt(path, "missing header row"));
        }
        for column in EXPENSE_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(StoreError::corrupt(
                    path,
                    format!("missing column '{}'", column),
                ));
            }
        }

        let mut expenses = Vec::new();
        for (index, row) in reader.deserialize::<ExpenseRow>().enumerate() {
            let line = index + 2; // header is line 1
            let row = row.map_err(|err| read_error(path, err))?;
            let expense = parse_expense_row(row)
                .map_err(|reason| StoreError::corrupt(path, format!("line {}: {}", line, reason)))?;
            expenses.push(expense);
        }

        tracing::debug!(path = %path.display(), count = expenses.len(), "loaded expenses");
        Ok(expenses)
    }

    /// Replace the expense file with the given records.
    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<(), StoreError> {
        write_atomic(&self.expenses_path, |writer| {
            writer.write_record(EXPENSE_COLUMNS)?;
            for expense in expenses {
                writer.write_record([
                    expense.date.format("%Y-%m-%d").to_string(),
                    expense.category.as_str().to_string(),
                    format_cents(expense.amount_cents),
                    expense.description.clone(),
                ])?;
            }
            Ok(())
        })?;

        tracing::debug!(
            path = %self.expenses_path.display(),
            count = expenses.len(),
            "saved expenses"
        );
        Ok(())
    }

    /// Remove the expense file. Removing a file that is not there is fine.
    pub fn delete_all_expenses(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.expenses_path) {
            Ok(()) => {
                tracing::debug!(path = %self.expenses_path.display(), "removed expense file");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    // ========================
    // Budget
    // ========================

    /// Load the monthly budget limit. A missing file means no limit (zero).
    pub fn load_budget(&self) -> Result<Cents, StoreError> {
        let path = self.budget_path.as_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no budget file yet");
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let column = reader
            .headers()
            .map_err(|err| read_error(path, err))?
            .iter()
            .position(|h| h == BUDGET_COLUMN)
            .ok_or_else(|| {
                StoreError::corrupt(path, format!("missing column '{}'", BUDGET_COLUMN))
            })?;

        let record = match reader.records().next() {
            Some(record) => record.map_err(|err| read_error(path, err))?,
            None => return Err(StoreError::corrupt(path, "no budget value")),
        };
        let raw = record.get(column).unwrap_or_default();

        let budget = parse_cents(raw).map_err(|err| {
            StoreError::corrupt(path, format!("invalid budget '{}': {}", raw, err))
        })?;
        if budget < 0 {
            return Err(StoreError::corrupt(
                path,
                format!("negative budget '{}'", raw),
            ));
        }
        Ok(budget)
    }

    /// Replace the budget file with a single value.
    pub fn save_budget(&self, budget: Cents) -> Result<(), StoreError> {
        write_atomic(&self.budget_path, |writer| {
            writer.write_record([BUDGET_COLUMN])?;
            writer.write_record([format_cents(budget)])?;
            Ok(())
        })?;

        tracing::debug!(path = %self.budget_path.display(), budget, "saved budget");
        Ok(())
    }
}

fn parse_expense_row(row: ExpenseRow) -> Result<Expense, String> {
    let date = parse_date(&row.date).ok_or_else(|| format!("invalid date '{}'", row.date))?;
    let category: Category = row.category.parse().map_err(|err| format!("{}", err))?;
    let amount_cents = parse_cents(&row.amount)
        .map_err(|err| format!("invalid amount '{}': {}", row.amount, err))?;
    if amount_cents < 0 {
        return Err(format!("negative amount '{}'", row.amount));
    }
    Ok(Expense::new(date, category, amount_cents, row.description))
}

/// Parse a date written in any of the accepted layouts. Time components,
/// when present, are dropped.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Parse failures become `CorruptData`; failures to read the file stay I/O errors.
fn read_error(path: &Path, err: csv::Error) -> StoreError {
    if err.is_io_error() {
        StoreError::Csv(err)
    } else {
        StoreError::corrupt(path, err.to_string())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Write a CSV file next to `path`, then rename it over `path`.
fn write_atomic<F>(path: &Path, fill: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<(), csv::Error>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = tmp_path(path);
    let mut writer = csv::Writer::from_path(&tmp)?;
    let written = fill(&mut writer)
        .map_err(StoreError::from)
        .and_then(|()| writer.flush().map_err(StoreError::from));
    drop(writer);

    let result = written.and_then(|()| fs::rename(&tmp, path).map_err(StoreError::from));
    if result.is_err() {
        if let Err(err) = fs::remove_file(&tmp) {
            tracing::debug!(path = %tmp.display(), error = %err, "could not remove temp file");
        }
    }
    result
}
