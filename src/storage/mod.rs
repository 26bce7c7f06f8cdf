mod error;
mod store;

pub use error::*;
pub use store::*;

/// Column headers of the expense file, in the order they are written.
pub const EXPENSE_COLUMNS: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// Single column header of the budget settings file.
pub const BUDGET_COLUMN: &str = "Budget";
