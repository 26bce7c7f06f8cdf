use thiserror::Error;

use crate::domain::{Cents, format_cents};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Description is {length} characters long, the maximum is {max}")]
    DescriptionTooLong { length: usize, max: usize },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub(crate) fn non_positive_amount(amount_cents: Cents) -> Self {
        AppError::InvalidAmount(format!(
            "amount must be positive, got {}",
            format_cents(amount_cents)
        ))
    }
}
