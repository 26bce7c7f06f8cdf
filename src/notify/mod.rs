mod smtp;

use thiserror::Error;

use crate::domain::{Cents, format_money};

pub use smtp::SmtpNotifier;

pub const ALERT_SUBJECT: &str = "Monthly Budget Limit Exceeded!";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid mail address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Failed to build alert message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Mail transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Delivers the over-budget alert. Implementations send one message per call;
/// there is no retry and no deduplication.
pub trait Notifier {
    fn notify(&self, spend: Cents) -> Result<(), DeliveryError>;
}

/// Plain-text alert content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    pub fn budget_exceeded(currency_symbol: &str, spend: Cents) -> Self {
        Self {
            subject: ALERT_SUBJECT.to_string(),
            body: format!(
                "You have exceeded your monthly budget. Your total spending this month is {}.",
                format_money(currency_symbol, spend)
            ),
        }
    }
}
