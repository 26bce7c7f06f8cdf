// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::cell::RefCell;

use anyhow::Result;
use chrono::NaiveDate;
use expenso::application::LedgerService;
use expenso::domain::Cents;
use expenso::notify::{DeliveryError, Notifier};
use expenso::storage::Store;
use tempfile::TempDir;

/// Store over two files inside a temporary directory
pub fn test_store(temp_dir: &TempDir) -> Store {
    Store::new(
        temp_dir.path().join("expenses.csv"),
        temp_dir.path().join("settings.csv"),
    )
}

/// Helper to create a test service over an empty temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(test_store(&temp_dir))?;
    Ok((service, temp_dir))
}

/// Helper to parse a YYYY-MM-DD string
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Notifier double that records every alert instead of sending mail
#[derive(Default)]
pub struct RecordingNotifier {
    pub calls: RefCell<Vec<Cents>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Cents> {
        self.calls.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, spend: Cents) -> Result<(), DeliveryError> {
        self.calls.borrow_mut().push(spend);
        if self.fail {
            let address = "nobody";
            return Err(DeliveryError::InvalidAddress {
                address: address.to_string(),
                source: address
                    .parse::<lettre::message::Mailbox>()
                    .unwrap_err(),
            });
        }
        Ok(())
    }
}
