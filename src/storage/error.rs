use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file exists but does not hold the expected columns or values.
    #[error("Corrupt data in {}: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        StoreError::CorruptData {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::CorruptData { .. })
    }
}
