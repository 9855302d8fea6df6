use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Expense store {} is corrupt: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Failed to read expense store {}", .path.display())]
    StoreRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write expense store {}", .path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Sum of expense amounts is too large to represent")]
    TotalOverflow,

    #[error("Expense store is locked by another process (remove {} if it is stale)", .path.display())]
    StoreLocked { path: PathBuf },
}

impl LedgerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
