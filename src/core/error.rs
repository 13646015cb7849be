// Ledger error types

use crate::core::Hash256;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value violates a construction-time invariant
    InvalidArgument(String),
    /// A lookup by hash found nothing
    NotFound(String),
    /// Bytes or text that do not parse into a fixed-layout field
    Malformed(String),
    /// The block is already indexed
    DuplicateBlock(Hash256),
    /// The block's previous hash is not indexed
    UnknownParent(Hash256),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LedgerError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            LedgerError::NotFound(what) => write!(f, "Not found: {}", what),
            LedgerError::Malformed(msg) => write!(f, "Malformed input: {}", msg),
            LedgerError::DuplicateBlock(hash) => write!(f, "Duplicate block: {}", hash),
            LedgerError::UnknownParent(hash) => write!(f, "Previous block not found: {}", hash),
        }
    }
}

impl std::error::Error for LedgerError {}
