// Yggdrasil ledger core
// Canonical data model and hashing engine for a ledger node

pub mod core;
pub mod ledger;
pub mod cli;

// Re-exports for convenience
pub use crate::core::{
    Block, BlockHeader, Coin, Hash256, Hashable, LedgerError, Transaction, TransactionInput,
    TransactionOutPoint, TransactionOutput,
};
pub use crate::ledger::{Blockchain, Ledger, Mempool};
pub use crate::cli::{Cli, CliHandler};
