// In-memory ledger state: indexed blocks and pending transactions

mod blockchain;
mod mempool;

pub use blockchain::Blockchain;
pub use mempool::Mempool;

use crate::core::{Block, Result};

/// Ledger state handed explicitly to callers
#[derive(Debug)]
pub struct Ledger {
    pub blockchain: Blockchain,
    pub mempool: Mempool,
}

impl Ledger {
    /// Create a ledger seeded with the genesis block and an empty mempool
    pub fn new() -> Result<Self> {
        let blockchain = Blockchain::with_genesis(Block::genesis()?)?;

        Ok(Self {
            blockchain,
            mempool: Mempool::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger() {
        let ledger = Ledger::new().unwrap();
        assert_eq!(ledger.blockchain.height(), Some(0));
        assert!(ledger.blockchain.last_block().unwrap().is_genesis());
        assert!(ledger.mempool.is_empty());
    }
}
