// In-memory block index

use crate::core::{Block, Hash256, LedgerError, Result, Transaction};
use std::collections::HashMap;

/// Blocks indexed by hash, in insertion order, with the last accepted block as tip
#[derive(Debug, Default)]
pub struct Blockchain {
    blocks: HashMap<Hash256, Block>,
    order: Vec<Hash256>,
}

impl Blockchain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain holding only `genesis`
    pub fn with_genesis(genesis: Block) -> Result<Self> {
        let mut chain = Self::new();
        chain.add_block(genesis)?;
        Ok(chain)
    }

    /// Index a block.
    ///
    /// A genesis block is accepted only into an empty chain. Any other block
    /// must reference an indexed parent and sit one above it.
    pub fn add_block(&mut self, block: Block) -> Result<()> {
        let hash = block.block_hash();
        if self.blocks.contains_key(&hash) {
            log::warn!("Rejected duplicate block {}", hash);
            return Err(LedgerError::DuplicateBlock(hash));
        }

        if block.is_genesis() {
            if !self.blocks.is_empty() {
                log::warn!("Rejected second genesis block {}", hash);
                return Err(LedgerError::InvalidArgument(
                    "chain already has a genesis block".into(),
                ));
            }
        } else {
            let parent_hash = block.header().previous_block_hash();
            let parent = self.blocks.get(&parent_hash).ok_or_else(|| {
                log::warn!("Rejected block {}: unknown parent {}", hash, parent_hash);
                LedgerError::UnknownParent(parent_hash)
            })?;
            if block.block_height() != parent.block_height() + 1 {
                log::warn!(
                    "Rejected block {}: height {} after parent height {}",
                    hash,
                    block.block_height(),
                    parent.block_height()
                );
                return Err(LedgerError::InvalidArgument(format!(
                    "block height {} does not follow parent height {}",
                    block.block_height(),
                    parent.block_height()
                )));
            }
        }

        log::info!("New tip {} at height {}", hash, block.block_height());
        self.blocks.insert(hash, block);
        self.order.push(hash);
        Ok(())
    }

    /// Get a block by hash
    pub fn get_block(&self, hash: &Hash256) -> Option<&Block> {
        self.blocks.get(hash)
    }

    /// The most recently accepted block
    pub fn last_block(&self) -> Option<&Block> {
        self.order.last().and_then(|hash| self.blocks.get(hash))
    }

    /// Up to `limit` blocks, most recent first
    pub fn blocks(&self, limit: usize) -> Vec<&Block> {
        self.order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|hash| self.blocks.get(hash))
            .collect()
    }

    /// Number of indexed blocks
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Height of the tip, if any
    pub fn height(&self) -> Option<u64> {
        self.last_block().map(Block::block_height)
    }

    /// First matching transaction across blocks, oldest block first
    pub fn find_transaction(&self, txn_hash: &[u8]) -> Result<(&Block, &Transaction)> {
        self.order
            .iter()
            .filter_map(|hash| self.blocks.get(hash))
            .find_map(|block| block.find_transaction(txn_hash).ok().map(|tx| (block, tx)))
            .ok_or_else(|| {
                LedgerError::NotFound(format!("transaction {}", hex::encode_upper(txn_hash)))
            })
    }
}
