// Block data structures

use crate::core::serialize::take_array;
use crate::core::{
    Coin, Hash256, Hashable, LedgerError, Result, Transaction, hash, is_equal_hashes, merkle_root,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::fmt;

/// Wallet address paid by the genesis coinbase
pub const GENESIS_ADDRESS: &str = "6ad28d3fda4e10bdc0aaf7112f7818e181defa7e";
/// 2021-07-07T00:00:00Z
pub const GENESIS_TIMESTAMP: i64 = 1_625_616_000;
pub const GENESIS_VERSION: i32 = 0x010;
pub const GENESIS_DIFFICULTY: i32 = 4;
pub const GENESIS_REWARD_WHOLE: u64 = 50;

/// Serialized header length: version, two hashes, timestamp, diff, nonce
pub const HEADER_SIZE: usize = 4 + 32 + 32 + 8 + 4 + 4;

/// Block header - 84 bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    version: i32,
    previous_block_hash: Hash256,
    merkle_root: Hash256,
    time: DateTime<Utc>,
    diff: i32,
    nonce: i32,
}

impl BlockHeader {
    pub fn builder() -> BlockHeaderBuilder {
        BlockHeaderBuilder::default()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn previous_block_hash(&self) -> Hash256 {
        self.previous_block_hash
    }

    pub fn merkle_root(&self) -> Hash256 {
        self.merkle_root
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn epoch_time(&self) -> i64 {
        self.time.timestamp()
    }

    pub fn diff(&self) -> i32 {
        self.diff
    }

    pub fn nonce(&self) -> i32 {
        self.nonce
    }

    /// Genesis headers have no previous block
    pub fn is_genesis(&self) -> bool {
        self.previous_block_hash.is_zero()
    }

    /// Deserialize a block header
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != HEADER_SIZE {
            return Err(LedgerError::Malformed(format!(
                "block header must be {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }

        let mut cursor = data;
        let version = i32::from_le_bytes(take_array(&mut cursor, "version")?);
        let previous_block_hash = Hash256::new(take_array(&mut cursor, "previous block hash")?);
        let merkle_root = Hash256::new(take_array(&mut cursor, "merkle root")?);
        let epoch = i64::from_le_bytes(take_array(&mut cursor, "time")?);
        let time = DateTime::from_timestamp(epoch, 0)
            .ok_or_else(|| LedgerError::Malformed(format!("timestamp {} out of range", epoch)))?;
        let diff = i32::from_le_bytes(take_array(&mut cursor, "diff")?);
        let nonce = i32::from_le_bytes(take_array(&mut cursor, "nonce")?);

        Ok(Self {
            version,
            previous_block_hash,
            merkle_root,
            time,
            diff,
            nonce,
        })
    }
}

impl Hashable for BlockHeader {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(self.previous_block_hash.as_bytes());
        buf.extend_from_slice(self.merkle_root.as_bytes());
        buf.extend_from_slice(&self.time.timestamp().to_le_bytes());
        buf.extend_from_slice(&self.diff.to_le_bytes());
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf
    }
}

/// Staging area for a block header
#[derive(Debug, Clone, Default)]
pub struct BlockHeaderBuilder {
    version: i32,
    previous_block_hash: Option<Hash256>,
    merkle_root: Option<Hash256>,
    time: Option<DateTime<Utc>>,
    diff: i32,
    nonce: i32,
}

impl BlockHeaderBuilder {
    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn previous_block_hash(mut self, hash: Hash256) -> Self {
        self.previous_block_hash = Some(hash);
        self
    }

    /// Mark this as a genesis header (zero previous hash)
    pub fn genesis(self) -> Self {
        self.previous_block_hash(Hash256::zero())
    }

    pub fn merkle_root(mut self, root: Hash256) -> Self {
        self.merkle_root = Some(root);
        self
    }

    /// Set the header time, truncated to whole seconds
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time.trunc_subsecs(0));
        self
    }

    pub fn diff(mut self, diff: i32) -> Self {
        self.diff = diff;
        self
    }

    pub fn nonce(mut self, nonce: i32) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn build(self) -> Result<BlockHeader> {
        let previous_block_hash = self.previous_block_hash.ok_or_else(|| {
            LedgerError::InvalidArgument(
                "previous block hash is required for non-genesis headers".into(),
            )
        })?;
        let merkle_root = self
            .merkle_root
            .ok_or_else(|| LedgerError::InvalidArgument("merkle root is required".into()))?;
        let time = self
            .time
            .ok_or_else(|| LedgerError::InvalidArgument("header time is required".into()))?;

        Ok(BlockHeader {
            version: self.version,
            previous_block_hash,
            merkle_root,
            time,
            diff: self.diff,
            nonce: self.nonce,
        })
    }
}

/// Block - header, height and transactions.
///
/// The block hash is the hash of the header alone; transactions are
/// committed through the header's Merkle root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    header: BlockHeader,
    block_height: u64,
    transactions: Vec<Transaction>,
    block_hash: Hash256,
}

impl Block {
    pub fn builder() -> BlockBuilder {
        BlockBuilder::default()
    }

    /// Create the genesis block
    pub fn genesis() -> Result<Self> {
        let time = DateTime::from_timestamp(GENESIS_TIMESTAMP, 0).ok_or_else(|| {
            LedgerError::InvalidArgument("genesis timestamp out of range".into())
        })?;
        let reward = Coin::new(GENESIS_REWARD_WHOLE, 0)?;
        let coinbase = Transaction::coinbase(GENESIS_ADDRESS, reward, time)?;
        let transactions = vec![coinbase];

        let header = BlockHeader::builder()
            .version(GENESIS_VERSION)
            .genesis()
            .merkle_root(merkle_root(&transactions)?)
            .time(time)
            .diff(GENESIS_DIFFICULTY)
            .nonce(0)
            .build()?;

        Self::builder()
            .header(header)
            .block_height(0)
            .transactions(transactions)
            .build()
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn block_hash(&self) -> Hash256 {
        self.block_hash
    }

    /// First transaction whose hash matches `txn_hash`
    pub fn find_transaction(&self, txn_hash: &[u8]) -> Result<&Transaction> {
        self.transactions
            .iter()
            .find(|tx| tx.compare_hash(txn_hash))
            .ok_or_else(|| {
                LedgerError::NotFound(format!(
                    "transaction {} in block {}",
                    hex::encode_upper(txn_hash),
                    self.block_hash
                ))
            })
    }

    pub fn txn_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn compare_hash(&self, other: &[u8]) -> bool {
        is_equal_hashes(self.block_hash.as_bytes(), other)
    }

    pub fn is_genesis(&self) -> bool {
        self.header.is_genesis()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.block_hash)
    }
}

impl Hashable for Block {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(self.block_hash.as_bytes());
        buf.extend_from_slice(&self.block_height.to_le_bytes());
        for tx in &self.transactions {
            buf.extend_from_slice(&tx.bytes());
        }
        buf.extend_from_slice(&self.header.bytes());
        buf
    }
}

/// Staging area for a block; `build` validates before freezing
#[derive(Debug, Clone, Default)]
pub struct BlockBuilder {
    header: Option<BlockHeader>,
    block_height: u64,
    transactions: Vec<Transaction>,
}

impl BlockBuilder {
    pub fn header(mut self, header: BlockHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub fn block_height(mut self, height: u64) -> Self {
        self.block_height = height;
        self
    }

    pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn build(self) -> Result<Block> {
        let header = self
            .header
            .ok_or_else(|| LedgerError::InvalidArgument("block header is required".into()))?;
        if self.transactions.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "block needs at least one transaction".into(),
            ));
        }
        if header.is_genesis() != (self.block_height == 0) {
            return Err(LedgerError::InvalidArgument(format!(
                "height {} inconsistent with previous hash {}",
                self.block_height, header.previous_block_hash
            )));
        }
        let root = merkle_root(&self.transactions)?;
        if root != header.merkle_root {
            return Err(LedgerError::InvalidArgument(format!(
                "header merkle root {} does not match transactions ({})",
                header.merkle_root, root
            )));
        }

        let block_hash = hash(&header);
        log::debug!(
            "Built block {} at height {} with {} transactions",
            block_hash,
            self.block_height,
            self.transactions.len()
        );
        Ok(Block {
            header,
            block_height: self.block_height,
            transactions: self.transactions,
            block_hash,
        })
    }
}
