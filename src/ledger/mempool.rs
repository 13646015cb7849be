// Pool of submitted transactions not yet in a block

use crate::core::{Transaction, to_human_readable_hash};
use std::collections::VecDeque;

/// FIFO transaction pool
#[derive(Debug, Default)]
pub struct Mempool {
    pool: VecDeque<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Insert a transaction at the back of the pool
    pub fn put_transaction(&mut self, tx: Transaction) {
        log::debug!("New transaction added to the mempool: {}", tx);
        self.pool.push_back(tx);
    }

    pub fn put_all(&mut self, txs: impl IntoIterator<Item = Transaction>) {
        let before = self.pool.len();
        self.pool.extend(txs);
        log::debug!("{} transactions added to the mempool", self.pool.len() - before);
    }

    /// Remove and return the oldest transaction
    pub fn take_transaction(&mut self) -> Option<Transaction> {
        let tx = self.pool.pop_front();
        if tx.is_none() {
            log::debug!("Tried to take a transaction from an empty mempool");
        }
        tx
    }

    /// Remove and return up to `count` of the oldest transactions
    pub fn take_transactions(&mut self, count: usize) -> Vec<Transaction> {
        let count = count.min(self.pool.len());
        self.pool.drain(..count).collect()
    }

    /// Remove and return the first transaction matching `txn_hash`
    pub fn take_by_hash(&mut self, txn_hash: &[u8]) -> Option<Transaction> {
        log::debug!("Taking transaction {}", to_human_readable_hash(txn_hash));
        let index = self.pool.iter().position(|tx| tx.compare_hash(txn_hash))?;
        self.pool.remove(index)
    }

    /// Up to `count` of the newest transactions, newest first, without removing them
    pub fn peek_transactions(&self, count: usize) -> Vec<&Transaction> {
        self.pool.iter().rev().take(count).collect()
    }

    pub fn peek_by_hash(&self, txn_hash: &[u8]) -> Option<&Transaction> {
        self.pool.iter().find(|tx| tx.compare_hash(txn_hash))
    }
}
