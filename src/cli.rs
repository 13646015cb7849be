// CLI commands

use crate::core::{
    Block, Hash256, dhash, from_human_readable_hash, shash, to_human_readable_hash, wallet_address,
};
use crate::ledger::Ledger;
use clap::{Parser, Subcommand};
use secp256k1::PublicKey;

#[derive(Parser)]
#[command(name = "yggdrasil")]
#[command(about = "Inspect Yggdrasil ledger structures and hashes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the genesis block
    Genesis {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hash data with SHA256 and double SHA256
    Hash {
        /// Data to hash (UTF-8 text unless --hex)
        data: String,
        /// Treat data as hex-encoded bytes
        #[arg(long)]
        hex: bool,
    },

    /// Derive a wallet address from a public key
    Address {
        /// SEC1-encoded public key in hex
        public_key: String,
    },

    /// Get ledger info
    Info,

    /// Get a block by hash
    Block {
        /// Block hash in hex
        hash: String,
    },
}

/// CLI handler
pub struct CliHandler {
    ledger: Ledger,
}

impl CliHandler {
    /// Create a handler over a fresh in-memory ledger
    pub fn new() -> Result<Self, String> {
        let ledger = Ledger::new().map_err(|e| e.to_string())?;
        log::info!("Ledger initialized with {} block(s)", ledger.blockchain.len());
        Ok(Self { ledger })
    }

    /// Handle CLI command
    pub fn handle(&self, cli: Cli) -> Result<(), String> {
        match cli.command {
            Commands::Genesis { json } => self.genesis(json),
            Commands::Hash { data, hex } => Self::hash(&data, hex),
            Commands::Address { public_key } => Self::address(&public_key),
            Commands::Info => self.info(),
            Commands::Block { hash } => self.block(&hash),
        }
    }

    fn genesis(&self, json: bool) -> Result<(), String> {
        let genesis = Block::genesis().map_err(|e| e.to_string())?;
        if json {
            let text = serde_json::to_string_pretty(&genesis).map_err(|e| e.to_string())?;
            println!("{}", text);
        } else {
            self.print_block(&genesis);
        }
        Ok(())
    }

    fn hash(data: &str, is_hex: bool) -> Result<(), String> {
        let bytes = if is_hex {
            from_human_readable_hash(data).map_err(|e| e.to_string())?
        } else {
            data.as_bytes().to_vec()
        };
        println!("SHA256:  {}", to_human_readable_hash(&shash(&bytes)));
        println!("DSHA256: {}", dhash(&bytes));
        Ok(())
    }

    fn address(public_key: &str) -> Result<(), String> {
        let bytes = from_human_readable_hash(public_key).map_err(|e| e.to_string())?;
        let key = PublicKey::from_slice(&bytes).map_err(|e| format!("Invalid public key: {}", e))?;
        println!("{}", to_human_readable_hash(&wallet_address(&key)));
        Ok(())
    }

    fn info(&self) -> Result<(), String> {
        let chain = &self.ledger.blockchain;
        println!("Ledger Info:");
        println!("  Blocks: {}", chain.len());
        if let Some(tip) = chain.last_block() {
            println!("  Height: {}", tip.block_height());
            println!("  Last block: {}", tip);
        }
        println!("  Mempool: {} transaction(s)", self.ledger.mempool.len());
        Ok(())
    }

    fn block(&self, hash: &str) -> Result<(), String> {
        let hash = Hash256::from_hex(hash).map_err(|e| e.to_string())?;
        let block = self
            .ledger
            .blockchain
            .get_block(&hash)
            .ok_or_else(|| format!("Block not found: {}", hash))?;
        self.print_block(block);
        Ok(())
    }

    /// Print block information
    fn print_block(&self, block: &Block) {
        let header = block.header();
        println!("Block:");
        println!("  Hash: {}", block);
        println!("  Height: {}", block.block_height());
        println!("  Previous: {}", header.previous_block_hash());
        println!("  Merkle root: {}", header.merkle_root());
        println!("  Time: {}", header.time().to_rfc3339());
        println!("  Diff: {}", header.diff());
        println!("  Nonce: {}", header.nonce());
        println!("  Transactions: {}", block.txn_count());

        for (i, tx) in block.transactions().iter().enumerate() {
            println!("    [{}] {}", i, tx);
        }
    }
}
