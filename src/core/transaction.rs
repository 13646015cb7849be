// Transaction data structures

use crate::core::types::hex_bytes;
use crate::core::{
    Coin, Hash256, Hashable, LedgerError, Result, from_human_readable_hash, hash, is_equal_hashes,
    serialize::write_prefixed_str, to_human_readable_hash,
};
use chrono::{DateTime, SubsecRound, Utc};
use secp256k1::PublicKey;
use serde::{Serialize, Serializer};
use std::fmt;

/// Reference to an output of a previous transaction, by hash only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionOutPoint {
    #[serde(with = "hex_bytes")]
    block_hash: Vec<u8>,
    #[serde(with = "hex_bytes")]
    txn_hash: Vec<u8>,
    value: Coin,
}

impl TransactionOutPoint {
    /// Create an outpoint referencing a transaction within a block
    pub fn new(block_hash: Hash256, txn_hash: Hash256, value: Coin) -> Self {
        Self {
            block_hash: block_hash.as_bytes().to_vec(),
            txn_hash: txn_hash.as_bytes().to_vec(),
            value,
        }
    }

    /// The null outpoint: empty hashes and a zero coin, marking a coinbase source
    pub fn null() -> Self {
        Self {
            block_hash: Vec::new(),
            txn_hash: Vec::new(),
            value: Coin::zero(),
        }
    }

    /// Create an outpoint from raw hash bytes.
    ///
    /// Both hashes must be 32 bytes, or both empty with a zero value (null).
    pub fn from_slices(block_hash: &[u8], txn_hash: &[u8], value: Coin) -> Result<Self> {
        match (block_hash.len(), txn_hash.len()) {
            (0, 0) if value.is_zero() => Ok(Self::null()),
            (0, 0) => Err(LedgerError::InvalidArgument(
                "null outpoint cannot carry a value".into(),
            )),
            (32, 32) => Ok(Self {
                block_hash: block_hash.to_vec(),
                txn_hash: txn_hash.to_vec(),
                value,
            }),
            (b, t) => Err(LedgerError::InvalidArgument(format!(
                "outpoint hashes must be 32 bytes or both empty, got {} and {}",
                b, t
            ))),
        }
    }

    /// Structural null test, not identity
    pub fn is_null(&self) -> bool {
        self.block_hash.is_empty() && self.txn_hash.is_empty() && self.value.is_zero()
    }

    pub fn block_hash(&self) -> &[u8] {
        &self.block_hash
    }

    pub fn txn_hash(&self) -> &[u8] {
        &self.txn_hash
    }

    pub fn value(&self) -> Coin {
        self.value
    }
}

impl Hashable for TransactionOutPoint {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.block_hash.len() + self.txn_hash.len() + 16);
        buf.extend_from_slice(&self.block_hash);
        buf.extend_from_slice(&self.txn_hash);
        buf.extend_from_slice(&self.value.bytes());
        buf
    }
}

/// Transaction input - consumes a previous output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionInput {
    /// `None` for a coinbase input
    out_point: Option<TransactionOutPoint>,
    value: Coin,
}

impl TransactionInput {
    /// Create a new transaction input
    pub fn new(out_point: TransactionOutPoint, value: Coin) -> Self {
        Self {
            out_point: Some(out_point),
            value,
        }
    }

    /// Create a coinbase input (no previous output)
    pub fn coinbase(value: Coin) -> Self {
        Self {
            out_point: None,
            value,
        }
    }

    /// Spend the output `txn_hash` of block `block_hash`, carrying `value`
    pub fn spending(block_hash: Hash256, txn_hash: Hash256, value: Coin) -> Self {
        Self::new(TransactionOutPoint::new(block_hash, txn_hash, value), value)
    }

    pub fn out_point(&self) -> Option<&TransactionOutPoint> {
        self.out_point.as_ref()
    }

    pub fn value(&self) -> Coin {
        self.value
    }

    /// True when the input has no outpoint or the null outpoint
    pub fn has_null_out_point(&self) -> bool {
        self.out_point.as_ref().is_none_or(TransactionOutPoint::is_null)
    }
}

impl Hashable for TransactionInput {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = match &self.out_point {
            Some(out_point) => out_point.bytes(),
            None => TransactionOutPoint::null().bytes(),
        };
        buf.extend_from_slice(&self.value.bytes());
        buf
    }
}

/// Transaction output - pays a value to an address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionOutput {
    #[serde(with = "hex_bytes")]
    address: Vec<u8>,
    /// Amount in smallest units (see `Coin::units`)
    value: u64,
}

impl TransactionOutput {
    /// Create a new transaction output
    pub fn new(address: Vec<u8>, value: u64) -> Self {
        Self { address, value }
    }

    pub fn address(&self) -> &[u8] {
        &self.address
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

impl fmt::Display for TransactionOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TxOut(val={}, address={})",
            self.value,
            to_human_readable_hash(&self.address)
        )
    }
}

impl Hashable for TransactionOutput {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.address.len() + 8);
        buf.extend_from_slice(&self.address);
        buf.extend_from_slice(&self.value.to_le_bytes());
        buf
    }
}

fn serialize_public_key<S: Serializer>(
    key: &Option<PublicKey>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match key {
        Some(key) => serializer.serialize_some(&hex::encode_upper(key.serialize())),
        None => serializer.serialize_none(),
    }
}

/// Transaction
///
/// The hash is derived from the canonical bytes when the transaction is
/// built and whenever it is rehashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    timestamp: DateTime<Utc>,
    origin_address: String,
    #[serde(serialize_with = "serialize_public_key")]
    public_key: Option<PublicKey>,
    destination_address: String,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    #[serde(with = "hex_bytes")]
    signature: Vec<u8>,
    tx_hash: Hash256,
}

impl Transaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    /// Create a coinbase transaction paying `value` to a hex wallet address
    pub fn coinbase(destination: &str, value: Coin, timestamp: DateTime<Utc>) -> Result<Self> {
        let address = from_human_readable_hash(destination)?;
        Self::builder()
            .timestamp(timestamp)
            .destination_address(destination)
            .coinbase_input(value)
            .output(TransactionOutput::new(address, value.units()))
            .build()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn origin_address(&self) -> &str {
        &self.origin_address
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn destination_address(&self) -> &str {
        &self.destination_address
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn tx_hash(&self) -> Hash256 {
        self.tx_hash
    }

    /// Sum of input values minus sum of output values
    pub fn value(&self) -> Result<Coin> {
        let inputs: u128 = self.inputs.iter().map(|i| u128::from(i.value.units())).sum();
        let outputs: u128 = self.outputs.iter().map(|o| u128::from(o.value)).sum();
        let remainder = inputs.checked_sub(outputs).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "outputs ({}) exceed inputs ({})",
                outputs, inputs
            ))
        })?;
        let units = u64::try_from(remainder).map_err(|_| {
            LedgerError::InvalidArgument(format!("transaction value {} out of range", remainder))
        })?;
        Coin::from_units(units)
    }

    /// Recompute and store the transaction hash
    pub fn rehash(&mut self) -> Hash256 {
        self.tx_hash = hash(&*self);
        self.tx_hash
    }

    /// Replace the signature, producing a rehashed transaction
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self.rehash();
        self
    }

    /// Check if this is a coinbase transaction
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].has_null_out_point()
    }

    pub fn compare_hash(&self, other: &[u8]) -> bool {
        is_equal_hashes(self.tx_hash.as_bytes(), other)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tx_hash)
    }
}

impl Hashable for Transaction {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.timestamp.timestamp().to_le_bytes());
        write_prefixed_str(&mut buf, &self.origin_address);
        write_prefixed_str(&mut buf, &self.destination_address);
        if let Some(key) = &self.public_key {
            buf.extend_from_slice(&key.serialize());
        }
        buf.extend_from_slice(&self.signature);
        for input in &self.inputs {
            buf.extend_from_slice(&input.bytes());
        }
        for output in &self.outputs {
            buf.extend_from_slice(&output.bytes());
        }
        buf
    }
}

/// Staging area for a transaction; `build` validates and hashes it
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    timestamp: Option<DateTime<Utc>>,
    origin_address: String,
    public_key: Option<PublicKey>,
    destination_address: String,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    signature: Vec<u8>,
}

impl TransactionBuilder {
    /// Set the timestamp, truncated to the whole seconds that are hashed
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp.trunc_subsecs(0));
        self
    }

    pub fn origin_address(mut self, address: impl Into<String>) -> Self {
        self.origin_address = address.into();
        self
    }

    pub fn public_key(mut self, key: PublicKey) -> Self {
        self.public_key = Some(key);
        self
    }

    pub fn destination_address(mut self, address: impl Into<String>) -> Self {
        self.destination_address = address.into();
        self
    }

    pub fn input(mut self, input: TransactionInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn coinbase_input(self, value: Coin) -> Self {
        self.input(TransactionInput::coinbase(value))
    }

    pub fn inputs(mut self, inputs: impl IntoIterator<Item = TransactionInput>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    pub fn output(mut self, output: TransactionOutput) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn outputs(mut self, outputs: impl IntoIterator<Item = TransactionOutput>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    pub fn signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    pub fn build(self) -> Result<Transaction> {
        let timestamp = self.timestamp.ok_or_else(|| {
            LedgerError::InvalidArgument("transaction timestamp is required".into())
        })?;
        if self.inputs.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "transaction needs at least one input".into(),
            ));
        }
        if self.outputs.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "transaction needs at least one output".into(),
            ));
        }

        let mut tx = Transaction {
            timestamp,
            origin_address: self.origin_address,
            public_key: self.public_key,
            destination_address: self.destination_address,
            inputs: self.inputs,
            outputs: self.outputs,
            signature: self.signature,
            tx_hash: Hash256::zero(),
        };
        tx.rehash();
        log::debug!(
            "Built transaction {} ({} inputs, {} outputs)",
            tx.tx_hash,
            tx.inputs.len(),
            tx.outputs.len()
        );
        Ok(tx)
    }
}
