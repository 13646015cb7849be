// Ledger data model and hashing engine

mod types;
mod error;
mod coin;
mod transaction;
mod block;
mod merkle;
mod hash;
pub mod serialize;

pub use types::*;
pub use error::*;
pub use coin::*;
pub use transaction::*;
pub use block::*;
pub use merkle::*;
pub use hash::*;
pub use serialize::Hashable;
