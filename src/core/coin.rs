// Fixed-point monetary value

use crate::core::serialize::take_array;
use crate::core::{Hashable, LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound for the whole part of a coin
pub const COIN: u64 = 100_000_000;
/// Upper bound for the partial part; also the number of smallest units per whole coin
pub const CENT: u64 = 1_000_000;

/// Coin value as whole and partial units.
///
/// Serializes to 16 bytes: `whole` then `partial`, both little-endian u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCoin")]
pub struct Coin {
    whole: u64,
    partial: u64,
}

#[derive(Deserialize)]
struct RawCoin {
    whole: u64,
    partial: u64,
}

impl TryFrom<RawCoin> for Coin {
    type Error = LedgerError;

    fn try_from(raw: RawCoin) -> Result<Self> {
        Coin::new(raw.whole, raw.partial)
    }
}

impl Coin {
    /// Create a coin, failing if either part is out of range
    pub fn new(whole: u64, partial: u64) -> Result<Self> {
        if whole > COIN {
            return Err(LedgerError::InvalidArgument(format!(
                "coin whole part {} exceeds {}",
                whole, COIN
            )));
        }
        if partial > CENT {
            return Err(LedgerError::InvalidArgument(format!(
                "coin partial part {} exceeds {}",
                partial, CENT
            )));
        }
        Ok(Self { whole, partial })
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn whole(&self) -> u64 {
        self.whole
    }

    pub fn partial(&self) -> u64 {
        self.partial
    }

    pub fn is_zero(&self) -> bool {
        self.whole == 0 && self.partial == 0
    }

    /// Value in smallest units.
    ///
    /// A full partial part equals one whole, so `Coin(0, CENT)` and
    /// `Coin(1, 0)` carry the same value.
    pub fn units(&self) -> u64 {
        self.whole * CENT + self.partial
    }

    /// Split a smallest-unit amount back into a coin.
    ///
    /// The result has `partial < CENT` except at the top of the range, where
    /// one whole is carried back into the partial part so that `Coin(COIN, CENT)`
    /// stays representable.
    pub fn from_units(units: u64) -> Result<Self> {
        let (whole, partial) = (units / CENT, units % CENT);
        if whole == COIN + 1 && partial == 0 {
            return Self::new(COIN, CENT);
        }
        Self::new(whole, partial)
    }

    /// Parse the 16-byte canonical form
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != 16 {
            return Err(LedgerError::Malformed(format!(
                "coin must be 16 bytes, got {}",
                data.len()
            )));
        }
        let mut cursor = data;
        let whole = u64::from_le_bytes(take_array(&mut cursor, "coin whole")?);
        let partial = u64::from_le_bytes(take_array(&mut cursor, "coin partial")?);
        Self::new(whole, partial).map_err(|e| LedgerError::Malformed(e.to_string()))
    }
}

impl Hashable for Coin {
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        buf.extend_from_slice(&self.whole.to_le_bytes());
        buf.extend_from_slice(&self.partial.to_le_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_bounds() {
        assert!(Coin::new(0, 0).is_ok());
        assert!(Coin::new(COIN, CENT).is_ok());
        assert!(matches!(
            Coin::new(100_000_001, 0),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            Coin::new(0, 1_000_001),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_coin_bytes_layout() {
        let coin = Coin::new(50, 25).unwrap();
        let bytes = coin.bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..8], &50u64.to_le_bytes());
        assert_eq!(&bytes[8..], &25u64.to_le_bytes());
        assert_eq!(Coin::from_bytes(&bytes).unwrap(), coin);
    }

    #[test]
    fn test_coin_from_bytes_rejects_bad_input() {
        assert!(matches!(
            Coin::from_bytes(&[0u8; 15]),
            Err(LedgerError::Malformed(_))
        ));

        let mut bytes = Coin::zero().bytes();
        bytes[..8].copy_from_slice(&(COIN + 1).to_le_bytes());
        assert!(matches!(
            Coin::from_bytes(&bytes),
            Err(LedgerError::Malformed(_))
        ));
    }

    #[test]
    fn test_units() {
        let coin = Coin::new(3, 500).unwrap();
        assert_eq!(coin.units(), 3 * CENT + 500);
        assert_eq!(Coin::from_units(coin.units()).unwrap(), coin);
        assert!(Coin::from_units((COIN + 1) * CENT + 1).is_err());
    }

    #[test]
    fn test_units_carry() {
        let full_partial = Coin::new(0, CENT).unwrap();
        let one = Coin::new(1, 0).unwrap();
        assert_eq!(full_partial.units(), one.units());
        assert_eq!(Coin::from_units(full_partial.units()).unwrap(), one);

        let max = Coin::new(COIN, CENT).unwrap();
        assert_eq!(Coin::from_units(max.units()).unwrap(), max);
    }

    #[test]
    fn test_sampled_values_round_trip() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let (whole, partial) = (rng.gen_range(0..=COIN), rng.gen_range(0..=CENT));
            let coin = Coin::new(whole, partial).unwrap();
            let bytes = coin.bytes();
            assert_eq!(&bytes[..8], &whole.to_le_bytes());
            assert_eq!(&bytes[8..], &partial.to_le_bytes());
            assert_eq!(Coin::from_bytes(&bytes).unwrap(), coin);
        }
    }

    #[test]
    fn test_coin_json_validates() {
        let coin: Coin = serde_json::from_str(r#"{"whole":1,"partial":2}"#).unwrap();
        assert_eq!(coin, Coin::new(1, 2).unwrap());
        assert!(serde_json::from_str::<Coin>(r#"{"whole":100000001,"partial":0}"#).is_err());
    }
}
