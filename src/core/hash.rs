// Hashing utilities for the ledger

use crate::core::{Hash256, Hashable, LedgerError, Result};
use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// Identity hash of a ledger item: dhash of its canonical bytes
pub fn hash<T: Hashable + ?Sized>(item: &T) -> Hash256 {
    dhash(&item.bytes())
}

/// Single SHA256 hash
pub fn shash(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA256 double hash
/// dhash = SHA256(SHA256(data))
pub fn dhash(data: &[u8]) -> Hash256 {
    Hash256::new(shash(&shash(data)))
}

/// RIPEMD160(SHA256(pubkey)) - shortened wallet address
pub fn wallet_address(public_key: &PublicKey) -> [u8; 20] {
    let sha = shash(&public_key.serialize());
    Ripemd160::digest(sha).into()
}

/// Uppercase hex of a digest, for display
pub fn to_human_readable_hash(hash: &[u8]) -> String {
    hex::encode_upper(hash)
}

/// Parse the hex form of a digest
pub fn from_human_readable_hash(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str)
        .map_err(|e| LedgerError::Malformed(format!("invalid hex hash {:?}: {}", hex_str, e)))
}

/// Byte-wise equality; differing lengths are simply unequal
pub fn is_equal_hashes(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// Three-way comparison over the shared prefix of two digests.
///
/// `None` sorts before any digest. Digests whose shared prefix matches
/// compare equal even when their lengths differ.
pub fn compare_hashes(a: Option<&[u8]>, b: Option<&[u8]>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .iter()
            .zip(b)
            .map(|(x, y)| x.cmp(y))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{Secp256k1, SecretKey};

    #[test]
    fn test_dhash_is_shash_twice() {
        for data in [&b""[..], &b"hello world"[..], &[0u8; 100][..]] {
            assert_eq!(dhash(data).as_bytes(), &shash(&shash(data)));
        }
    }

    #[test]
    fn test_shash_known_vector() {
        assert_eq!(
            to_human_readable_hash(&shash(b"abc")),
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
    }

    #[test]
    fn test_hash_uses_canonical_bytes() {
        struct Raw(Vec<u8>);
        impl Hashable for Raw {
            fn bytes(&self) -> Vec<u8> {
                self.0.clone()
            }
        }
        assert_eq!(hash(&Raw(b"abc".to_vec())), dhash(b"abc"));
    }

    #[test]
    fn test_wallet_address() {
        let secp = Secp256k1::new();
        let key = SecretKey::from_slice(&[7u8; 32]).unwrap().public_key(&secp);

        let address = wallet_address(&key);
        assert_eq!(address.len(), 20);
        assert_eq!(address, wallet_address(&key));
    }

    #[test]
    fn test_wallet_address_random_keys_differ() {
        use rand::rngs::OsRng;
        let secp = Secp256k1::new();
        let a = SecretKey::new(&mut OsRng).public_key(&secp);
        let b = SecretKey::new(&mut OsRng).public_key(&secp);
        assert_ne!(wallet_address(&a), wallet_address(&b));
    }

    #[test]
    fn test_human_readable_round_trip() {
        let digest = shash(b"round trip");
        let text = to_human_readable_hash(&digest);
        assert_eq!(text, text.to_uppercase());
        assert_eq!(from_human_readable_hash(&text).unwrap(), digest.to_vec());
        assert!(matches!(
            from_human_readable_hash("XYZ"),
            Err(LedgerError::Malformed(_))
        ));
    }

    #[test]
    fn test_is_equal_hashes() {
        let a = [1u8, 2, 3];
        let b = [1u8, 2, 3];
        assert!(is_equal_hashes(&a, &a));
        assert!(is_equal_hashes(&a, &b) && is_equal_hashes(&b, &a));
        assert!(!is_equal_hashes(&[1, 2, 3], &[1, 2]));
        assert!(!is_equal_hashes(&[1, 2], &[1, 2, 3]));
        assert!(!is_equal_hashes(&[1, 2, 3], &[1, 2, 4]));
        assert!(is_equal_hashes(&[], &[]));
    }

    #[test]
    fn test_compare_hashes() {
        assert_eq!(compare_hashes(None, None), Ordering::Equal);
        assert_eq!(compare_hashes(None, Some(&[0][..])), Ordering::Less);
        assert_eq!(compare_hashes(Some(&[0][..]), None), Ordering::Greater);
        assert_eq!(compare_hashes(Some(&[1, 2][..]), Some(&[1, 3][..])), Ordering::Less);
        assert_eq!(compare_hashes(Some(&[2][..]), Some(&[1, 9][..])), Ordering::Greater);
        // shared prefix equal, trailing length ignored
        assert_eq!(compare_hashes(Some(&[1, 2][..]), Some(&[1, 2, 3][..])), Ordering::Equal);
    }
}
