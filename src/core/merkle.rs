// Merkle root computation

use crate::core::{Hash256, Hashable, LedgerError, Result, Transaction, dhash};

/// Calculate the Merkle root of an ordered, non-empty transaction list.
///
/// Leaves are the transactions' canonical bytes. A single leaf is paired
/// with itself, an odd level duplicates its last element, and larger lists
/// split into two equal halves whose roots are concatenated and hashed.
pub fn merkle_root(transactions: &[Transaction]) -> Result<Hash256> {
    if transactions.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "merkle root of an empty transaction list".into(),
        ));
    }

    let leaves: Vec<Vec<u8>> = transactions.iter().map(|tx| tx.bytes()).collect();
    let leaves: Vec<&[u8]> = leaves.iter().map(Vec::as_slice).collect();
    let root = subtree_root(&leaves);
    log::debug!("Merkle root over {} transactions: {}", transactions.len(), root);
    Ok(root)
}

fn subtree_root(leaves: &[&[u8]]) -> Hash256 {
    match leaves {
        [only] => hash_pair(only, only),
        [left, right] => hash_pair(left, right),
        _ => {
            let padded;
            let level = if leaves.len() % 2 != 0 {
                let mut v = leaves.to_vec();
                v.push(leaves[leaves.len() - 1]);
                padded = v;
                &padded[..]
            } else {
                leaves
            };
            let (left, right) = level.split_at(level.len() / 2);
            let left = subtree_root(left);
            let right = subtree_root(right);
            hash_pair(left.as_bytes(), right.as_bytes())
        }
    }
}

fn hash_pair(left: &[u8], right: &[u8]) -> Hash256 {
    let mut combined = Vec::with_capacity(left.len() + right.len());
    combined.extend_from_slice(left);
    combined.extend_from_slice(right);
    dhash(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coin, TransactionOutput};
    use chrono::DateTime;

    fn tx(seed: u8) -> Transaction {
        let time = DateTime::from_timestamp(1_700_000_000 + seed as i64, 0).unwrap();
        Transaction::builder()
            .timestamp(time)
            .destination_address(format!("dest-{}", seed))
            .coinbase_input(Coin::new(seed as u64, 0).unwrap())
            .output(TransactionOutput::new(vec![seed; 20], seed as u64))
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_list_fails() {
        assert!(matches!(
            merkle_root(&[]),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_transaction_pairs_with_itself() {
        let t = tx(1);
        let expected = dhash(&[t.bytes(), t.bytes()].concat());
        assert_eq!(merkle_root(&[t]).unwrap(), expected);
    }

    #[test]
    fn test_two_transactions() {
        let (t0, t1) = (tx(1), tx(2));
        let expected = dhash(&[t0.bytes(), t1.bytes()].concat());
        assert_eq!(merkle_root(&[t0, t1]).unwrap(), expected);
    }

    #[test]
    fn test_odd_list_is_padded_with_last() {
        let (t0, t1, t2) = (tx(1), tx(2), tx(3));
        let odd = merkle_root(&[t0.clone(), t1.clone(), t2.clone()]).unwrap();
        let padded = merkle_root(&[t0.clone(), t1.clone(), t2.clone(), t2.clone()]).unwrap();
        assert_eq!(odd, padded);

        let left = dhash(&[t0.bytes(), t1.bytes()].concat());
        let right = dhash(&[t2.bytes(), t2.bytes()].concat());
        let expected = dhash(&[left.as_bytes().to_vec(), right.as_bytes().to_vec()].concat());
        assert_eq!(odd, expected);
    }

    #[test]
    fn test_halves_do_not_overlap() {
        let txs: Vec<Transaction> = (1..=6).map(tx).collect();
        let left = merkle_root(&txs[..3]).unwrap();
        let right = merkle_root(&txs[3..]).unwrap();
        let expected = dhash(&[left.as_bytes().to_vec(), right.as_bytes().to_vec()].concat());
        assert_eq!(merkle_root(&txs).unwrap(), expected);
    }

    #[test]
    fn test_order_sensitive() {
        let (t0, t1) = (tx(1), tx(2));
        assert_ne!(
            merkle_root(&[t0.clone(), t1.clone()]).unwrap(),
            merkle_root(&[t1, t0]).unwrap()
        );
    }
}
