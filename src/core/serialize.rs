// Canonical byte encoding for ledger items

use crate::core::{LedgerError, Result};

/// A ledger item with a canonical byte form.
///
/// The bytes are used both for identity hashing and for wire encoding, so
/// field order and widths must never change.
pub trait Hashable {
    fn bytes(&self) -> Vec<u8>;
}

/// Write a length as a 7-bit variable-length integer
/// (low seven bits first, high bit set while more groups follow)
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Write a UTF-8 string with its byte length prefixed
pub fn write_prefixed_str(buf: &mut Vec<u8>, s: &str) {
    write_varint(buf, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Take `N` bytes from the front of `data`, advancing it
pub(crate) fn take_array<const N: usize>(data: &mut &[u8], field: &str) -> Result<[u8; N]> {
    if data.len() < N {
        return Err(LedgerError::Malformed(format!(
            "{}: expected {} bytes, {} remaining",
            field,
            N,
            data.len()
        )));
    }
    let (head, rest) = data.split_at(N);
    *data = rest;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_small() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 100);
        assert_eq!(buf, vec![100]);
    }

    #[test]
    fn test_varint_multi_byte() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 300);
        assert_eq!(buf, vec![0xac, 0x02]);
    }

    #[test]
    fn test_prefixed_str() {
        let mut buf = Vec::new();
        write_prefixed_str(&mut buf, "abc");
        assert_eq!(buf, vec![3, b'a', b'b', b'c']);

        let mut buf = Vec::new();
        write_prefixed_str(&mut buf, "");
        assert_eq!(buf, vec![0]);
    }

    #[test]
    fn test_take_array() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor: &[u8] = &data;
        let head: [u8; 2] = take_array(&mut cursor, "head").unwrap();
        assert_eq!(head, [1, 2]);
        assert_eq!(cursor, &[3, 4, 5]);
        assert!(take_array::<4>(&mut cursor, "tail").is_err());
    }
}
