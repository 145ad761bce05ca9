//! Deterministic JSON encoding and the hex/sha256 helpers built on it.
//!
//! Canonicalization relies on two properties that already hold for every
//! payload and record type in `ledger-core`: struct fields serialize in
//! declared order, and every map-typed field is a `BTreeMap`/`BTreeSet`, so
//! `serde_json` — which sorts nothing on its own — emits keys in the
//! collection's natural (lexicographic) order for free. No separate
//! canonicalization pass is needed; `serde_json::to_vec` *is* the canonical
//! encoder here.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Serialize `value` to its canonical JSON byte representation.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// `sha256_hex(canonical_json(value))`, used for transaction identifiers.
pub fn sha256_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = canonical_json(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// sha256 over raw bytes, hex-encoded.
pub fn sha256_hex_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::CoinId;
    use std::collections::BTreeMap;

    #[test]
    fn map_keys_are_sorted_regardless_of_insertion_order() {
        let mut m: BTreeMap<CoinId, i32> = BTreeMap::new();
        m.insert(CoinId::from("z"), 1);
        m.insert(CoinId::from("a"), 2);
        let json = String::from_utf8(canonical_json(&m).unwrap()).unwrap();
        assert!(json.find("\"a\"").unwrap() < json.find("\"z\"").unwrap());
    }

    #[test]
    fn sha256_hex_is_deterministic() {
        let coins = vec![CoinId::from("u1"), CoinId::from("u2")];
        assert_eq!(sha256_hex(&coins).unwrap(), sha256_hex(&coins).unwrap());
    }

    #[test]
    fn encode_decode_round_trips() {
        let coins = vec![CoinId::from("u1"), CoinId::from("u2")];
        let bytes = canonical_json(&coins).unwrap();
        let back: Vec<CoinId> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(coins, back);
    }
}
