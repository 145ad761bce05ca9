use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Client-chosen coin identifier. Opaque to the ledger beyond non-emptiness
/// and uniqueness; the original wire format calls these "uuid" but nothing
/// here requires RFC 4122 structure.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(pub String);

impl CoinId {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoinId({})", self.0)
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoinId {
    fn from(s: &str) -> Self {
        CoinId(s.to_string())
    }
}

/// Lowercase hex encoding of a 32-byte Ed25519 public point.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubKeyHex(pub String);

impl PubKeyHex {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to the raw 32-byte compressed point, rejecting anything that
    /// is not exactly 32 bytes of hex.
    pub fn decode(&self) -> Result<[u8; 32], LedgerError> {
        let bytes =
            hex::decode(&self.0).map_err(|_| LedgerError::Encoding("public key is not hex".into()))?;
        bytes
            .try_into()
            .map_err(|_| LedgerError::Encoding("public key is not 32 bytes".into()))
    }
}

impl fmt::Debug for PubKeyHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeyHex({})", self.0)
    }
}

impl fmt::Display for PubKeyHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowercase hex encoding of a Schnorr signature (64 bytes: R || s).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureHex(pub String);

impl SignatureHex {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn decode(&self) -> Result<Vec<u8>, LedgerError> {
        hex::decode(&self.0).map_err(|_| LedgerError::Encoding("signature is not hex".into()))
    }
}

impl fmt::Debug for SignatureHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureHex({}…)", &self.0.get(..8).unwrap_or(&self.0))
    }
}

/// Lowercase hex sha256 digest used as a transaction record key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
