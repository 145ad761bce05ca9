use thiserror::Error;

/// Low-level cryptographic failures. Callers in `ledger-state` translate
/// these into the appropriate `LedgerError` variant (almost always
/// `InvalidSignature` or `InvalidProof`) rather than exposing this type at
/// the validator boundary.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("hex decode failed: {0}")]
    HexDecode(#[from] hex::FromHexError),
    #[error("public key is not a valid curve point")]
    InvalidPoint,
    #[error("signature has the wrong length")]
    InvalidSignatureLength,
    #[error("signature does not verify")]
    VerificationFailed,
    #[error("DLEQ proof does not verify")]
    ProofVerificationFailed,
}
