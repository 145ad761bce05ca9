use thiserror::Error;

use crate::types::{CoinId, PubKeyHex, TxHash};

/// Response code returned to the consensus driver, per the ABCI-shaped
/// contract: 0 ok, 1 encoding error, 3 unauthorized, 4 server error.
pub const CODE_OK: u32 = 0;
pub const CODE_ENCODING_ERROR: u32 = 1;
pub const CODE_UNAUTHORIZED: u32 = 3;
pub const CODE_SERVER_ERROR: u32 = 4;

/// Every way a transaction or query can fail, grouped by the error
/// taxonomy. `code()` is the total mapping from variant to response code.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ── Encoding ─────────────────────────────────────────────────────────
    #[error("encoding error: {0}")]
    Encoding(String),

    // ── Unauthorized: input shape ───────────────────────────────────────
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("percentage {0} is out of range [0, 100]")]
    PercentageOutOfRange(i32),
    #[error("duplicate entry in {0}")]
    DuplicateInList(&'static str),
    #[error("a coin appears in both coins and fee")]
    CoinInBothListsInSend,

    // ── Unauthorized: not found ─────────────────────────────────────────
    #[error("coin {0} not found")]
    CoinNotFound(CoinId),
    #[error("owner {0} not found")]
    OwnerNotFound(PubKeyHex),
    #[error("transaction {0} not found")]
    TransactionNotFound(TxHash),
    #[error("no taxes have been set")]
    NoTaxes,

    // ── Unauthorized: conflict ───────────────────────────────────────────
    #[error("coin {0} already exists")]
    CoinAlreadyExists(CoinId),
    #[error("owner {0} already exists")]
    OwnerAlreadyExists(PubKeyHex),
    #[error("transaction has been received")]
    TransactionHasBeenReceived,
    #[error("transaction has been retrieved")]
    TransactionHasBeenRetrieved,

    // ── Unauthorized: invariant ──────────────────────────────────────────
    #[error("value {0} is not an allowed denomination")]
    NotADenomination(f64),
    #[error("sum of new coins does not equal the original coin's value")]
    SumMismatch,
    #[error("fee is not based on the current tax, short by {shortfall:.2}")]
    FeeNotBasedOnTax { shortfall: f64 },
    #[error("coin {0} is locked")]
    CoinIsLocked(CoinId),
    #[error("coin {0} is not part of this transaction")]
    CoinNotInTransaction(CoinId),
    #[error("inflator {0} is not in the authorized set")]
    InflatorNotAuthorized(PubKeyHex),
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    // ── Unauthorized: crypto ─────────────────────────────────────────────
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("DLEQ proof verification failed")]
    InvalidProof,
    #[error("proof verification points are malformed: {0}")]
    MalformedProofVerification(String),

    // ── Server ────────────────────────────────────────────────────────────
    #[error("server error: {0}")]
    Server(String),
}

impl LedgerError {
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::Encoding(_) => CODE_ENCODING_ERROR,
            LedgerError::Server(_) => CODE_SERVER_ERROR,
            _ => CODE_UNAUTHORIZED,
        }
    }
}
