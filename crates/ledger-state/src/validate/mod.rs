mod divide;
mod inflate;
mod receive;
mod retrieve_fee;
mod send;
mod sum;
mod tax;

pub use divide::validate as validate_divide;
pub use inflate::validate as validate_inflate;
pub use receive::validate as validate_receive;
pub use retrieve_fee::validate as validate_retrieve_fee;
pub use send::validate as validate_send;
pub use sum::validate as validate_sum;
pub use tax::{tax_fee, validate as validate_tax};

use ledger_core::{LedgerError, SignatureHex};

pub(crate) fn canonical_message<T: serde::Serialize>(payload: &T) -> Result<Vec<u8>, LedgerError> {
    ledger_codec::canonical_json(payload).map_err(|e| LedgerError::Encoding(e.to_string()))
}

/// Verify `signature` under the aggregate of `keys_hex`, mapping any
/// cryptographic failure (bad hex, bad point, bad signature) uniformly to
/// `LedgerError::InvalidSignature` — validators never distinguish *why* a
/// signature check failed beyond that.
pub(crate) fn verify_schnorr(
    keys_hex: &[&str],
    message: &[u8],
    signature: &SignatureHex,
) -> Result<(), LedgerError> {
    if signature.is_empty() {
        return Err(LedgerError::EmptyField("signature"));
    }
    ledger_crypto::verify_aggregate(keys_hex, message, &signature.0)
        .map_err(|_| LedgerError::InvalidSignature)
}
