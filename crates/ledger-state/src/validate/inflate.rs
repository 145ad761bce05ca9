use ledger_core::{is_denomination, InflatePayload, InflatorSet, LedgerError, SignatureHex};

use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

/// INFLATE mints a coin. The applier performs the actual insert; this
/// validator only checks the shape, authorization, and signature — the
/// `coin`/`owner` uniqueness conflict is reported by `add_coin` at apply
/// time, per the original design (duplicate coin or owner yields
/// `UNAUTHORIZED` from the applier, not a pre-check here).
pub fn validate(
    payload: &InflatePayload,
    signature: &SignatureHex,
    _db: &StateDb,
    inflators: &InflatorSet,
) -> Result<(), LedgerError> {
    if payload.coin.is_empty() {
        return Err(LedgerError::EmptyField("coin"));
    }
    if signature.is_empty() {
        return Err(LedgerError::EmptyField("signature"));
    }
    if payload.owner.is_empty() {
        return Err(LedgerError::EmptyField("owner"));
    }
    if payload.inflator.is_empty() {
        return Err(LedgerError::EmptyField("inflator"));
    }
    if !inflators.contains(&payload.inflator) {
        return Err(LedgerError::InflatorNotAuthorized(payload.inflator.clone()));
    }
    if !is_denomination(payload.value) {
        return Err(LedgerError::NotADenomination(payload.value));
    }

    let message = canonical_message(payload)?;
    verify_schnorr(
        &[payload.inflator.as_str(), payload.owner.as_str()],
        &message,
        signature,
    )
}
