use ledger_core::{InflatorSet, LedgerError, SignatureHex, TaxPayload};

use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

/// `tax_fee(total)`: the fee required for a SEND of `total` value at the
/// given `percentage`. Half-away-from-zero rounding to 2 decimal places,
/// floored at 0.01 whenever the rate is nonzero but rounds to nothing —
/// never bankers' rounding, and `f64::round` already rounds ties away from
/// zero, so no custom tie-break logic is needed beyond the floor.
pub fn tax_fee(total: f64, percentage: i32) -> f64 {
    if percentage == 0 {
        return 0.0;
    }
    let fee = total * percentage as f64 / 100.0;
    let rounded = (fee * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.01
    } else {
        rounded
    }
}

pub fn validate(
    payload: &TaxPayload,
    signature: &SignatureHex,
    _db: &StateDb,
    inflators: &InflatorSet,
) -> Result<(), LedgerError> {
    if payload.percentage < 0 || payload.percentage > 100 {
        return Err(LedgerError::PercentageOutOfRange(payload.percentage));
    }
    if payload.inflator.is_empty() {
        return Err(LedgerError::EmptyField("inflator"));
    }
    if !inflators.contains(&payload.inflator) {
        return Err(LedgerError::InflatorNotAuthorized(payload.inflator.clone()));
    }

    let message = canonical_message(payload)?;
    verify_schnorr(&[payload.inflator.as_str()], &message, signature)
}
