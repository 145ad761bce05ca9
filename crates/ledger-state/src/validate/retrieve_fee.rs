use ledger_core::{InflatorSet, LedgerError, RetrieveFeePayload, SignatureHex};

use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

pub fn validate(
    payload: &RetrieveFeePayload,
    signature: &SignatureHex,
    db: &StateDb,
    inflators: &InflatorSet,
) -> Result<(), LedgerError> {
    if payload.transaction_hash.is_empty() {
        return Err(LedgerError::EmptyField("transaction_hash"));
    }
    let record = db
        .get_transaction(&payload.transaction_hash)?
        .ok_or_else(|| LedgerError::TransactionNotFound(payload.transaction_hash.clone()))?;

    if record.fee.is_empty() {
        return Err(LedgerError::EmptyField("transaction.fee"));
    }
    if payload.new_owners.len() != record.fee.len() {
        return Err(LedgerError::EmptyField("new_owners"));
    }
    if payload.inflator.is_empty() {
        return Err(LedgerError::EmptyField("inflator"));
    }
    if !inflators.contains(&payload.inflator) {
        return Err(LedgerError::InflatorNotAuthorized(payload.inflator.clone()));
    }

    for (coin_id, owner) in &payload.new_owners {
        if db.owner_exists(owner) {
            return Err(LedgerError::OwnerAlreadyExists(owner.clone()));
        }
        if !record.fee.contains(coin_id) {
            return Err(LedgerError::CoinNotInTransaction(coin_id.clone()));
        }
    }

    let message = canonical_message(payload)?;
    // new_owners is a BTreeMap, so iterating `.values()` yields canonical
    // (lexicographic-key) order.
    let mut keys_hex: Vec<&str> = vec![payload.inflator.as_str()];
    keys_hex.extend(payload.new_owners.values().map(|o| o.as_str()));
    verify_schnorr(&keys_hex, &message, signature)?;

    if record.fee_received {
        return Err(LedgerError::TransactionHasBeenRetrieved);
    }

    Ok(())
}
