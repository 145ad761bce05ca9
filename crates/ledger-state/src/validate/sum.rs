use std::collections::HashSet;

use ledger_core::{is_denomination, LedgerError, SignatureHex, SumPayload};

use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

pub fn validate(
    payload: &SumPayload,
    signature: &SignatureHex,
    db: &StateDb,
) -> Result<(), LedgerError> {
    if payload.coins.is_empty() {
        return Err(LedgerError::EmptyField("coins"));
    }
    let unique: HashSet<_> = payload.coins.iter().collect();
    if unique.len() != payload.coins.len() {
        return Err(LedgerError::DuplicateInList("coins"));
    }
    if signature.is_empty() {
        return Err(LedgerError::EmptyField("signature"));
    }
    if payload.new_coin.is_empty() {
        return Err(LedgerError::EmptyField("new_coin"));
    }
    if payload.new_owner.is_empty() {
        return Err(LedgerError::EmptyField("new_owner"));
    }

    let mut owners = Vec::with_capacity(payload.coins.len());
    let mut total = 0.0;
    for coin_id in &payload.coins {
        let coin = db
            .get_coin(coin_id)?
            .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
        total += coin.value;
        owners.push(coin.owner);
    }
    if !is_denomination(total) {
        return Err(LedgerError::NotADenomination(total));
    }

    if db.coin_exists(&payload.new_coin) {
        return Err(LedgerError::CoinAlreadyExists(payload.new_coin.clone()));
    }
    if db.owner_exists(&payload.new_owner) {
        return Err(LedgerError::OwnerAlreadyExists(payload.new_owner.clone()));
    }

    let message = canonical_message(payload)?;
    let mut keys_hex: Vec<&str> = vec![payload.new_owner.as_str()];
    keys_hex.extend(owners.iter().map(|o| o.as_str()));
    verify_schnorr(&keys_hex, &message, signature)?;

    for coin_id in &payload.coins {
        if db.is_coin_locked(coin_id)? {
            return Err(LedgerError::CoinIsLocked(coin_id.clone()));
        }
    }

    Ok(())
}
