use std::collections::HashSet;

use ledger_core::{LedgerError, SendPayload, SignatureHex};

use super::tax::tax_fee;
use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

pub fn validate(payload: &SendPayload, signature: &SignatureHex, db: &StateDb) -> Result<(), LedgerError> {
    if payload.coins.is_empty() {
        return Err(LedgerError::EmptyField("coins"));
    }
    let unique_coins: HashSet<_> = payload.coins.iter().collect();
    if unique_coins.len() != payload.coins.len() {
        return Err(LedgerError::DuplicateInList("coins"));
    }

    let percentage = db.get_tax()?.map(|t| t.percentage).unwrap_or(0);
    if percentage > 0 && payload.fee.is_empty() {
        return Err(LedgerError::EmptyField("fee"));
    }
    let unique_fee: HashSet<_> = payload.fee.iter().collect();
    if unique_fee.len() != payload.fee.len() {
        return Err(LedgerError::DuplicateInList("fee"));
    }
    if unique_coins.intersection(&unique_fee).next().is_some() {
        return Err(LedgerError::CoinInBothListsInSend);
    }

    let mut coin_owners = Vec::with_capacity(payload.coins.len());
    let mut total = 0.0;
    for coin_id in &payload.coins {
        let coin = db
            .get_coin(coin_id)?
            .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
        total += coin.value;
        coin_owners.push(coin.owner);
    }
    let mut fee_owners = Vec::with_capacity(payload.fee.len());
    let mut fee_total = 0.0;
    for coin_id in &payload.fee {
        let coin = db
            .get_coin(coin_id)?
            .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
        fee_total += coin.value;
        fee_owners.push(coin.owner);
    }

    let required = tax_fee(total, percentage);
    if required > 0.0 && required > fee_total {
        let shortfall = ((required - fee_total) * 100.0).round() / 100.0;
        return Err(LedgerError::FeeNotBasedOnTax { shortfall });
    }

    let message = canonical_message(payload)?;
    let mut keys_hex: Vec<&str> = coin_owners.iter().map(|o| o.as_str()).collect();
    keys_hex.extend(fee_owners.iter().map(|o| o.as_str()));
    verify_schnorr(&keys_hex, &message, signature)?;

    ledger_crypto::dleq::ProofPoints::from_wire(&payload.proof).map_err(|_| LedgerError::InvalidProof)?;

    for coin_id in payload.coins.iter().chain(payload.fee.iter()) {
        if db.is_coin_locked(coin_id)? {
            return Err(LedgerError::CoinIsLocked(coin_id.clone()));
        }
    }

    Ok(())
}
