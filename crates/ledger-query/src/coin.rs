use ledger_core::{CoinId, LedgerError, PubKeyHex};
use ledger_state::StateDb;

use crate::types::CoinView;

/// `get_coin?coin=<uuid>`.
pub fn get_coin(db: &StateDb, coin: &CoinId) -> Result<CoinView, LedgerError> {
    let record = db
        .get_coin(coin)?
        .ok_or_else(|| LedgerError::CoinNotFound(coin.clone()))?;
    Ok(CoinView {
        coin: record.id,
        owner: record.owner,
        value: record.value,
        is_locked: record.locked,
    })
}

/// `get_coin_by_owner?owner=<pubhex>`.
pub fn get_coin_by_owner(db: &StateDb, owner: &PubKeyHex) -> Result<CoinView, LedgerError> {
    let coin_id = db
        .get_owner(owner)?
        .ok_or_else(|| LedgerError::OwnerNotFound(owner.clone()))?;
    let record = db
        .get_coin(&coin_id)?
        .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
    Ok(CoinView {
        coin: record.id,
        owner: record.owner,
        value: record.value,
        is_locked: record.locked,
    })
}
