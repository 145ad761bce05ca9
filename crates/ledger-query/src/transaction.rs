use ledger_core::{LedgerError, TxHash};
use ledger_state::validate::tax_fee;
use ledger_state::StateDb;

use crate::types::{TransactionSummary, TransactionView};

/// `get_transaction?hash=<hex>`.
pub fn get_transaction(db: &StateDb, hash: &TxHash) -> Result<TransactionView, LedgerError> {
    let record = db
        .get_transaction(hash)?
        .ok_or_else(|| LedgerError::TransactionNotFound(hash.clone()))?;

    let mut total = 0.0;
    for coin_id in &record.coins {
        // Coins referenced by a transaction record always exist — SEND
        // cannot reference a nonexistent coin, and no applier deletes a
        // locked coin out from under one.
        if let Some(coin) = db.get_coin(coin_id)? {
            total += coin.value;
        }
    }
    let required_fee = tax_fee(total, record.tax_percentage_at_send);

    Ok(TransactionView {
        hash: hash.clone(),
        coins: record.coins,
        fee: record.fee,
        coins_received: record.coins_received,
        fee_received: record.fee_received,
        required_fee,
    })
}

/// `get_transactions_with_unreceived_fee`. Ordered ascending by the stored
/// key, as `StateDb::iter_transactions` already guarantees.
pub fn get_transactions_with_unreceived_fee(
    db: &StateDb,
) -> Result<Vec<TransactionSummary>, LedgerError> {
    let mut out = Vec::new();
    for (hash, record) in db.iter_transactions()? {
        if !record.fee_received {
            out.push(TransactionSummary {
                hash,
                coins: record.coins,
                fee: record.fee,
                fee_received: record.fee_received,
            });
        }
    }
    Ok(out)
}
