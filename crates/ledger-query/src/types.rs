use serde::Serialize;

use ledger_core::{CoinId, PubKeyHex, TxHash};

/// Response shape for `get_coin` and `get_coin_by_owner`.
#[derive(Clone, Debug, Serialize)]
pub struct CoinView {
    pub coin: CoinId,
    pub owner: PubKeyHex,
    pub value: f64,
    pub is_locked: bool,
}

/// Response shape for `get_latest_tax`.
#[derive(Clone, Debug, Serialize)]
pub struct TaxView {
    pub percentage: i32,
    pub inflator: PubKeyHex,
}

/// Response shape for `get_transaction`.
///
/// `required_fee` is not in the original schema: it is the fee that was
/// actually required at SEND time, recomputed from the tax rate the
/// transaction was validated against (`tax_percentage_at_send`) rather than
/// whatever the singleton tax happens to be now.
#[derive(Clone, Debug, Serialize)]
pub struct TransactionView {
    pub hash: TxHash,
    pub coins: Vec<CoinId>,
    pub fee: Vec<CoinId>,
    pub coins_received: bool,
    pub fee_received: bool,
    pub required_fee: f64,
}

/// One entry of `get_transactions_with_unreceived_fee`.
#[derive(Clone, Debug, Serialize)]
pub struct TransactionSummary {
    pub hash: TxHash,
    pub coins: Vec<CoinId>,
    pub fee: Vec<CoinId>,
    pub fee_received: bool,
}
