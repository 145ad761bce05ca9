use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

use ledger_query::{CoinView, TaxView, TransactionSummary, TransactionView};

use crate::types::TxResult;

/// Ledger JSON-RPC 2.0 API definition.
///
/// All method names are prefixed with "ledger_" via `namespace = "ledger"`.
/// This is the standalone node's stand-in transport for the ABCI-shaped
/// adapter (C8): `checkTx`/`deliverTx` are an unmediated exposure of the
/// validator/applier entry points, and the five `get*` methods are the C7
/// query surface.
#[rpc(server, namespace = "ledger")]
pub trait LedgerApi {
    /// Validate a transaction envelope (hex-encoded UTF-8 JSON) without
    /// mutating state.
    #[method(name = "checkTx")]
    async fn check_tx(&self, tx_hex: String) -> RpcResult<TxResult>;

    /// Validate then apply a transaction envelope (hex-encoded UTF-8 JSON).
    #[method(name = "deliverTx")]
    async fn deliver_tx(&self, tx_hex: String) -> RpcResult<TxResult>;

    /// `get_coin?coin=<uuid>`.
    #[method(name = "getCoin")]
    async fn get_coin(&self, coin: String) -> RpcResult<CoinView>;

    /// `get_coin_by_owner?owner=<pubhex>`.
    #[method(name = "getCoinByOwner")]
    async fn get_coin_by_owner(&self, owner: String) -> RpcResult<CoinView>;

    /// `get_latest_tax`.
    #[method(name = "getLatestTax")]
    async fn get_latest_tax(&self) -> RpcResult<TaxView>;

    /// `get_transaction?hash=<hex>`.
    #[method(name = "getTransaction")]
    async fn get_transaction(&self, hash: String) -> RpcResult<TransactionView>;

    /// `get_transactions_with_unreceived_fee`.
    #[method(name = "getTransactionsWithUnreceivedFee")]
    async fn get_transactions_with_unreceived_fee(&self) -> RpcResult<Vec<TransactionSummary>>;
}
