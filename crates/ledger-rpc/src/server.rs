use std::net::SocketAddr;
use std::sync::Arc;

use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObject;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use ledger_core::{CoinId, LedgerError, PubKeyHex, TxHash};
use ledger_query::{coin, tax, transaction, CoinView, TaxView, TransactionSummary, TransactionView};
use ledger_state::LedgerEngine;

use crate::api::LedgerApiServer;
use crate::types::TxResult;

fn rpc_err(err: LedgerError) -> ErrorObject<'static> {
    ErrorObject::owned(err.code() as i32, err.to_string(), None::<()>)
}

/// Shared state passed to the RPC server: the single state engine this
/// process hosts. One engine per process — there is no sharding or
/// multi-tenancy here, matching the single-writer contract of §5.
pub struct RpcServerState {
    pub engine: Arc<LedgerEngine>,
}

/// The RPC server implementation.
pub struct RpcServer {
    state: Arc<RpcServerState>,
}

impl RpcServer {
    pub fn new(state: Arc<RpcServerState>) -> Self {
        Self { state }
    }

    /// Start the JSON-RPC server on `addr` with permissive CORS headers.
    /// Returns a handle to stop it.
    pub async fn start(self, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
        let cors = CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(Any)
            .allow_headers(Any);

        let server = Server::builder()
            .set_http_middleware(tower::ServiceBuilder::new().layer(cors))
            .build(addr)
            .await?;

        let module = self.into_rpc();
        let handle = server.start(module);
        info!(%addr, "RPC server started");
        Ok(handle)
    }
}

#[async_trait]
impl crate::api::LedgerApiServer for RpcServer {
    async fn check_tx(&self, tx_hex: String) -> RpcResult<TxResult> {
        let bytes = hex::decode(tx_hex).map_err(|e| rpc_err(LedgerError::Encoding(e.to_string())))?;
        Ok(TxResult::from_pair(self.state.engine.check_tx(&bytes)))
    }

    async fn deliver_tx(&self, tx_hex: String) -> RpcResult<TxResult> {
        let bytes = hex::decode(tx_hex).map_err(|e| rpc_err(LedgerError::Encoding(e.to_string())))?;
        Ok(TxResult::from_pair(self.state.engine.deliver_tx(&bytes)))
    }

    async fn get_coin(&self, coin_id: String) -> RpcResult<CoinView> {
        coin::get_coin(self.state.engine.db(), &CoinId::from(coin_id.as_str())).map_err(rpc_err)
    }

    async fn get_coin_by_owner(&self, owner: String) -> RpcResult<CoinView> {
        coin::get_coin_by_owner(self.state.engine.db(), &PubKeyHex(owner)).map_err(rpc_err)
    }

    async fn get_latest_tax(&self) -> RpcResult<TaxView> {
        tax::get_latest_tax(self.state.engine.db()).map_err(rpc_err)
    }

    async fn get_transaction(&self, hash: String) -> RpcResult<TransactionView> {
        transaction::get_transaction(self.state.engine.db(), &TxHash(hash)).map_err(rpc_err)
    }

    async fn get_transactions_with_unreceived_fee(&self) -> RpcResult<Vec<TransactionSummary>> {
        transaction::get_transactions_with_unreceived_fee(self.state.engine.db()).map_err(rpc_err)
    }
}
