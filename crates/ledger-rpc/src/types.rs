use serde::{Deserialize, Serialize};

/// Response shape for `checkTx`/`deliverTx`: the ABCI-style `(code, log)`
/// pair, carried over JSON-RPC instead of a socket protocol frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxResult {
    pub code: u32,
    pub log: String,
}

impl TxResult {
    pub fn from_pair((code, log): (u32, String)) -> Self {
        Self { code, log }
    }
}
