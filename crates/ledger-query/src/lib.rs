//! The read-only query surface (C7): five lookups over `StateDb`, plus a
//! `dispatch` entry point that routes an ABCI-style `path?query=string` the
//! way the original `Query(RequestQuery)` handler does — one module per
//! queried record family, matching the original's `query_coin.go`,
//! `query_tax.go`, `query_transaction.go` split.

pub mod coin;
pub mod tax;
pub mod transaction;
pub mod types;

use ledger_core::{CoinId, LedgerError, PubKeyHex, TxHash};
use ledger_state::StateDb;

pub use types::{CoinView, TaxView, TransactionSummary, TransactionView};

/// Route a `path?query` string (as received from the ABCI adapter's
/// `query(path)` entry point) to the matching read operation, returning
/// its canonical-JSON-encoded result.
///
/// Unknown paths are reported the same way the original does: an
/// unauthorized error with a fixed "method not found" log, not an encoding
/// error — the path itself decoded fine, it just names nothing this
/// surface serves.
pub fn dispatch(path_and_query: &str) -> Result<ParsedQuery, LedgerError> {
    let url = url::Url::parse(&format!("ledger://query/{path_and_query}"))
        .map_err(|e| LedgerError::Encoding(e.to_string()))?;
    let path = url.path().trim_start_matches('/').to_string();
    let params: std::collections::HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    match path.as_str() {
        "get_coin" => {
            let coin = params
                .get("coin")
                .ok_or_else(|| LedgerError::EmptyField("coin"))?;
            Ok(ParsedQuery::GetCoin(CoinId::from(coin.as_str())))
        }
        "get_coin_by_owner" => {
            let owner = params
                .get("owner")
                .ok_or_else(|| LedgerError::EmptyField("owner"))?;
            Ok(ParsedQuery::GetCoinByOwner(PubKeyHex(owner.clone())))
        }
        "get_latest_tax" => Ok(ParsedQuery::GetLatestTax),
        "get_transaction" => {
            let hash = params
                .get("hash")
                .ok_or_else(|| LedgerError::EmptyField("hash"))?;
            Ok(ParsedQuery::GetTransaction(TxHash(hash.clone())))
        }
        "get_transactions_with_unreceived_fee" => {
            Ok(ParsedQuery::GetTransactionsWithUnreceivedFee)
        }
        other => Err(LedgerError::UnknownAction(other.to_string())),
    }
}

/// A `dispatch`-parsed request, ready to run against a `StateDb`.
#[derive(Clone, Debug)]
pub enum ParsedQuery {
    GetCoin(CoinId),
    GetCoinByOwner(PubKeyHex),
    GetLatestTax,
    GetTransaction(TxHash),
    GetTransactionsWithUnreceivedFee,
}

impl ParsedQuery {
    /// Execute the parsed query against `db`, returning its canonical JSON
    /// encoding — the shape the ABCI adapter's `ResponseQuery.value` carries.
    pub fn run(&self, db: &StateDb) -> Result<Vec<u8>, LedgerError> {
        let encode = |e: serde_json::Error| LedgerError::Encoding(e.to_string());
        match self {
            ParsedQuery::GetCoin(id) => {
                serde_json::to_vec(&coin::get_coin(db, id)?).map_err(encode)
            }
            ParsedQuery::GetCoinByOwner(owner) => {
                serde_json::to_vec(&coin::get_coin_by_owner(db, owner)?).map_err(encode)
            }
            ParsedQuery::GetLatestTax => {
                serde_json::to_vec(&tax::get_latest_tax(db)?).map_err(encode)
            }
            ParsedQuery::GetTransaction(hash) => {
                serde_json::to_vec(&transaction::get_transaction(db, hash)?).map_err(encode)
            }
            ParsedQuery::GetTransactionsWithUnreceivedFee => {
                serde_json::to_vec(&transaction::get_transactions_with_unreceived_fee(db)?)
                    .map_err(encode)
            }
        }
    }
}
