//! ledger-rpc
//!
//! JSON-RPC 2.0 server exposing the ABCI-shaped adapter (C8) and the query
//! surface (C7) over HTTP, since no ABCI socket-protocol crate stands in
//! for the BFT consensus transport this core is meant to run behind.
//!
//! Namespace: "ledger"
//! Methods:
//!   ledger_checkTx                       — validate a transaction, no mutation
//!   ledger_deliverTx                     — validate and apply a transaction
//!   ledger_getCoin                       — coin by id
//!   ledger_getCoinByOwner                — coin by current owner
//!   ledger_getLatestTax                  — the singleton tax record
//!   ledger_getTransaction                — a SEND transaction record by hash
//!   ledger_getTransactionsWithUnreceivedFee — pending fee retrievals

pub mod api;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerState};
pub use types::TxResult;
