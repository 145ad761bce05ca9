pub mod denominations;
pub mod error;
pub mod records;
pub mod transaction;
pub mod types;

pub use denominations::{is_denomination, DENOMINATIONS};
pub use error::{LedgerError, CODE_ENCODING_ERROR, CODE_OK, CODE_SERVER_ERROR, CODE_UNAUTHORIZED};
pub use records::{Coin, InflatorSet, TaxRecord, TransactionRecord};
pub use transaction::{
    DivideEntry, DividePayload, DleqProof, Envelope, InflatePayload, ProofVerification,
    ReceivePayload, RetrieveFeePayload, SendPayload, SumPayload, TaxPayload, TxKind,
};
pub use types::{CoinId, PubKeyHex, SignatureHex, TxHash};
