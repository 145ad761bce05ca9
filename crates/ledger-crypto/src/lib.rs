pub mod dleq;
pub mod error;
pub mod keypair;
pub mod schnorr;

pub use error::CryptoError;
pub use keypair::{decode_point, encode_point, KeyPair};
pub use schnorr::{aggregate_pubkeys_hex, aggregate_scalars, sign, verify, verify_aggregate};
