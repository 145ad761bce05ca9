use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::transaction::DleqProof;
use crate::types::{CoinId, PubKeyHex};

/// A live coin: unique id, current owner, fixed denomination, lock flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub owner: PubKeyHex,
    pub value: f64,
    pub locked: bool,
}

/// The singleton "latest tax" record, overwritten by each successful TAX.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxRecord {
    pub percentage: i32,
    pub inflator: PubKeyHex,
}

/// The on-ledger witness of a SEND. Retained forever; `coins_received` and
/// `fee_received` flip independently and are never reset.
///
/// `tax_percentage_at_send` is not in the original schema: it is carried so
/// that `get_transaction` can report the fee that was actually required at
/// the time of the SEND rather than re-deriving it from a tax rate that may
/// have since changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub coins: Vec<CoinId>,
    pub fee: Vec<CoinId>,
    pub proof: DleqProof,
    pub coins_received: bool,
    pub fee_received: bool,
    pub tax_percentage_at_send: i32,
}

/// The process-wide set of public keys authorized to inflate, set tax, and
/// claim fees. Immutable configuration handed to the state machine at
/// construction; never mutated for the lifetime of a replica.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InflatorSet(BTreeSet<PubKeyHex>);

impl InflatorSet {
    pub fn new(keys: impl IntoIterator<Item = PubKeyHex>) -> Self {
        InflatorSet(keys.into_iter().collect())
    }

    pub fn contains(&self, key: &PubKeyHex) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflator_set_membership() {
        let set = InflatorSet::new([PubKeyHex("pi".into())]);
        assert!(set.contains(&PubKeyHex("pi".into())));
        assert!(!set.contains(&PubKeyHex("px".into())));
    }
}
