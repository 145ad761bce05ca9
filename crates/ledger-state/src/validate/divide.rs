use std::collections::HashSet;

use ledger_core::{is_denomination, DividePayload, LedgerError, SignatureHex};

use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

pub fn validate(
    payload: &DividePayload,
    signature: &SignatureHex,
    db: &StateDb,
) -> Result<(), LedgerError> {
    if payload.coin.is_empty() {
        return Err(LedgerError::EmptyField("coin"));
    }
    if payload.new_coins.is_empty() {
        return Err(LedgerError::EmptyField("new_coins"));
    }

    let mut seen_owners = HashSet::new();
    let mut sum = 0.0;
    for (new_id, entry) in &payload.new_coins {
        if entry.owner.is_empty() {
            return Err(LedgerError::EmptyField("new_coins.owner"));
        }
        if !is_denomination(entry.value) {
            return Err(LedgerError::NotADenomination(entry.value));
        }
        if !seen_owners.insert(&entry.owner) {
            return Err(LedgerError::DuplicateInList("new_coins owners"));
        }
        if db.coin_exists(new_id) {
            return Err(LedgerError::CoinAlreadyExists(new_id.clone()));
        }
        if db.owner_exists(&entry.owner) {
            return Err(LedgerError::OwnerAlreadyExists(entry.owner.clone()));
        }
        sum += entry.value;
    }

    let coin = db
        .get_coin(&payload.coin)?
        .ok_or_else(|| LedgerError::CoinNotFound(payload.coin.clone()))?;
    if sum != coin.value {
        return Err(LedgerError::SumMismatch);
    }

    let message = canonical_message(payload)?;
    // new_coins is a BTreeMap, so this iteration is already the canonical
    // (lexicographic-key) order the signed message used.
    let mut keys_hex: Vec<&str> = payload.new_coins.values().map(|e| e.owner.as_str()).collect();
    keys_hex.push(coin.owner.as_str());
    verify_schnorr(&keys_hex, &message, signature)?;

    if db.is_coin_locked(&payload.coin)? {
        return Err(LedgerError::CoinIsLocked(payload.coin.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{Coin, CoinId, DivideEntry};
    use ledger_crypto::KeyPair;
    use std::collections::BTreeMap;

    #[test]
    fn accepts_matching_split() {
        let db = StateDb::open_temporary().unwrap();
        let owner = KeyPair::generate();
        let pd = KeyPair::generate();
        let pe = KeyPair::generate();
        db.add_coin(&Coin {
            id: CoinId::from("u3"),
            owner: owner.public_hex(),
            value: 1.0,
            locked: false,
        })
        .unwrap();

        let mut new_coins = BTreeMap::new();
        new_coins.insert(
            CoinId::from("u4"),
            DivideEntry {
                owner: pd.public_hex(),
                value: 0.5,
            },
        );
        new_coins.insert(
            CoinId::from("u5"),
            DivideEntry {
                owner: pe.public_hex(),
                value: 0.5,
            },
        );
        let payload = DividePayload {
            coin: CoinId::from("u3"),
            new_coins,
        };
        let message = canonical_message(&payload).unwrap();
        let agg = ledger_crypto::aggregate_scalars(&[*pd.secret(), *pe.secret(), *owner.secret()]);
        let sig = SignatureHex(hex::encode(ledger_crypto::sign(&agg, &message)));
        validate(&payload, &sig, &db).unwrap();
    }

    #[test]
    fn rejects_mismatched_sum() {
        let db = StateDb::open_temporary().unwrap();
        let owner = KeyPair::generate();
        let pd = KeyPair::generate();
        db.add_coin(&Coin {
            id: CoinId::from("u3"),
            owner: owner.public_hex(),
            value: 1.0,
            locked: false,
        })
        .unwrap();

        let mut new_coins = BTreeMap::new();
        new_coins.insert(
            CoinId::from("u4"),
            DivideEntry {
                owner: pd.public_hex(),
                value: 0.5,
            },
        );
        let payload = DividePayload {
            coin: CoinId::from("u3"),
            new_coins,
        };
        let message = canonical_message(&payload).unwrap();
        let agg = ledger_crypto::aggregate_scalars(&[*pd.secret(), *owner.secret()]);
        let sig = SignatureHex(hex::encode(ledger_crypto::sign(&agg, &message)));
        let err = validate(&payload, &sig, &db).unwrap_err();
        assert!(matches!(err, LedgerError::SumMismatch));
    }
}
