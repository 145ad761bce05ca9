use ledger_core::{LedgerError, ReceivePayload, SignatureHex};

use super::{canonical_message, verify_schnorr};
use crate::db::StateDb;

pub fn validate(payload: &ReceivePayload, signature: &SignatureHex, db: &StateDb) -> Result<(), LedgerError> {
    if payload.transaction_hash.is_empty() {
        return Err(LedgerError::EmptyField("transaction_hash"));
    }
    let record = db
        .get_transaction(&payload.transaction_hash)?
        .ok_or_else(|| LedgerError::TransactionNotFound(payload.transaction_hash.clone()))?;

    if payload.new_owners.len() != record.coins.len() {
        return Err(LedgerError::EmptyField("new_owners"));
    }
    for coin_id in payload.new_owners.keys() {
        if !record.coins.contains(coin_id) {
            return Err(LedgerError::CoinNotInTransaction(coin_id.clone()));
        }
    }
    for owner in payload.new_owners.values() {
        if db.owner_exists(owner) {
            return Err(LedgerError::OwnerAlreadyExists(owner.clone()));
        }
    }

    let (g, h, xg, xh) = ledger_crypto::dleq::decode_verification(&payload.proof_verification)
        .map_err(|e| LedgerError::MalformedProofVerification(e.to_string()))?;
    let proof = ledger_crypto::dleq::ProofPoints::from_wire(&record.proof)
        .map_err(|_| LedgerError::InvalidProof)?;
    ledger_crypto::dleq::verify(&g, &h, &xg, &xh, &proof).map_err(|_| LedgerError::InvalidProof)?;

    let message = canonical_message(payload)?;
    // new_owners is a BTreeMap, so iterating `.values()` yields canonical
    // (lexicographic-key) order.
    let keys_hex: Vec<&str> = payload.new_owners.values().map(|o| o.as_str()).collect();
    verify_schnorr(&keys_hex, &message, signature)?;

    if record.coins_received {
        return Err(LedgerError::TransactionHasBeenReceived);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
    use curve25519_dalek::scalar::Scalar;
    use ledger_core::{Coin, CoinId, TransactionRecord};
    use ledger_crypto::KeyPair;
    use std::collections::BTreeMap;

    fn setup_sent_transaction(db: &StateDb) -> (ledger_core::TxHash, Scalar, curve25519_dalek::ristretto::RistrettoPoint) {
        let sender = KeyPair::generate();
        db.add_coin(&Coin {
            id: CoinId::from("u1"),
            owner: sender.public_hex(),
            value: 1.0,
            locked: true,
        })
        .unwrap();

        let h_base = RISTRETTO_BASEPOINT_POINT * Scalar::from(7u64);
        let x = Scalar::from(42u64);
        let (_xg, _xh, proof) = ledger_crypto::dleq::prove(&x, &RISTRETTO_BASEPOINT_POINT, &h_base);
        let hash = ledger_core::TxHash("hash1".into());
        db.add_transaction(
            &hash,
            &TransactionRecord {
                coins: vec![CoinId::from("u1")],
                fee: vec![],
                proof: proof.to_wire(),
                coins_received: false,
                fee_received: false,
                tax_percentage_at_send: 0,
            },
        )
        .unwrap();
        (hash, x, h_base)
    }

    #[test]
    fn accepts_valid_receive() {
        let db = StateDb::open_temporary().unwrap();
        let (hash, x, h_base) = setup_sent_transaction(&db);
        let new_owner = KeyPair::generate();

        let xg = x * RISTRETTO_BASEPOINT_POINT;
        let xh = x * h_base;
        let mut new_owners = BTreeMap::new();
        new_owners.insert(CoinId::from("u1"), new_owner.public_hex());
        let payload = ReceivePayload {
            transaction_hash: hash,
            new_owners,
            proof_verification: ledger_core::ProofVerification {
                g_hex: ledger_crypto::encode_point(&RISTRETTO_BASEPOINT_POINT),
                h_hex: ledger_crypto::encode_point(&h_base),
                xg_hex: ledger_crypto::encode_point(&xg),
                xh_hex: ledger_crypto::encode_point(&xh),
            },
        };
        let message = canonical_message(&payload).unwrap();
        let sig = SignatureHex(hex::encode(ledger_crypto::sign(new_owner.secret(), &message)));
        validate(&payload, &sig, &db).unwrap();
    }

    #[test]
    fn rejects_already_received() {
        let db = StateDb::open_temporary().unwrap();
        let (hash, x, h_base) = setup_sent_transaction(&db);
        db.mark_coins_received(&hash).unwrap();
        let new_owner = KeyPair::generate();

        let xg = x * RISTRETTO_BASEPOINT_POINT;
        let xh = x * h_base;
        let mut new_owners = BTreeMap::new();
        new_owners.insert(CoinId::from("u1"), new_owner.public_hex());
        let payload = ReceivePayload {
            transaction_hash: hash,
            new_owners,
            proof_verification: ledger_core::ProofVerification {
                g_hex: ledger_crypto::encode_point(&RISTRETTO_BASEPOINT_POINT),
                h_hex: ledger_crypto::encode_point(&h_base),
                xg_hex: ledger_crypto::encode_point(&xg),
                xh_hex: ledger_crypto::encode_point(&xh),
            },
        };
        let message = canonical_message(&payload).unwrap();
        let sig = SignatureHex(hex::encode(ledger_crypto::sign(new_owner.secret(), &message)));
        let err = validate(&payload, &sig, &db).unwrap_err();
        assert!(matches!(err, LedgerError::TransactionHasBeenReceived));
    }
}
