use ledger_codec::sha256_hex;
use ledger_core::{
    Coin, DivideEntry, Envelope, InflatorSet, LedgerError, TaxRecord, TransactionRecord, TxHash,
    TxKind, CODE_ENCODING_ERROR, CODE_OK,
};
use tracing::{debug, info, warn};

use crate::db::StateDb;
use crate::validate;

/// The state transition engine: C5 (validators) + C6 (applier) + C8 (the
/// ABCI-shaped adapter), wired over a single `StateDb`.
///
/// `check_tx` runs the validator only and never mutates state. `deliver_tx`
/// runs the validator and, only on success, the applier — matching the
/// single-writer, total-order contract the consensus driver guarantees
/// upstream.
pub struct LedgerEngine {
    db: StateDb,
    inflators: InflatorSet,
}

impl LedgerEngine {
    pub fn new(db: StateDb, inflators: InflatorSet) -> Self {
        Self { db, inflators }
    }

    pub fn db(&self) -> &StateDb {
        &self.db
    }

    /// Validate `tx` without mutating state. Returns `(code, log)`.
    pub fn check_tx(&self, tx: &[u8]) -> (u32, String) {
        let envelope = match Envelope::decode(tx) {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "check_tx: encoding error");
                return (e.code(), e.to_string());
            }
        };
        match self.validate(&envelope) {
            Ok(()) => {
                debug!(kind = envelope.kind.wire_type(), "check_tx: accepted");
                (CODE_OK, String::new())
            }
            Err(e) => {
                debug!(kind = envelope.kind.wire_type(), error = %e, "check_tx: rejected");
                (e.code(), e.to_string())
            }
        }
    }

    /// Validate then apply `tx`. Returns `(code, log)`. State is mutated
    /// only when the validator returned `OK`.
    pub fn deliver_tx(&self, tx: &[u8]) -> (u32, String) {
        let envelope = match Envelope::decode(tx) {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "deliver_tx: encoding error");
                return (e.code(), e.to_string());
            }
        };
        if let Err(e) = self.validate(&envelope) {
            warn!(kind = envelope.kind.wire_type(), code = e.code(), error = %e, "deliver_tx: rejected");
            return (e.code(), e.to_string());
        }
        match self.apply(&envelope) {
            Ok(hash) => {
                info!(kind = envelope.kind.wire_type(), tx_hash = hash.as_deref().unwrap_or(""), "deliver_tx: applied");
                (CODE_OK, String::new())
            }
            Err(e) => {
                // The validator already returned OK; any failure here is a
                // ledger invariant violation, not a user error.
                warn!(kind = envelope.kind.wire_type(), error = %e, "deliver_tx: applier post-condition violated");
                (e.code(), e.to_string())
            }
        }
    }

    fn validate(&self, envelope: &Envelope) -> Result<(), LedgerError> {
        match &envelope.kind {
            TxKind::Inflate(p) => {
                validate::validate_inflate(p, &envelope.signature, &self.db, &self.inflators)
            }
            TxKind::Tax(p) => {
                validate::validate_tax(p, &envelope.signature, &self.db, &self.inflators)
            }
            TxKind::Sum(p) => validate::validate_sum(p, &envelope.signature, &self.db),
            TxKind::Divide(p) => validate::validate_divide(p, &envelope.signature, &self.db),
            TxKind::Send(p) => validate::validate_send(p, &envelope.signature, &self.db),
            TxKind::Receive(p) => validate::validate_receive(p, &envelope.signature, &self.db),
            TxKind::RetrieveFee(p) => {
                validate::validate_retrieve_fee(p, &envelope.signature, &self.db, &self.inflators)
            }
        }
    }

    /// Apply a transaction already confirmed `OK` by `validate`. Returns the
    /// transaction hash for SEND (for logging), `None` otherwise.
    fn apply(&self, envelope: &Envelope) -> Result<Option<String>, LedgerError> {
        match &envelope.kind {
            TxKind::Inflate(p) => {
                self.db.add_coin(&Coin {
                    id: p.coin.clone(),
                    owner: p.owner.clone(),
                    value: p.value,
                    locked: false,
                })?;
                Ok(None)
            }
            TxKind::Tax(p) => {
                self.db.set_tax(&TaxRecord {
                    percentage: p.percentage,
                    inflator: p.inflator.clone(),
                })?;
                Ok(None)
            }
            TxKind::Sum(p) => {
                let mut total = 0.0;
                let mut coins = Vec::with_capacity(p.coins.len());
                for coin_id in &p.coins {
                    let coin = self
                        .db
                        .get_coin(coin_id)?
                        .ok_or_else(|| LedgerError::CoinNotFound(coin_id.clone()))?;
                    total += coin.value;
                    coins.push(coin);
                }
                for coin in &coins {
                    self.db.delete_coin_and_owner(coin)?;
                }
                self.db.add_coin(&Coin {
                    id: p.new_coin.clone(),
                    owner: p.new_owner.clone(),
                    value: total,
                    locked: false,
                })?;
                Ok(None)
            }
            TxKind::Divide(p) => {
                let coin = self
                    .db
                    .get_coin(&p.coin)?
                    .ok_or_else(|| LedgerError::CoinNotFound(p.coin.clone()))?;
                self.db.delete_coin_and_owner(&coin)?;
                for (new_id, entry) in &p.new_coins {
                    self.db.add_coin(&Coin {
                        id: new_id.clone(),
                        owner: entry.owner.clone(),
                        value: entry.value,
                        locked: false,
                    })?;
                }
                Ok(None)
            }
            TxKind::Send(p) => {
                let hash = TxHash(sha256_hex(&p.coins).map_err(|e| LedgerError::Encoding(e.to_string()))?);
                let tax_percentage_at_send = self.db.get_tax()?.map(|t| t.percentage).unwrap_or(0);
                self.db.add_transaction(
                    &hash,
                    &TransactionRecord {
                        coins: p.coins.clone(),
                        fee: p.fee.clone(),
                        proof: p.proof.clone(),
                        coins_received: false,
                        fee_received: false,
                        tax_percentage_at_send,
                    },
                )?;
                for coin_id in p.coins.iter().chain(p.fee.iter()) {
                    self.db.lock_coin(coin_id)?;
                }
                Ok(Some(hash.0))
            }
            TxKind::Receive(p) => {
                for (coin_id, new_owner) in &p.new_owners {
                    self.db.unlock_coin(coin_id)?;
                    self.db.set_new_owner(coin_id, new_owner)?;
                }
                self.db.mark_coins_received(&p.transaction_hash)?;
                Ok(Some(p.transaction_hash.0.clone()))
            }
            TxKind::RetrieveFee(p) => {
                self.db.mark_fee_received(&p.transaction_hash)?;
                for (coin_id, new_owner) in &p.new_owners {
                    self.db.unlock_coin(coin_id)?;
                    self.db.set_new_owner(coin_id, new_owner)?;
                }
                Ok(Some(p.transaction_hash.0.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{CoinId, DleqProof, ProofVerification, PubKeyHex, SendPayload};
    use ledger_crypto::KeyPair;
    use std::collections::BTreeMap;

    fn sign_envelope(kind: TxKind, keys: &[&KeyPair]) -> Vec<u8> {
        let secrets: Vec<_> = keys.iter().map(|k| *k.secret()).collect();
        let agg = ledger_crypto::aggregate_scalars(&secrets);
        let message = match &kind {
            TxKind::Inflate(p) => ledger_codec::canonical_json(p).unwrap(),
            TxKind::Tax(p) => ledger_codec::canonical_json(p).unwrap(),
            TxKind::Sum(p) => ledger_codec::canonical_json(p).unwrap(),
            TxKind::Divide(p) => ledger_codec::canonical_json(p).unwrap(),
            TxKind::Send(p) => ledger_codec::canonical_json(p).unwrap(),
            TxKind::Receive(p) => ledger_codec::canonical_json(p).unwrap(),
            TxKind::RetrieveFee(p) => ledger_codec::canonical_json(p).unwrap(),
        };
        let sig = hex::encode(ledger_crypto::sign(&agg, &message));
        let data = match &kind {
            TxKind::Inflate(p) => serde_json::to_value(p).unwrap(),
            TxKind::Tax(p) => serde_json::to_value(p).unwrap(),
            TxKind::Sum(p) => serde_json::to_value(p).unwrap(),
            TxKind::Divide(p) => serde_json::to_value(p).unwrap(),
            TxKind::Send(p) => serde_json::to_value(p).unwrap(),
            TxKind::Receive(p) => serde_json::to_value(p).unwrap(),
            TxKind::RetrieveFee(p) => serde_json::to_value(p).unwrap(),
        };
        let envelope = serde_json::json!({
            "Type": kind.wire_type(),
            "Signature": sig,
            "Data": data,
        });
        serde_json::to_vec(&envelope).unwrap()
    }

    fn sample_proof() -> DleqProof {
        DleqProof {
            c_hex: "00".repeat(32),
            r_hex: "01".repeat(32),
            vg_hex: hex::encode(
                curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT
                    .compress()
                    .to_bytes(),
            ),
            vh_hex: hex::encode(
                curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT
                    .compress()
                    .to_bytes(),
            ),
        }
    }

    #[test]
    fn mint_and_query_scenario() {
        let inflator = KeyPair::generate();
        let owner = KeyPair::generate();
        let set = InflatorSet::new([inflator.public_hex()]);
        let engine = LedgerEngine::new(StateDb::open_temporary().unwrap(), set);

        let tx = sign_envelope(
            TxKind::Inflate(ledger_core::InflatePayload {
                coin: CoinId::from("u1"),
                value: 0.50,
                owner: owner.public_hex(),
                inflator: inflator.public_hex(),
            }),
            &[&inflator, &owner],
        );
        let (code, log) = engine.deliver_tx(&tx);
        assert_eq!(code, CODE_OK, "{log}");

        let coin = engine.db().get_coin(&CoinId::from("u1")).unwrap().unwrap();
        assert_eq!(coin.value, 0.50);
        assert_eq!(coin.owner, owner.public_hex());
        assert!(!coin.locked);
    }

    #[test]
    fn sum_then_divide_scenario() {
        let inflator = KeyPair::generate();
        let pa = KeyPair::generate();
        let pb = KeyPair::generate();
        let pc = KeyPair::generate();
        let pd = KeyPair::generate();
        let pe = KeyPair::generate();
        let set = InflatorSet::new([inflator.public_hex()]);
        let engine = LedgerEngine::new(StateDb::open_temporary().unwrap(), set);

        for (id, owner, value) in [("u1", &pa, 0.50), ("u2", &pb, 0.50)] {
            let tx = sign_envelope(
                TxKind::Inflate(ledger_core::InflatePayload {
                    coin: CoinId::from(id),
                    value,
                    owner: owner.public_hex(),
                    inflator: inflator.public_hex(),
                }),
                &[&inflator, owner],
            );
            let (code, log) = engine.deliver_tx(&tx);
            assert_eq!(code, CODE_OK, "{log}");
        }

        let sum_tx = sign_envelope(
            TxKind::Sum(ledger_core::SumPayload {
                coins: vec![CoinId::from("u1"), CoinId::from("u2")],
                new_coin: CoinId::from("u3"),
                new_owner: pc.public_hex(),
            }),
            &[&pc, &pa, &pb],
        );
        let (code, log) = engine.deliver_tx(&sum_tx);
        assert_eq!(code, CODE_OK, "{log}");
        assert!(engine.db().get_coin(&CoinId::from("u1")).unwrap().is_none());
        assert!(engine.db().get_coin(&CoinId::from("u2")).unwrap().is_none());
        assert_eq!(
            engine.db().get_coin(&CoinId::from("u3")).unwrap().unwrap().value,
            1.0
        );

        let mut new_coins = BTreeMap::new();
        new_coins.insert(
            CoinId::from("u4"),
            DivideEntry {
                owner: pd.public_hex(),
                value: 0.50,
            },
        );
        new_coins.insert(
            CoinId::from("u5"),
            DivideEntry {
                owner: pe.public_hex(),
                value: 0.50,
            },
        );
        let divide_tx = sign_envelope(
            TxKind::Divide(ledger_core::DividePayload {
                coin: CoinId::from("u3"),
                new_coins,
            }),
            &[&pd, &pe, &pc],
        );
        let (code, log) = engine.deliver_tx(&divide_tx);
        assert_eq!(code, CODE_OK, "{log}");
        assert!(engine.db().get_coin(&CoinId::from("u3")).unwrap().is_none());
        assert_eq!(
            engine.db().get_coin(&CoinId::from("u4")).unwrap().unwrap().owner,
            pd.public_hex()
        );
        assert_eq!(
            engine.db().get_coin(&CoinId::from("u5")).unwrap().unwrap().owner,
            pe.public_hex()
        );
    }

    #[test]
    fn send_receive_scenario_rejects_second_receive() {
        let inflator = KeyPair::generate();
        let pa = KeyPair::generate();
        let pn = KeyPair::generate();
        let set = InflatorSet::new([inflator.public_hex()]);
        let engine = LedgerEngine::new(StateDb::open_temporary().unwrap(), set);

        let mint_tx = sign_envelope(
            TxKind::Inflate(ledger_core::InflatePayload {
                coin: CoinId::from("u1"),
                value: 1.0,
                owner: pa.public_hex(),
                inflator: inflator.public_hex(),
            }),
            &[&inflator, &pa],
        );
        assert_eq!(engine.deliver_tx(&mint_tx).0, CODE_OK);

        let g = curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
        let h = g * curve25519_dalek::scalar::Scalar::from(7u64);
        let x = curve25519_dalek::scalar::Scalar::from(42u64);
        let (xg, xh, proof) = ledger_crypto::dleq::prove(&x, &g, &h);

        let send_tx = sign_envelope(
            TxKind::Send(SendPayload {
                coins: vec![CoinId::from("u1")],
                fee: vec![],
                proof: proof.to_wire(),
            }),
            &[&pa],
        );
        let (code, log) = engine.deliver_tx(&send_tx);
        assert_eq!(code, CODE_OK, "{log}");
        assert!(engine.db().is_coin_locked(&CoinId::from("u1")).unwrap());

        let hash = TxHash(sha256_hex(&vec![CoinId::from("u1")]).unwrap());
        let mut new_owners = BTreeMap::new();
        new_owners.insert(CoinId::from("u1"), pn.public_hex());
        let receive_tx = sign_envelope(
            TxKind::Receive(ledger_core::ReceivePayload {
                transaction_hash: hash,
                new_owners: new_owners.clone(),
                proof_verification: ProofVerification {
                    g_hex: ledger_crypto::encode_point(&g),
                    h_hex: ledger_crypto::encode_point(&h),
                    xg_hex: ledger_crypto::encode_point(&xg),
                    xh_hex: ledger_crypto::encode_point(&xh),
                },
            }),
            &[&pn],
        );
        let (code, log) = engine.deliver_tx(&receive_tx);
        assert_eq!(code, CODE_OK, "{log}");
        let coin = engine.db().get_coin(&CoinId::from("u1")).unwrap().unwrap();
        assert!(!coin.locked);
        assert_eq!(coin.owner, pn.public_hex());
        assert!(engine.db().get_owner(&pa.public_hex()).unwrap().is_none());

        let (code, _) = engine.deliver_tx(&receive_tx);
        assert_eq!(code, ledger_core::CODE_UNAUTHORIZED);
    }

    #[test]
    fn unknown_type_is_unauthorized() {
        let set = InflatorSet::new([PubKeyHex("x".into())]);
        let engine = LedgerEngine::new(StateDb::open_temporary().unwrap(), set);
        let tx = br#"{"Type":"levitate","Signature":"ab","Data":{}}"#;
        let (code, log) = engine.check_tx(tx);
        assert_eq!(code, ledger_core::CODE_UNAUTHORIZED);
        assert!(log.contains("unknown action"));
    }

    #[test]
    fn malformed_envelope_is_encoding_error() {
        let set = InflatorSet::new([PubKeyHex("x".into())]);
        let engine = LedgerEngine::new(StateDb::open_temporary().unwrap(), set);
        let (code, _) = engine.check_tx(b"not json at all");
        assert_eq!(code, CODE_ENCODING_ERROR);
    }
}
