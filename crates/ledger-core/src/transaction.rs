use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CoinId, PubKeyHex, SignatureHex, TxHash};

// ── DLEQ proof types ────────────────────────────────────────────────────────

/// The non-interactive DLEQ proof anchored on-chain at SEND time.
/// Fields are declared in this exact order because it is part of the
/// canonical encoding that the transaction hash and signatures cover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DleqProof {
    #[serde(rename = "CHex")]
    pub c_hex: String,
    #[serde(rename = "RHex")]
    pub r_hex: String,
    #[serde(rename = "VGHex")]
    pub vg_hex: String,
    #[serde(rename = "VHHex")]
    pub vh_hex: String,
}

/// The verification points revealed at RECEIVE time — the off-chain
/// "receipt secret" that ties the SEND's proof back to a real discrete-log
/// equality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofVerification {
    #[serde(rename = "GHex")]
    pub g_hex: String,
    #[serde(rename = "HHex")]
    pub h_hex: String,
    #[serde(rename = "XGHex")]
    pub xg_hex: String,
    #[serde(rename = "XHHex")]
    pub xh_hex: String,
}

// ── Per-kind payloads ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InflatePayload {
    pub coin: CoinId,
    pub value: f64,
    pub owner: PubKeyHex,
    pub inflator: PubKeyHex,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxPayload {
    pub percentage: i32,
    pub inflator: PubKeyHex,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SumPayload {
    pub coins: Vec<CoinId>,
    pub new_coin: CoinId,
    pub new_owner: PubKeyHex,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DivideEntry {
    pub owner: PubKeyHex,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DividePayload {
    pub coin: CoinId,
    /// Keyed by new coin id; a `BTreeMap` so iteration is always sorted by
    /// key, matching the canonical JSON map order the signature covers.
    pub new_coins: BTreeMap<CoinId, DivideEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendPayload {
    pub coins: Vec<CoinId>,
    pub fee: Vec<CoinId>,
    pub proof: DleqProof,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceivePayload {
    pub transaction_hash: TxHash,
    pub new_owners: BTreeMap<CoinId, PubKeyHex>,
    pub proof_verification: ProofVerification,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrieveFeePayload {
    pub transaction_hash: TxHash,
    pub new_owners: BTreeMap<CoinId, PubKeyHex>,
    pub inflator: PubKeyHex,
}

// ── Tagged union ─────────────────────────────────────────────────────────────

/// One variant per transaction kind. The discriminator string used on the
/// wire is given in `wire_type`; `"devide"` decodes to `Divide` as a
/// documented alias for `"divide"` (see the historical misspelling note).
#[derive(Clone, Debug, PartialEq)]
pub enum TxKind {
    Inflate(InflatePayload),
    Tax(TaxPayload),
    Sum(SumPayload),
    Divide(DividePayload),
    Send(SendPayload),
    Receive(ReceivePayload),
    RetrieveFee(RetrieveFeePayload),
}

impl TxKind {
    /// The canonical wire discriminator for this kind. Always `"divide"`,
    /// never the `"devide"` alias, even if the envelope was decoded from
    /// the alias spelling.
    pub fn wire_type(&self) -> &'static str {
        match self {
            TxKind::Inflate(_) => "inflate",
            TxKind::Tax(_) => "tax",
            TxKind::Sum(_) => "sum",
            TxKind::Divide(_) => "divide",
            TxKind::Send(_) => "send",
            TxKind::Receive(_) => "receive",
            TxKind::RetrieveFee(_) => "retrieve_fee",
        }
    }
}

/// The raw envelope shape as it appears on the wire, before the `Data`
/// field is interpreted according to `Type`.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Signature")]
    signature: SignatureHex,
    #[serde(rename = "Data")]
    data: serde_json::Value,
}

/// A decoded, signed transaction ready for validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub kind: TxKind,
    pub signature: SignatureHex,
}

impl Envelope {
    /// Decode a wire-format JSON envelope. `"devide"` is accepted as an
    /// alias for `"divide"`; any other unrecognized `Type` is reported as
    /// `UnknownAction`, which carries the standard "unknown action" log and
    /// the `UNAUTHORIZED` code, not an encoding error — the envelope itself
    /// was well-formed JSON.
    pub fn decode(bytes: &[u8]) -> Result<Self, crate::error::LedgerError> {
        let raw: RawEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| crate::error::LedgerError::Encoding(e.to_string()))?;
        let to_err = |e: serde_json::Error| crate::error::LedgerError::Encoding(e.to_string());
        let kind = match raw.kind.as_str() {
            "inflate" => TxKind::Inflate(serde_json::from_value(raw.data).map_err(to_err)?),
            "tax" => TxKind::Tax(serde_json::from_value(raw.data).map_err(to_err)?),
            "sum" => TxKind::Sum(serde_json::from_value(raw.data).map_err(to_err)?),
            "divide" | "devide" => {
                TxKind::Divide(serde_json::from_value(raw.data).map_err(to_err)?)
            }
            "send" => TxKind::Send(serde_json::from_value(raw.data).map_err(to_err)?),
            "receive" => TxKind::Receive(serde_json::from_value(raw.data).map_err(to_err)?),
            "retrieve_fee" => {
                TxKind::RetrieveFee(serde_json::from_value(raw.data).map_err(to_err)?)
            }
            other => return Err(crate::error::LedgerError::UnknownAction(other.to_string())),
        };
        Ok(Envelope {
            kind,
            signature: raw.signature,
        })
    }
}
