//! Chaum-Pedersen discrete-log equality proof: proves knowledge of a
//! scalar `x` such that `xG = x·G` and `xH = x·H` without revealing `x`.
//!
//! The SEND transaction stores only `(C, R, VG, VH)`; the four points
//! `G, H, xG, xH` are the off-chain "receipt secret" revealed later at
//! RECEIVE.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};

use ledger_core::{DleqProof, ProofVerification};

use crate::error::CryptoError;
use crate::keypair::decode_point;

fn hash_to_scalar(points: &[&RistrettoPoint]) -> Scalar {
    let mut hasher = Sha512::new();
    for p in points {
        hasher.update(p.compress().to_bytes());
    }
    let digest = hasher.finalize();
    Scalar::from_bytes_mod_order_wide(digest.as_slice().try_into().expect("sha512 is 64 bytes"))
}

fn random_scalar() -> Scalar {
    let mut bytes = [0u8; 64];
    OsRng.fill_bytes(&mut bytes);
    Scalar::from_bytes_mod_order_wide(&bytes)
}

/// The proof tuple as group elements, before hex encoding for storage.
pub struct ProofPoints {
    pub c: Scalar,
    pub r: Scalar,
    pub vg: RistrettoPoint,
    pub vh: RistrettoPoint,
}

/// Produce `(xG, xH, proof)` for secret `x` over bases `g`, `h`. `xG`/`xH`
/// are the verification points to be revealed later at RECEIVE; `proof` is
/// what gets anchored on-chain at SEND.
pub fn prove(x: &Scalar, g: &RistrettoPoint, h: &RistrettoPoint) -> (RistrettoPoint, RistrettoPoint, ProofPoints) {
    let xg = x * g;
    let xh = x * h;

    let k = random_scalar();
    let vg = k * g;
    let vh = k * h;
    let c = hash_to_scalar(&[g, h, &xg, &xh, &vg, &vh]);
    let r = k - c * x;

    (xg, xh, ProofPoints { c, r, vg, vh })
}

/// Verify that `proof` demonstrates `xg = x·g`, `xh = x·h` for some `x`,
/// without learning `x`.
pub fn verify(
    g: &RistrettoPoint,
    h: &RistrettoPoint,
    xg: &RistrettoPoint,
    xh: &RistrettoPoint,
    proof: &ProofPoints,
) -> Result<(), CryptoError> {
    let vg_check = proof.r * g + proof.c * xg;
    let vh_check = proof.r * h + proof.c * xh;
    if vg_check != proof.vg || vh_check != proof.vh {
        return Err(CryptoError::ProofVerificationFailed);
    }
    let c_check = hash_to_scalar(&[g, h, xg, xh, &proof.vg, &proof.vh]);
    if c_check != proof.c {
        return Err(CryptoError::ProofVerificationFailed);
    }
    Ok(())
}

fn encode_scalar(s: &Scalar) -> String {
    hex::encode(s.as_bytes())
}

fn decode_scalar(hex_str: &str) -> Result<Scalar, CryptoError> {
    let bytes = hex::decode(hex_str)?;
    let arr: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidSignatureLength)?;
    Scalar::from_canonical_bytes(arr).ok_or(CryptoError::InvalidSignatureLength)
}

impl ProofPoints {
    pub fn to_wire(&self) -> DleqProof {
        DleqProof {
            c_hex: encode_scalar(&self.c),
            r_hex: encode_scalar(&self.r),
            vg_hex: crate::keypair::encode_point(&self.vg),
            vh_hex: crate::keypair::encode_point(&self.vh),
        }
    }

    pub fn from_wire(proof: &DleqProof) -> Result<Self, CryptoError> {
        Ok(ProofPoints {
            c: decode_scalar(&proof.c_hex)?,
            r: decode_scalar(&proof.r_hex)?,
            vg: decode_point(&proof.vg_hex)?,
            vh: decode_point(&proof.vh_hex)?,
        })
    }
}

/// Decode the four revealed verification points from a RECEIVE payload, in
/// `(G, H, XG, XH)` order.
pub fn decode_verification(
    pv: &ProofVerification,
) -> Result<(RistrettoPoint, RistrettoPoint, RistrettoPoint, RistrettoPoint), CryptoError> {
    Ok((
        decode_point(&pv.g_hex)?,
        decode_point(&pv.h_hex)?,
        decode_point(&pv.xg_hex)?,
        decode_point(&pv.xh_hex)?,
    ))
}
