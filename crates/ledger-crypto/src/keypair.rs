use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use ledger_core::PubKeyHex;

use crate::error::CryptoError;

/// A Schnorr keypair over Ristretto255. The secret is a bare scalar — not
/// hashed-and-clamped the way full EdDSA derives one from a seed — because
/// the aggregate signing scheme (§4.1) requires secret scalars that sum
/// linearly: `sign(Σ sᵢ, m)` must verify under `Σ Pᵢ`.
pub struct KeyPair {
    secret: Scalar,
    pub public: RistrettoPoint,
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public.compress().to_bytes()))
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    pub fn generate() -> Self {
        let mut rng = OsRng;
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        let secret = Scalar::from_bytes_mod_order_wide(&bytes);
        let public = secret * RISTRETTO_BASEPOINT_POINT;
        KeyPair { secret, public }
    }

    pub fn from_scalar(secret: Scalar) -> Self {
        let public = secret * RISTRETTO_BASEPOINT_POINT;
        KeyPair { secret, public }
    }

    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    pub fn public_hex(&self) -> PubKeyHex {
        PubKeyHex(hex::encode(self.public.compress().to_bytes()))
    }
}

/// Decode a lowercase-hex-encoded compressed Ristretto point.
pub fn decode_point(hex_str: &str) -> Result<RistrettoPoint, CryptoError> {
    let bytes = hex::decode(hex_str)?;
    if bytes.len() != 32 {
        return Err(CryptoError::InvalidPoint);
    }
    curve25519_dalek::ristretto::CompressedRistretto::from_slice(&bytes)
        .decompress()
        .ok_or(CryptoError::InvalidPoint)
}

pub fn encode_point(point: &RistrettoPoint) -> String {
    hex::encode(point.compress().to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_hex_round_trips_through_decode_point() {
        let kp = KeyPair::generate();
        let decoded = decode_point(kp.public_hex().as_str()).unwrap();
        assert_eq!(decoded, kp.public);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(decode_point("not-hex").is_err());
        assert!(decode_point("ab").is_err());
    }
}
