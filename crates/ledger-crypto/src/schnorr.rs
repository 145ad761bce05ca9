use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};

use crate::error::CryptoError;
use crate::keypair::decode_point;

const SIGNATURE_LEN: usize = 64;

fn hash_to_scalar(parts: &[&[u8]]) -> Scalar {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    Scalar::from_bytes_mod_order_wide(digest.as_slice().try_into().expect("sha512 is 64 bytes"))
}

fn derive_nonce(secret: &Scalar, message: &[u8]) -> Scalar {
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);
    hash_to_scalar(&[secret.as_bytes(), message, &salt])
}

/// Sign `message` under `secret`. Returns `R || s`, 64 bytes.
pub fn sign(secret: &Scalar, message: &[u8]) -> Vec<u8> {
    let public = secret * RISTRETTO_BASEPOINT_POINT;
    let k = derive_nonce(secret, message);
    let r_point = k * RISTRETTO_BASEPOINT_POINT;
    let r_bytes = r_point.compress().to_bytes();
    let e = hash_to_scalar(&[&r_bytes, public.compress().to_bytes().as_slice(), message]);
    let s = k + e * secret;

    let mut out = Vec::with_capacity(SIGNATURE_LEN);
    out.extend_from_slice(&r_bytes);
    out.extend_from_slice(s.as_bytes());
    out
}

/// Verify a signature produced by `sign` under `public`.
pub fn verify(public: &RistrettoPoint, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::InvalidSignatureLength);
    }
    let r_bytes: [u8; 32] = signature[..32].try_into().unwrap();
    let s_bytes: [u8; 32] = signature[32..].try_into().unwrap();

    let r_point = CompressedRistretto(r_bytes)
        .decompress()
        .ok_or(CryptoError::InvalidPoint)?;
    let s = Scalar::from_canonical_bytes(s_bytes).ok_or(CryptoError::InvalidSignatureLength)?;

    let e = hash_to_scalar(&[&r_bytes, public.compress().to_bytes().as_slice(), message]);
    let lhs = s * RISTRETTO_BASEPOINT_POINT;
    let rhs = r_point + e * public;
    if lhs == rhs {
        Ok(())
    } else {
        Err(CryptoError::VerificationFailed)
    }
}

/// Verify a signature under the hex-encoded aggregate public key obtained
/// by summing every key in `public_keys_hex`.
pub fn verify_aggregate(
    public_keys_hex: &[&str],
    message: &[u8],
    signature_hex: &str,
) -> Result<(), CryptoError> {
    let aggregate = aggregate_pubkeys_hex(public_keys_hex)?;
    let signature = hex::decode(signature_hex)?;
    verify(&aggregate, message, &signature)
}

/// `Σ Pᵢ` over the hex-encoded public keys, in the order given (irrelevant
/// to the result — group addition is commutative — but callers pass them
/// in the canonical order defined per transaction kind for clarity).
pub fn aggregate_pubkeys_hex(public_keys_hex: &[&str]) -> Result<RistrettoPoint, CryptoError> {
    let mut sum = RistrettoPoint::identity();
    for key in public_keys_hex {
        sum += decode_point(key)?;
    }
    Ok(sum)
}

/// `Σ sᵢ` over private scalars — used off-ledger by cooperating signers to
/// produce the one scalar that signs on behalf of the whole group.
pub fn aggregate_scalars(secrets: &[Scalar]) -> Scalar {
    secrets.iter().fold(Scalar::zero(), |acc, s| acc + s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeyPair;

    #[test]
    fn sign_verify_round_trip() {
        let kp = KeyPair::generate();
        let msg = b"hello ledger";
        let sig = sign(kp.secret(), msg);
        verify(&kp.public, msg, &sig).unwrap();
    }

    #[test]
    fn tampered_message_fails() {
        let kp = KeyPair::generate();
        let sig = sign(kp.secret(), b"original");
        assert!(verify(&kp.public, b"tampered", &sig).is_err());
    }

    #[test]
    fn aggregate_signature_verifies_under_aggregate_key() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        let c = KeyPair::generate();

        let combined_secret = aggregate_scalars(&[*a.secret(), *b.secret(), *c.secret()]);
        let combined_public = a.public + b.public + c.public;

        let msg = b"aggregate test";
        let sig = sign(&combined_secret, msg);
        verify(&combined_public, msg, &sig).unwrap();

        let a_hex = a.public_hex();
        let b_hex = b.public_hex();
        let c_hex = c.public_hex();
        verify_aggregate(
            &[a_hex.as_str(), b_hex.as_str(), c_hex.as_str()],
            msg,
            &hex::encode(&sig),
        )
        .unwrap();
    }

    #[test]
    fn aggregate_order_does_not_matter() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        let forward = aggregate_pubkeys_hex(&[a.public_hex().0.as_str(), b.public_hex().0.as_str()])
            .unwrap();
        let backward =
            aggregate_pubkeys_hex(&[b.public_hex().0.as_str(), a.public_hex().0.as_str()]).unwrap();
        assert_eq!(forward, backward);
    }
}
