//! ECDSA and Schnorr signing over 32-byte message hashes.
//!
//! Every signature in the wire format covers a SHA-256 digest computed by the
//! caller, so all functions here take the digest directly (prehash APIs).

use crate::CryptoError;
use dpos_types::{PrivateKey, PublicKey, SignatureBytes};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::schnorr;

/// Sign a digest with deterministic (RFC6979) ECDSA, returning the DER encoding.
pub fn sign_ecdsa(hash: &[u8; 32], private_key: &PrivateKey) -> Result<SignatureBytes, CryptoError> {
    let signing_key =
        SigningKey::from_slice(&private_key.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let signature: EcdsaSignature = signing_key
        .sign_prehash(hash)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    let signature = signature.normalize_s().unwrap_or(signature);
    Ok(SignatureBytes(signature.to_der().as_bytes().to_vec()))
}

/// Verify a DER encoded ECDSA signature. High-S signatures are normalized first.
pub fn verify_ecdsa(hash: &[u8; 32], signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key.as_bytes()) else {
        return false;
    };
    let Ok(signature) = EcdsaSignature::from_der(signature) else {
        return false;
    };
    let signature = signature.normalize_s().unwrap_or(signature);
    verifying_key.verify_prehash(hash, &signature).is_ok()
}

/// Sign a digest with BIP340 Schnorr (zero auxiliary randomness), 64 bytes.
pub fn sign_schnorr(hash: &[u8; 32], private_key: &PrivateKey) -> Result<SignatureBytes, CryptoError> {
    let signing_key =
        schnorr::SigningKey::from_bytes(&private_key.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let signature = signing_key
        .sign_raw(hash, &[0u8; 32])
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    Ok(SignatureBytes(signature.to_bytes().to_vec()))
}

/// Verify a 64-byte BIP340 signature against the x-coordinate of a compressed key.
pub fn verify_schnorr(hash: &[u8; 32], signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = schnorr::VerifyingKey::from_bytes(&public_key.as_bytes()[1..]) else {
        return false;
    };
    let Ok(signature) = schnorr::Signature::try_from(signature) else {
        return false;
    };
    verifying_key.verify_raw(hash, &signature).is_ok()
}

/// Verify either kind, choosing Schnorr for 64-byte signatures and ECDSA otherwise.
pub fn verify_signature(hash: &[u8; 32], signature: &SignatureBytes, public_key: &PublicKey) -> bool {
    if signature.is_schnorr() {
        verify_schnorr(hash, signature.as_bytes(), public_key)
    } else {
        verify_ecdsa(hash, signature.as_bytes(), public_key)
    }
}
