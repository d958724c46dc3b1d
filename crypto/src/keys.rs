//! Key pairs from passphrases and raw secrets.

use crate::{hash::sha256, CryptoError};
use dpos_types::{KeyPair, PrivateKey, PublicKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;

/// Derive the key pair whose secret is `SHA256(passphrase)`.
pub fn keypair_from_passphrase(passphrase: &str) -> Result<KeyPair, CryptoError> {
    keypair_from_private(PrivateKey(sha256(passphrase.as_bytes())))
}

/// Public key of a passphrase without keeping the secret around.
pub fn public_from_passphrase(passphrase: &str) -> Result<PublicKey, CryptoError> {
    keypair_from_passphrase(passphrase).map(|kp| kp.public)
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let secret = SecretKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let encoded = secret.public_key().to_encoded_point(true);
    let public = PublicKey::from_slice(encoded.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    Ok(KeyPair { public, private })
}

/// Whether the bytes decode to a point on the curve.
pub fn is_valid_public_key(key: &PublicKey) -> bool {
    k256::PublicKey::from_sec1_bytes(key.as_bytes()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passphrase_derivation_is_deterministic() {
        let a = public_from_passphrase("dummy passphrase").unwrap();
        let b = public_from_passphrase("dummy passphrase").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.to_string(),
            "02a47a2f594635737d2ce9898680812ff7fa6aaa64ddea1360474c110e9985a087"
        );
    }

    #[test]
    fn zero_secret_is_rejected() {
        assert!(matches!(
            keypair_from_private(PrivateKey([0u8; 32])),
            Err(CryptoError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn derived_keys_are_on_curve() {
        let public = public_from_passphrase("secret").unwrap();
        assert!(is_valid_public_key(&public));
        assert!(!is_valid_public_key(&PublicKey([7u8; 33])));
    }
}
