//! secp256k1 key and signature byte types.

use crate::serde_hex::{decode_fixed, impl_string_serde};
use crate::TypesError;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 33-byte compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey(pub [u8; 33]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; 33] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
            expected: 33,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Parses hex in either case; keys therefore compare case-insensitively.
impl FromStr for PublicKey {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<33>(s).map(Self)
    }
}

impl_string_serde!(PublicKey, "a 66 character hex public key");

/// A 32-byte secp256k1 secret scalar.
///
/// Intentionally not `Debug`, `Serialize` or `Clone`. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A key pair (public + private).
///
/// Use `dpos_crypto::keys::from_passphrase()` to construct one.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Raw signature bytes: a DER encoded ECDSA signature or a 64-byte Schnorr signature.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignatureBytes(pub Vec<u8>);

impl SignatureBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Schnorr signatures are exactly 64 bytes; DER signatures never are.
    pub fn is_schnorr(&self) -> bool {
        self.0.len() == 64
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", hex::encode(&self.0))
    }
}

impl fmt::Display for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for SignatureBytes {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| TypesError::InvalidHex(e.to_string()))
    }
}

impl_string_serde!(SignatureBytes, "a hex encoded signature");

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "03287bfebba4c7881a0509717e71b34b63f31e40021c321f89ae04f84be6d6ac37";

    #[test]
    fn public_key_hex_is_case_insensitive() {
        let lower: PublicKey = KEY.parse().unwrap();
        let upper: PublicKey = KEY.to_uppercase().parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_string(), KEY);
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        let err = KEY[..64].parse::<PublicKey>().unwrap_err();
        assert_eq!(err, TypesError::InvalidLength { expected: 33, actual: 32 });
    }

    #[test]
    fn signature_kind_by_length() {
        assert!(SignatureBytes(vec![0u8; 64]).is_schnorr());
        assert!(!SignatureBytes(vec![0x30; 71]).is_schnorr());
    }
}
