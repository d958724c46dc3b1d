//! Cryptographic adapter for the transaction core.
//!
//! - **secp256k1 ECDSA** (DER encoded) for legacy and current signatures
//! - **BIP340 Schnorr** for 64-byte signatures and multi-signature participants
//! - **SHA-256 / RIPEMD160** for ids, signing hashes and address payloads
//! - Address derivation with base58check over `network byte + RIPEMD160(publicKey)`

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod multisig;
pub mod sign;

pub use address::{address_from_public_key, decode_address, encode_address, validate_address};
pub use error::CryptoError;
pub use hash::{ripemd160, sha256, sha256_multi};
pub use keys::{keypair_from_passphrase, keypair_from_private, public_from_passphrase};
pub use multisig::multi_signature_public_key;
pub use sign::{sign_ecdsa, sign_schnorr, verify_ecdsa, verify_schnorr, verify_signature};
