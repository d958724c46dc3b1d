//! SHA-256 and RIPEMD160 hashing.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// RIPEMD160 of raw data; applied directly to a public key for addresses.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut output = [0u8; 20];
    output.copy_from_slice(&Ripemd160::digest(data));
    output
}
