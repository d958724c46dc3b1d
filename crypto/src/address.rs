//! Wallet address derivation and validation.
//!
//! Address payload: `network byte (pubKeyHash) || RIPEMD160(publicKey)`,
//! 21 bytes, encoded with base58check (double SHA-256 checksum).

use crate::{hash::ripemd160, CryptoError};
use dpos_types::{Address, PublicKey};

/// Byte length of a decoded address.
pub const ADDRESS_PAYLOAD_LEN: usize = 21;

/// Derive the address of a public key on a network.
pub fn address_from_public_key(public_key: &PublicKey, network: u8) -> Address {
    let mut payload = [0u8; ADDRESS_PAYLOAD_LEN];
    payload[0] = network;
    payload[1..].copy_from_slice(&ripemd160(public_key.as_bytes()));
    encode_address(&payload)
}

/// Encode a raw 21-byte payload as read from the wire.
pub fn encode_address(payload: &[u8; ADDRESS_PAYLOAD_LEN]) -> Address {
    Address::new(bs58::encode(payload).with_check().into_string())
}

/// Decode an address into its 21-byte payload, checking the checksum.
pub fn decode_address(address: &Address) -> Result<[u8; ADDRESS_PAYLOAD_LEN], CryptoError> {
    let bytes = bs58::decode(address.as_str())
        .with_check(None)
        .into_vec()
        .map_err(|e| CryptoError::InvalidAddress(format!("{address}: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidAddress(format!("{address}: wrong payload length")))
}

/// Whether the address decodes and belongs to `network`.
pub fn validate_address(address: &Address, network: u8) -> bool {
    matches!(decode_address(address), Ok(payload) if payload[0] == network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_key_address() {
        let key: PublicKey = "03287bfebba4c7881a0509717e71b34b63f31e40021c321f89ae04f84be6d6ac37"
            .parse()
            .unwrap();
        let address = address_from_public_key(&key, 30);
        assert_eq!(address.as_str(), "DBYyh2vXcigrJGUHfvmYxVxEqeH7vomw6x");
        assert!(validate_address(&address, 30));
        assert!(!validate_address(&address, 23));
    }

    #[test]
    fn payload_is_ripemd160_of_the_compressed_key() {
        let key: PublicKey = "03287bfebba4c7881a0509717e71b34b63f31e40021c321f89ae04f84be6d6ac37"
            .parse()
            .unwrap();
        let payload = decode_address(&address_from_public_key(&key, 30)).unwrap();
        assert_eq!(payload[1..], ripemd160(key.as_bytes()));
        assert_ne!(payload[1..], ripemd160(&crate::hash::sha256(key.as_bytes())));
    }

    #[test]
    fn decode_encode_roundtrip() {
        let address = Address::from("D5q7YfEFDky1JJVQQEy4MGyiUhr5cGg47F");
        let payload = decode_address(&address).unwrap();
        assert_eq!(payload[0], 30);
        assert_eq!(encode_address(&payload), address);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let address = Address::from("D5q7YfEFDky1JJVQQEy4MGyiUhr5cGg47G");
        assert!(decode_address(&address).is_err());
        assert!(!validate_address(&Address::from("not an address"), 30));
    }
}
