//! Base58check wallet address.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A wallet address in its base58check text form.
///
/// The payload is 21 bytes: the network's `pubKeyHash` byte followed by
/// `RIPEMD160(SHA256(publicKey))`. Construction does not validate; use
/// `dpos_crypto::validate_address` for that.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
