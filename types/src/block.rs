//! Block id type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block id in its text form.
///
/// Legacy networks print the id as a decimal `u64`; networks with the
/// `idFullSha256` milestone use the 64 character hex digest. Both travel as
/// strings, so the id is kept as text and interpreted by the block codec.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
