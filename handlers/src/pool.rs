//! Transaction pool admission.
//!
//! Handlers see the pool only through [`PoolQuery`]; rejections carry a
//! stable [`PoolErrorCode`] the pool reports back to clients.

use dpos_transactions::Transaction;
use dpos_types::PublicKey;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolErrorCode {
    /// A conflicting transaction from the same sender is already waiting.
    Pending,
    Conflict,
    HtlcLockNotFound,
    InvalidRecipient,
    Unsupported,
    Deprecated,
}

impl PoolErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "ERR_PENDING",
            Self::Conflict => "ERR_CONFLICT",
            Self::HtlcLockNotFound => "ERR_HTLCLOCKNOTFOUND",
            Self::InvalidRecipient => "ERR_INVALID_RECIPIENT",
            Self::Unsupported => "ERR_UNSUPPORTED",
            Self::Deprecated => "ERR_DEPRECATED",
        }
    }
}

impl fmt::Display for PoolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PoolError {
    pub code: PoolErrorCode,
    pub message: String,
}

impl PoolError {
    pub fn new(code: PoolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The sender already has a transaction of the same type waiting.
    pub(crate) fn pending_of_type(tx: &Transaction) -> Self {
        let name = tx
            .core_type()
            .map(|core| core.key().to_string())
            .unwrap_or_else(|| tx.type_key().to_string());
        Self::new(
            PoolErrorCode::Pending,
            format!(
                "Sender {} already has a transaction of type '{name}' in the pool",
                tx.sender_public_key()
            ),
        )
    }
}

/// Read-only view of the transactions waiting in the pool.
pub trait PoolQuery {
    fn all(&self) -> Box<dyn Iterator<Item = &Transaction> + '_>;

    fn all_by_sender<'a>(
        &'a self,
        sender: &'a PublicKey,
    ) -> Box<dyn Iterator<Item = &'a Transaction> + 'a> {
        Box::new(self.all().filter(move |tx| tx.sender_public_key() == sender))
    }

    /// Waiting transactions of the same type group and type as `tx`, any version.
    fn all_of_kind<'a>(
        &'a self,
        tx: &'a Transaction,
    ) -> Box<dyn Iterator<Item = &'a Transaction> + 'a> {
        Box::new(self.all().filter(move |other| {
            other.data.type_group == tx.data.type_group && other.data.type_id == tx.data.type_id
        }))
    }
}

/// Whether the sender of `tx` already waits with another transaction of its type.
pub(crate) fn sender_has_pending(pool: &dyn PoolQuery, tx: &Transaction) -> bool {
    pool.all_by_sender(tx.sender_public_key()).any(|other| {
        other.id != tx.id
            && other.data.type_group == tx.data.type_group
            && other.data.type_id == tx.data.type_id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_as_pool_strings() {
        assert_eq!(PoolErrorCode::Pending.to_string(), "ERR_PENDING");
        assert_eq!(PoolErrorCode::HtlcLockNotFound.as_str(), "ERR_HTLCLOCKNOTFOUND");
        let err = PoolError::new(PoolErrorCode::Unsupported, "nope");
        assert_eq!(err.to_string(), "nope");
    }
}
