use thiserror::Error;

/// Failures reported by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored row could not be decoded back into a transaction or block.
    #[error("malformed row {id}: {reason}")]
    MalformedRow { id: String, reason: String },
}
