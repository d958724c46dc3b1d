use dpos_crypto::CryptoError;
use dpos_types::TypesError;
use thiserror::Error;

/// Failures while decoding, encoding or validating a transaction.
///
/// Raised by the codec and the factory, never while applying a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Failed to deserialize transaction, because the bytes are malformed: {0}")]
    MalformedTransactionBytes(String),

    #[error("Failed to deserialize transaction, encountered invalid bytes: {0}")]
    InvalidTransactionBytes(String),

    #[error("Version {0} not supported.")]
    TransactionVersion(u8),

    #[error("Unknown transaction type {type_id} in type group {type_group} (version {version}).")]
    UnknownTransaction {
        type_group: u32,
        type_id: u16,
        version: u8,
    },

    #[error("{0}")]
    TransactionSchema(String),

    #[error("Invalid multi signature, because duplicate participant found.")]
    DuplicateParticipantInMultiSignature,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Types(#[from] TypesError),
}

impl CodecError {
    /// Stable machine name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedTransactionBytes(_) => "MalformedTransactionBytesError",
            Self::InvalidTransactionBytes(_) => "InvalidTransactionBytesError",
            Self::TransactionVersion(_) => "TransactionVersionError",
            Self::UnknownTransaction { .. } => "UnknownTransactionError",
            Self::TransactionSchema(_) => "TransactionSchemaError",
            Self::DuplicateParticipantInMultiSignature => {
                "DuplicateParticipantInMultiSignatureError"
            }
            Self::Crypto(_) => "CryptoError",
            Self::Types(_) => "TypesError",
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::TransactionSchema(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRegistryError {
    #[error("The Core transaction type group is immutable.")]
    CoreTransactionTypeGroupImmutable,

    #[error("Transaction type {key} is already registered.")]
    AlreadyRegistered { key: String },

    #[error("Transaction type {type_id} in type group {type_group} is not registered.")]
    NotRegistered { type_group: u32, type_id: u16 },
}
