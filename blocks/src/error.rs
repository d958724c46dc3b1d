use dpos_crypto::CryptoError;
use dpos_transactions::CodecError;
use dpos_types::TypesError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("malformed block bytes: {0}")]
    Malformed(String),

    #[error("invalid previous block id: {0}")]
    InvalidPreviousBlock(String),

    #[error("block schema: {0}")]
    Schema(String),

    #[error(transparent)]
    Transaction(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
