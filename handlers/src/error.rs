use dpos_crypto::CryptoError;
use dpos_state::WalletError;
use dpos_store::StoreError;
use dpos_transactions::{CodecError, TypeKey, TypeRegistryError};
use thiserror::Error;

/// Why a transaction cannot be applied to, or reverted from, wallet state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    // ── Generic wallet checks ────────────────────────────────────────────
    #[error("Insufficient balance in database wallet. Wallet is not allowed to spend before funding is confirmed.")]
    ColdWallet,

    #[error("Insufficient balance in the wallet.")]
    InsufficientBalance,

    #[error("Failed to apply transaction, because the public key does not match the wallet.")]
    SenderWalletMismatch,

    #[error("Failed to apply transaction, because wallet does not allow second signatures.")]
    UnexpectedSecondSignature,

    #[error("Failed to apply transaction, because the second signature could not be verified.")]
    InvalidSecondSignature,

    #[error("Failed to apply transaction, because multi signatures are currently not supported.")]
    UnexpectedMultiSignature,

    #[error("Failed to apply transaction, because the multi signature could not be verified.")]
    InvalidMultiSignature,

    #[error("Failed to apply transaction, because legacy multi signature is no longer supported.")]
    LegacyMultiSignature,

    #[error("Failed to apply transaction, because the {0} asset is missing.")]
    MissingAsset(&'static str),

    // ── Delegates and votes ──────────────────────────────────────────────
    #[error("Failed to apply transaction, because the wallet already resigned as delegate.")]
    WalletAlreadyResigned,

    #[error("Failed to apply transaction, because the wallet is not a delegate.")]
    WalletNotADelegate,

    #[error("Failed to apply transaction, because the wallet already has a registered username.")]
    WalletIsAlreadyDelegate,

    #[error("Failed to apply transaction, because the wallet has no registered username.")]
    WalletUsernameEmpty,

    #[error("Failed to apply transaction, because the username '{0}' is already registered.")]
    WalletUsernameAlreadyRegistered(String),

    #[error("Failed to apply transaction, because the sender wallet has already voted.")]
    AlreadyVoted,

    #[error("Failed to apply transaction, because the wallet has not voted.")]
    NoVote,

    #[error("Failed to apply transaction, because the wallet vote does not match.")]
    UnvoteMismatch,

    #[error("Failed to apply transaction, because only delegates can be voted.")]
    VotedForNonDelegate(String),

    #[error("Failed to apply transaction, because it votes for a resigned delegate.")]
    VotedForResignedDelegate(String),

    #[error("Failed to apply transaction, because it carries {0} votes and only one is allowed.")]
    TooManyVotes(usize),

    #[error("Failed to apply transaction, because not enough delegates to allow resignation.")]
    NotEnoughDelegates,

    // ── Signature registrations ──────────────────────────────────────────
    #[error("Failed to apply transaction, because second signature is already enabled.")]
    SecondSignatureAlreadyRegistered,

    #[error("Failed to apply transaction, because multi signature is enabled.")]
    NotSupportedForMultiSignatureWallet,

    #[error("Failed to apply transaction, because multi signature is already enabled.")]
    MultiSignatureAlreadyRegistered,

    #[error("Failed to apply transaction, because too few keys were provided.")]
    MultiSignatureMinimumKeys,

    #[error("Failed to apply transaction, because the number of provided keys does not match the number of signatures.")]
    MultiSignatureKeyCountMismatch,

    // ── IPFS and HTLC ────────────────────────────────────────────────────
    #[error("Failed to apply transaction, because this IPFS hash is already registered on the blockchain.")]
    IpfsHashAlreadyExists,

    #[error("Failed to apply transaction, because the associated HTLC lock transaction could not be found.")]
    HtlcLockTransactionNotFound,

    #[error("Failed to apply transaction, because the secret provided does not match the associated HTLC lock transaction secret.")]
    HtlcSecretHashMismatch,

    #[error("Failed to apply transaction, because the associated HTLC lock transaction did not expire yet.")]
    HtlcLockNotExpired,

    #[error("Failed to apply transaction, because the associated HTLC lock transaction expired.")]
    HtlcLockExpired,

    // ── Wrapped ──────────────────────────────────────────────────────────
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl TransactionError {
    /// Stable machine name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ColdWallet => "ColdWalletError",
            Self::InsufficientBalance => "InsufficientBalanceError",
            Self::SenderWalletMismatch => "SenderWalletMismatchError",
            Self::UnexpectedSecondSignature => "UnexpectedSecondSignatureError",
            Self::InvalidSecondSignature => "InvalidSecondSignatureError",
            Self::UnexpectedMultiSignature => "UnexpectedMultiSignatureError",
            Self::InvalidMultiSignature => "InvalidMultiSignatureError",
            Self::LegacyMultiSignature => "LegacyMultiSignatureError",
            Self::MissingAsset(_) => "MissingAssetError",
            Self::WalletAlreadyResigned => "WalletAlreadyResignedError",
            Self::WalletNotADelegate => "WalletNotADelegateError",
            Self::WalletIsAlreadyDelegate => "WalletIsAlreadyDelegateError",
            Self::WalletUsernameEmpty => "WalletNoUsernameError",
            Self::WalletUsernameAlreadyRegistered(_) => "WalletUsernameAlreadyRegisteredError",
            Self::AlreadyVoted => "AlreadyVotedError",
            Self::NoVote => "NoVoteError",
            Self::UnvoteMismatch => "UnvoteMismatchError",
            Self::VotedForNonDelegate(_) => "VotedForNonDelegateError",
            Self::VotedForResignedDelegate(_) => "VotedForResignedDelegateError",
            Self::TooManyVotes(_) => "TooManyVotesError",
            Self::NotEnoughDelegates => "NotEnoughDelegatesError",
            Self::SecondSignatureAlreadyRegistered => "SecondSignatureAlreadyRegisteredError",
            Self::NotSupportedForMultiSignatureWallet => "NotSupportedForMultiSignatureWalletError",
            Self::MultiSignatureAlreadyRegistered => "MultiSignatureAlreadyRegisteredError",
            Self::MultiSignatureMinimumKeys => "MultiSignatureMinimumKeysError",
            Self::MultiSignatureKeyCountMismatch => "MultiSignatureKeyCountMismatchError",
            Self::IpfsHashAlreadyExists => "IpfsHashAlreadyExists",
            Self::HtlcLockTransactionNotFound => "HtlcLockTransactionNotFoundError",
            Self::HtlcSecretHashMismatch => "HtlcSecretHashMismatchError",
            Self::HtlcLockNotExpired => "HtlcLockNotExpiredError",
            Self::HtlcLockExpired => "HtlcLockExpiredError",
            Self::Wallet(WalletError::UnexpectedNonce { .. }) => "UnexpectedNonceError",
            Self::Wallet(WalletError::NotFound { .. }) => "WalletNotFoundError",
            Self::Codec(e) => e.kind(),
            Self::Crypto(_) => "CryptoError",
            Self::Store(_) => "StoreError",
            Self::Registry(e) => e.kind(),
        }
    }
}

/// Failures of the handler registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Transaction type {0} does not exist.")]
    InvalidTransactionType(TypeKey),

    #[error("Transaction type {0} is deactivated.")]
    DeactivatedTransactionHandler(TypeKey),

    #[error("Transaction type {0} is already registered.")]
    AlreadyRegistered(TypeKey),

    #[error("Transaction type {handler} depends on {dependency}, which is not registered.")]
    UnsatisfiedDependency { handler: TypeKey, dependency: TypeKey },

    #[error("Transaction type {0} is part of a dependency cycle.")]
    DependencyCycle(TypeKey),

    #[error("Illegal attempt to modify core transaction type {0}.")]
    CoreTransactionTypeGroupImmutable(TypeKey),

    #[error(transparent)]
    Types(#[from] TypeRegistryError),
}

impl RegistryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransactionType(_) => "InvalidTransactionTypeError",
            Self::DeactivatedTransactionHandler(_) => "DeactivatedTransactionHandlerError",
            Self::AlreadyRegistered(_) => "TransactionHandlerAlreadyRegisteredError",
            Self::UnsatisfiedDependency { .. } => "UnsatisfiedDependencyError",
            Self::DependencyCycle(_) => "DependencyCycleError",
            Self::CoreTransactionTypeGroupImmutable(_) => "CoreTransactionTypeGroupImmutableError",
            Self::Types(_) => "TypeRegistryError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_transactions::CoreType;
    use dpos_types::{BigNumber, PublicKey};

    #[test]
    fn wrapped_nonce_error_keeps_its_kind() {
        let err = TransactionError::from(WalletError::UnexpectedNonce {
            nonce: BigNumber::from(3u64),
            sender: PublicKey([2; 33]),
            wallet_nonce: BigNumber::one(),
            reversal: false,
        });
        assert_eq!(err.kind(), "UnexpectedNonceError");
        assert!(err.to_string().starts_with("Cannot apply a transaction with nonce 3"));
    }

    #[test]
    fn registry_messages_name_the_type() {
        let key = TypeKey::core(CoreType::HtlcLock, 2);
        let err = TransactionError::from(RegistryError::DeactivatedTransactionHandler(key));
        assert_eq!(err.kind(), "DeactivatedTransactionHandlerError");
        assert_eq!(err.to_string(), format!("Transaction type {key} is deactivated."));
    }
}
