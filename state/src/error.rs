use dpos_types::{BigNumber, PublicKey};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error(
        "Cannot {action} a transaction with nonce {nonce}: the sender {sender} has nonce {wallet_nonce}.",
        action = if *.reversal { "revert" } else { "apply" }
    )]
    UnexpectedNonce {
        nonce: BigNumber,
        sender: PublicKey,
        wallet_nonce: BigNumber,
        reversal: bool,
    },

    #[error("A wallet with the ID [{key}] does not exist in the [{index}] index.")]
    NotFound { index: &'static str, key: String },
}
