//! Ledger accounts of the transaction core.
//!
//! A [`Wallet`] is keyed by address and carries a balance, a nonce and the
//! typed attribute domains of [`WalletExtensions`]. The [`WalletRepository`]
//! owns every wallet and keeps the secondary indexes (public key, username,
//! resignation, HTLC lock id, IPFS hash) that handlers look wallets up by.
//!
//! Wallets are created lazily on first reference and never deleted.

pub mod attributes;
pub mod error;
pub mod index;
pub mod repository;
pub mod wallet;

pub use attributes::{
    DelegateInfo, HtlcInfo, HtlcLock, IpfsInfo, LastBlockInfo, MultiSignatureInfo,
    WalletAttribute, WalletExtensions,
};
pub use error::WalletError;
pub use index::{WalletIndex, WalletIndexKind};
pub use repository::WalletRepository;
pub use wallet::Wallet;
