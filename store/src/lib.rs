//! Abstract storage traits for the transaction core.
//!
//! The core never owns persistent storage. Handlers read history through these
//! traits while rebuilding wallet state at startup and while reverting HTLC
//! claims and refunds. Backends (SQL, key-value, in-memory for testing)
//! implement them; the rest of the workspace depends only on the traits.

pub mod block;
pub mod error;
pub mod transaction;

pub use block::{BlockRepository, BlockRewards, ForgedBlocks, LastForgedBlock};
pub use error::StoreError;
pub use transaction::{
    ClaimedLockBalance, ReceivedTransactions, RefundedLockBalance, SentTransactions,
    TransactionRepository, TransactionRow,
};
