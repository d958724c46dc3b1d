//! Nullable infrastructure for deterministic testing.
//!
//! Everything the transaction core reaches outside itself for (the network
//! clock, the confirmed history, the pool, the event sink) sits behind a
//! trait. This crate provides in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod events;
pub mod pool;
pub mod store;

pub use clock::NullClock;
pub use events::RecordingDispatcher;
pub use pool::NullPool;
pub use store::{NullBlockStore, NullTransactionStore};
