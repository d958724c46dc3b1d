//! Transaction handlers of the DPoS core.
//!
//! One [`TransactionHandler`] exists per `(typeGroup, type, version)`. A handler
//! decides whether a transaction may be applied to the current wallet state,
//! applies or reverts it, gates admission to the transaction pool and rebuilds
//! its share of wallet state from history at startup.
//!
//! Handlers are collected in the [`TransactionHandlerRegistry`], which orders
//! them by declared dependencies and resolves the handler for a transaction
//! against the active milestone. [`StateBuilder`] drives a full rebuild.

pub mod context;
pub mod error;
pub mod events;
pub mod generic;
pub mod handler;
pub mod handlers;
pub mod pool;
pub mod registry;
pub mod state_builder;

pub use context::{HandlerContext, LastBlock};
pub use error::{RegistryError, TransactionError};
pub use events::{EventBus, EventDispatcher, TransactionEvent};
pub use handler::{HandlerVersion, TransactionHandler};
pub use pool::{PoolError, PoolErrorCode, PoolQuery};
pub use registry::TransactionHandlerRegistry;
pub use state_builder::{StateBuildReport, StateBuilder};
