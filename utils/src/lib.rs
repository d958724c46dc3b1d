//! Shared utilities for the transaction core.

pub mod logging;

pub use logging::{init_logging, try_init_logging, LogFormat, LoggingError};
