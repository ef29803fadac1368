//! Shared utilities for proof-of-personhood party clients.

pub mod logging;

pub use logging::{init_logging, LogFormat};
