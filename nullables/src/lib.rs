//! Nullable infrastructure for deterministic testing.
//!
//! Follows the "A-frame architecture" pattern: every external dependency of
//! the party core sits behind a trait, and this crate provides an in-memory
//! implementation that:
//! - applies the real party contract rules
//! - can be steered programmatically (injected rejections, bad proofs)
//! - never touches the filesystem or network

pub mod ledger;

pub use ledger::NullLedger;
