//! Proof-of-personhood parties.
//!
//! A party moves `PreBarrier -> Scanning -> Finalized`. Organizers scan
//! attendee keys into a [`CandidateSet`] while scanning, then finalize a
//! canonical roster on the ledger. Any attendee can afterwards [`mine`] once,
//! anonymously, with a linkable ring signature over that roster.
//!
//! The ledger is the source of truth: [`PopParty`] reloads its state from a
//! verified proof after every transaction it submits.
//!
//! [`mine`]: PopParty::mine

pub mod config;
pub mod error;
pub mod mining;
pub mod party;
pub mod roster;
pub mod services;
pub mod statement;

pub use config::PartyConfig;
pub use error::PartyError;
pub use mining::{mining_payload, mining_tag};
pub use party::PopParty;
pub use roster::CandidateSet;
pub use services::PartyServices;
pub use statement::FinalStatement;
