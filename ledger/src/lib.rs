//! Ledger adapter for proof-of-personhood parties.
//!
//! The ledger is the single source of truth for a party. This crate defines
//! the narrow contract the party core needs from it:
//! - wire types: [`Instruction`], [`ClientTransaction`], [`Proof`], the
//!   encoded [`PopPartyRecord`], and the mining/spawn payloads
//! - collaborator traits: [`LedgerClient`], [`AccessControlResolver`],
//!   [`CredentialLookup`], [`TransactionSigner`]
//! - [`contract`]: the rules a ledger applies to party instructions
//!
//! Consensus, transport, and coin accounting live behind the traits.

pub mod access;
pub mod client;
pub mod contract;
pub mod error;
pub mod instruction;
pub mod payload;
pub mod proof;
pub mod record;
pub mod signer;

pub use access::{
    credential_instance_id, AccessControlResolver, AccessRules, Credential, CredentialAttribute,
    CredentialGroup, CredentialLookup, ACTION_BARRIER, ACTION_FINALIZE, ACTION_SPAWN_PARTY,
};
pub use client::LedgerClient;
pub use contract::CONTRACT_POP_PARTY;
pub use error::{ContractError, LedgerError};
pub use instruction::{Argument, ClientTransaction, Instruction, InstructionKind, TxOutcome};
pub use payload::{mining_scope, MiningPayload, RewardTarget, SpawnArguments};
pub use proof::Proof;
pub use record::{Attendees, PopPartyRecord};
pub use signer::{CounterSigner, Signer, TransactionSigner};
