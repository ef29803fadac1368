//! Fundamental types for proof-of-personhood parties.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! ledger instance ids, identity references, identity and personhood keys,
//! linkage tags, the party lifecycle state, and the party description.

pub mod error;
pub mod id;
pub mod keys;
pub mod party;
pub mod state;
pub mod time;

pub use error::TypesError;
pub use id::{IdentityRef, InstanceId};
pub use keys::{
    KeyPair, LinkageTag, PersonhoodKey, PersonhoodKeyPair, PersonhoodSecret, PrivateKey,
    PublicKey, Signature,
};
pub use party::PartyDescription;
pub use state::PartyState;
pub use time::Timestamp;
