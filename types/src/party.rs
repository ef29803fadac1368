//! Immutable party metadata.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// What, when, and where a party takes place. Set once at spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDescription {
    pub name: String,
    pub purpose: String,
    pub datetime: Timestamp,
    pub location: String,
}
