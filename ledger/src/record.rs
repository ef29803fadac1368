//! The party record as stored on the ledger.

use pop_types::{IdentityRef, LinkageTag, PartyDescription, PartyState, PersonhoodKey};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// An ordered list of attendee keys.
///
/// Wire form is the concatenation of the 32-byte key encodings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendees {
    keys: Vec<PersonhoodKey>,
}

impl Attendees {
    /// Wrap keys as given; ordering is the caller's responsibility.
    pub fn new(keys: Vec<PersonhoodKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[PersonhoodKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &PersonhoodKey) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Strictly ascending by unsigned byte order (sorted, no duplicates).
    pub fn is_canonical(&self) -> bool {
        self.keys.windows(2).all(|w| w[0] < w[1])
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.keys.len() * PersonhoodKey::LEN);
        for key in &self.keys {
            out.extend_from_slice(key.as_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() % PersonhoodKey::LEN != 0 {
            return Err(LedgerError::Codec(format!(
                "attendee list of {} bytes is not a multiple of {}",
                bytes.len(),
                PersonhoodKey::LEN
            )));
        }
        let keys = bytes
            .chunks_exact(PersonhoodKey::LEN)
            .map(|chunk| {
                let mut key = [0u8; 32];
                key.copy_from_slice(chunk);
                PersonhoodKey(key)
            })
            .collect();
        Ok(Self { keys })
    }
}

/// Everything the ledger stores for one party instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopPartyRecord {
    pub state: PartyState,
    pub description: PartyDescription,
    /// Organizer sign-offs needed before the roster is final.
    pub required_finalizations: u32,
    /// Organizers who proposed the current `proposed` roster.
    pub finalizations: Vec<IdentityRef>,
    /// Roster awaiting co-organizer agreement.
    pub proposed: Attendees,
    /// Final roster; empty until `Finalized`.
    pub attendees: Attendees,
    /// Linkage tags that have already mined.
    pub miners: Vec<LinkageTag>,
    pub mining_reward: u64,
}

impl PopPartyRecord {
    pub fn new(
        description: PartyDescription,
        required_finalizations: u32,
        mining_reward: u64,
    ) -> Self {
        Self {
            state: PartyState::PreBarrier,
            description,
            required_finalizations,
            finalizations: Vec::new(),
            proposed: Attendees::default(),
            attendees: Attendees::default(),
            miners: Vec::new(),
            mining_reward,
        }
    }

    pub fn has_mined(&self, tag: &LinkageTag) -> bool {
        self.miners.contains(tag)
    }

    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Codec(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Codec(e.to_string()))
    }
}
