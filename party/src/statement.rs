//! The read-only projection of a finalized party.

use pop_crypto::blake2b_256;
use pop_ledger::{Attendees, LedgerError};
use pop_types::PartyDescription;
use serde::Serialize;

use crate::PartyError;

/// What attendees need to build mining proofs offline.
///
/// Anyone observing the finalized ledger record reproduces the same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalStatement {
    pub description: PartyDescription,
    pub attendees: Attendees,
}

#[derive(Serialize)]
struct StatementJson<'a> {
    name: &'a str,
    purpose: &'a str,
    datetime: u64,
    location: &'a str,
    attendees: Vec<String>,
}

impl FinalStatement {
    /// Bincode description followed by the concatenated roster keys.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PartyError> {
        let mut out = bincode::serialize(&self.description)
            .map_err(|e| LedgerError::Codec(e.to_string()))?;
        out.extend_from_slice(&self.attendees.to_bytes());
        Ok(out)
    }

    pub fn digest(&self) -> Result<[u8; 32], PartyError> {
        Ok(blake2b_256(&self.to_bytes()?))
    }

    /// Pretty JSON with hex-encoded attendee keys.
    pub fn to_json(&self) -> Result<String, PartyError> {
        let view = StatementJson {
            name: &self.description.name,
            purpose: &self.description.purpose,
            datetime: self.description.datetime.as_secs(),
            location: &self.description.location,
            attendees: self
                .attendees
                .keys()
                .iter()
                .map(|k| hex::encode(k.as_bytes()))
                .collect(),
        };
        serde_json::to_string_pretty(&view).map_err(|e| LedgerError::Codec(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_types::{PersonhoodKey, Timestamp};

    fn statement() -> FinalStatement {
        FinalStatement {
            description: PartyDescription {
                name: "Spring meetup".into(),
                purpose: "Personhood".into(),
                datetime: Timestamp::new(1_650_000_000),
                location: "Zurich".into(),
            },
            attendees: Attendees::new(vec![PersonhoodKey([1; 32]), PersonhoodKey([2; 32])]),
        }
    }

    #[test]
    fn bytes_end_with_roster() {
        let st = statement();
        let bytes = st.to_bytes().unwrap();
        assert!(bytes.ends_with(&st.attendees.to_bytes()));
        assert_eq!(st.digest().unwrap(), blake2b_256(&bytes));
    }

    #[test]
    fn digest_depends_on_roster() {
        let st = statement();
        let mut fewer = st.clone();
        fewer.attendees = Attendees::new(vec![PersonhoodKey([1; 32])]);
        assert_ne!(st.digest().unwrap(), fewer.digest().unwrap());
    }

    #[test]
    fn json_lists_hex_keys() {
        let json = statement().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Spring meetup");
        assert_eq!(value["attendees"][1], hex::encode([2u8; 32]));
    }
}
