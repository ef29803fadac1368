//! Lifecycle state of a party.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// The lifecycle state of a party.
///
/// Ordinals are meaningful: a party only ever moves to a strictly greater
/// ordinal, one step at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartyState {
    /// Configured but the barrier point has not been passed.
    PreBarrier = 1,
    /// Attendees are being scanned.
    Scanning = 2,
    /// The roster is fixed and attendees can mine.
    Finalized = 3,
}

impl PartyState {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Result<Self, TypesError> {
        match ordinal {
            1 => Ok(Self::PreBarrier),
            2 => Ok(Self::Scanning),
            3 => Ok(Self::Finalized),
            other => Err(TypesError::UnknownState(other)),
        }
    }

    /// The state reached by the single transition out of this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::PreBarrier => Some(Self::Scanning),
            Self::Scanning => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal single transition.
    pub fn can_transition_to(self, to: Self) -> bool {
        self.next() == Some(to)
    }
}

impl fmt::Display for PartyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PreBarrier => "pre-barrier",
            Self::Scanning => "scanning",
            Self::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_lifecycle() {
        assert_eq!(PartyState::PreBarrier.ordinal(), 1);
        assert_eq!(PartyState::Scanning.ordinal(), 2);
        assert_eq!(PartyState::Finalized.ordinal(), 3);
        assert!(PartyState::PreBarrier < PartyState::Scanning);
        assert!(PartyState::Scanning < PartyState::Finalized);
    }

    #[test]
    fn from_ordinal_roundtrip_and_rejects_unknown() {
        for s in [
            PartyState::PreBarrier,
            PartyState::Scanning,
            PartyState::Finalized,
        ] {
            assert_eq!(PartyState::from_ordinal(s.ordinal()).unwrap(), s);
        }
        assert!(PartyState::from_ordinal(0).is_err());
        assert!(PartyState::from_ordinal(4).is_err());
    }

    #[test]
    fn transitions_never_skip_or_regress() {
        assert!(PartyState::PreBarrier.can_transition_to(PartyState::Scanning));
        assert!(PartyState::Scanning.can_transition_to(PartyState::Finalized));
        assert!(!PartyState::PreBarrier.can_transition_to(PartyState::Finalized));
        assert!(!PartyState::Scanning.can_transition_to(PartyState::PreBarrier));
        assert!(!PartyState::Finalized.can_transition_to(PartyState::Scanning));
        assert_eq!(PartyState::Finalized.next(), None);
    }
}
