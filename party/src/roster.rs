//! Candidate attendees and the canonical roster built from them.

use std::collections::HashSet;

use pop_ledger::Attendees;
use pop_types::PersonhoodKey;

use crate::PartyError;

/// Keys scanned while a party is in `Scanning`. Unordered, no duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSet {
    keys: HashSet<PersonhoodKey>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: PersonhoodKey) -> Result<(), PartyError> {
        if !self.keys.insert(key) {
            return Err(PartyError::DuplicateAttendee(key));
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &PersonhoodKey) -> Result<(), PartyError> {
        if !self.keys.remove(key) {
            return Err(PartyError::UnknownAttendee(*key));
        }
        Ok(())
    }

    pub fn contains(&self, key: &PersonhoodKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonhoodKey> {
        self.keys.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }

    /// The canonical roster: keys sorted by their 32-byte encoding in
    /// unsigned lexicographic order.
    pub fn to_roster(&self) -> Attendees {
        let mut keys: Vec<PersonhoodKey> = self.keys.iter().copied().collect();
        keys.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        Attendees::new(keys)
    }
}

impl FromIterator<PersonhoodKey> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = PersonhoodKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(first: u8) -> PersonhoodKey {
        let mut bytes = [0x55; 32];
        bytes[0] = first;
        PersonhoodKey(bytes)
    }

    #[test]
    fn roster_is_byte_sorted() {
        let (a, b, c) = (key(0x00), key(0x02), key(0x01));
        let mut set = CandidateSet::new();
        for k in [b, a, c] {
            set.add(k).unwrap();
        }
        assert_eq!(set.to_roster().keys(), &[a, c, b]);
        assert!(set.to_roster().is_canonical());
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let mut set = CandidateSet::new();
        set.add(key(1)).unwrap();
        assert!(matches!(
            set.add(key(1)).unwrap_err(),
            PartyError::DuplicateAttendee(_)
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn removing_absent_key_is_rejected() {
        let mut set: CandidateSet = [key(1), key(2)].into_iter().collect();
        set.remove(&key(1)).unwrap();
        assert!(matches!(
            set.remove(&key(1)).unwrap_err(),
            PartyError::UnknownAttendee(_)
        ));
        assert!(!set.contains(&key(1)));
        assert!(set.contains(&key(2)));
    }

    #[test]
    fn high_bytes_sort_after_low_bytes() {
        let set: CandidateSet = [key(0xFF), key(0x7F), key(0x80)].into_iter().collect();
        let firsts: Vec<u8> = set.to_roster().keys().iter().map(|k| k.0[0]).collect();
        assert_eq!(firsts, vec![0x7F, 0x80, 0xFF]);
    }
}
