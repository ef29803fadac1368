use proptest::prelude::*;

use pop_types::{IdentityRef, InstanceId, PartyState, PersonhoodKey, Timestamp};

proptest! {
    /// InstanceId hex display parses back to the same id.
    #[test]
    fn instance_id_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = InstanceId::new(bytes);
        let parsed: InstanceId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// IdentityRef bincode serialization roundtrip.
    #[test]
    fn identity_ref_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = IdentityRef::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: IdentityRef = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// PersonhoodKey ordering agrees with byte-slice ordering.
    #[test]
    fn personhood_key_order_matches_bytes(
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        prop_assert_eq!(PersonhoodKey(a).cmp(&PersonhoodKey(b)), a[..].cmp(&b[..]));
    }

    /// Only ordinals 1..=3 decode to a state, and they roundtrip.
    #[test]
    fn state_ordinal_decoding(ordinal in 0u8..=255) {
        match PartyState::from_ordinal(ordinal) {
            Ok(state) => prop_assert_eq!(state.ordinal(), ordinal),
            Err(_) => prop_assert!(!(1..=3).contains(&ordinal)),
        }
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a) <= Timestamp::new(b), a <= b);
    }
}
