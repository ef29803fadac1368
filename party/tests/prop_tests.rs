use proptest::prelude::*;

use pop_ledger::contract;
use pop_ledger::payload::{ARG_ATTENDEES, BARRIER_COMMAND, FINALIZE_COMMAND, MINE_COMMAND};
use pop_ledger::{Argument, Attendees, PopPartyRecord, SpawnArguments};
use pop_party::CandidateSet;
use pop_types::{IdentityRef, InstanceId, PartyDescription, PersonhoodKey, Timestamp};

fn spawned() -> PopPartyRecord {
    let args = SpawnArguments {
        description: PartyDescription {
            name: "prop".into(),
            purpose: "prop".into(),
            datetime: Timestamp::new(0),
            location: "prop".into(),
        },
        rules_id: InstanceId::ZERO,
        mining_reward: 1,
    }
    .to_arguments()
    .unwrap();
    contract::spawn(&args, &InstanceId::ZERO, 1).unwrap()
}

proptest! {
    /// The roster depends only on the set of keys, not on insertion order.
    #[test]
    fn roster_is_insertion_order_independent(
        (keys, shuffled) in prop::collection::hash_set(prop::array::uniform32(0u8..), 1..16)
            .prop_flat_map(|set| {
                let keys: Vec<[u8; 32]> = set.into_iter().collect();
                (Just(keys.clone()), Just(keys).prop_shuffle())
            })
    ) {
        let a: CandidateSet = keys.into_iter().map(PersonhoodKey).collect();
        let b: CandidateSet = shuffled.into_iter().map(PersonhoodKey).collect();
        let (ra, rb) = (a.to_roster(), b.to_roster());
        prop_assert_eq!(ra.to_bytes(), rb.to_bytes());
        prop_assert!(ra.is_canonical());
        prop_assert_eq!(ra.len(), a.len());
    }

    /// No sequence of commands moves a party back, or forward by more than one step.
    #[test]
    fn state_only_moves_forward(commands in prop::collection::vec(0usize..4, 0..12)) {
        let roster = Attendees::new(vec![PersonhoodKey([1; 32]), PersonhoodKey([2; 32])]);
        let organizer = IdentityRef::new([7; 32]);
        let mut record = spawned();
        for pick in commands {
            let (command, args) = match pick {
                0 => (BARRIER_COMMAND, Vec::new()),
                1 => (FINALIZE_COMMAND, vec![Argument::new(ARG_ATTENDEES, roster.to_bytes())]),
                2 => (MINE_COMMAND, Vec::new()),
                _ => ("unknown", Vec::new()),
            };
            let before = record.state;
            if let Ok(next) =
                contract::invoke(&record, &InstanceId::ZERO, command, &args, Some(&organizer))
            {
                prop_assert!(before.can_transition_to(next.state) || before == next.state);
                prop_assert!(next.state.ordinal() >= before.ordinal());
                record = next;
            }
        }
    }
}
