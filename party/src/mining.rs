//! Building anonymous mining claims.

use pop_crypto::{linkage_tag, sign};
use pop_ledger::payload::MINE_MESSAGE;
use pop_ledger::{mining_scope, Attendees, MiningPayload, RewardTarget};
use pop_types::{InstanceId, LinkageTag, PersonhoodSecret};

use crate::PartyError;

/// Sign the mining message over `roster` and package the claim.
pub fn mining_payload(
    instance_id: &InstanceId,
    roster: &Attendees,
    secret: &PersonhoodSecret,
    reward_target: RewardTarget,
) -> Result<MiningPayload, PartyError> {
    let signature = sign(MINE_MESSAGE, roster.keys(), mining_scope(instance_id), secret)?;
    Ok(MiningPayload::new(signature, reward_target))
}

/// The tag `secret` mines under for this party.
pub fn mining_tag(
    instance_id: &InstanceId,
    secret: &PersonhoodSecret,
) -> Result<LinkageTag, PartyError> {
    Ok(linkage_tag(secret, mining_scope(instance_id))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_crypto::{personhood_keypair_from_seed, verify, CryptoError};
    use pop_types::IdentityRef;

    #[test]
    fn payload_verifies_and_carries_the_mining_tag() {
        let party = InstanceId::new([7; 32]);
        let kps: Vec<_> = (0u8..4).map(|i| personhood_keypair_from_seed(&[i])).collect();
        let mut keys: Vec<_> = kps.iter().map(|kp| kp.public).collect();
        keys.sort();
        let roster = Attendees::new(keys);

        let payload = mining_payload(
            &party,
            &roster,
            &kps[2].secret,
            RewardTarget::NewAccount(IdentityRef::new([1; 32])),
        )
        .unwrap();
        assert!(verify(
            MINE_MESSAGE,
            &payload.signature,
            roster.keys(),
            mining_scope(&party)
        ));
        assert_eq!(payload.linkage_tag, mining_tag(&party, &kps[2].secret).unwrap());
    }

    #[test]
    fn outsider_cannot_build_a_claim() {
        let insider = personhood_keypair_from_seed(b"in");
        let outsider = personhood_keypair_from_seed(b"out");
        let roster = Attendees::new(vec![insider.public]);
        let err = mining_payload(
            &InstanceId::ZERO,
            &roster,
            &outsider.secret,
            RewardTarget::Coin(InstanceId::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, PartyError::Crypto(CryptoError::SignerNotInRing)));
    }
}
