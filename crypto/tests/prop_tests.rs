use proptest::prelude::*;

use pop_crypto::{linkage_tag, personhood_keypair_from_seed, sign, verify, LinkScope};
use pop_types::PersonhoodKey;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any member of any ring produces a signature that verifies over that ring.
    #[test]
    fn any_member_signature_verifies(
        size in 1usize..8,
        signer in 0usize..8,
        context in prop::array::uniform32(0u8..),
    ) {
        let signer = signer % size;
        let kps: Vec<_> = (0..size)
            .map(|i| personhood_keypair_from_seed(&[i as u8, size as u8]))
            .collect();
        let ring: Vec<PersonhoodKey> = kps.iter().map(|kp| kp.public).collect();
        let scope = LinkScope::new(&context, b"mine");

        let sig = sign(b"mine", &ring, scope, &kps[signer].secret).unwrap();
        prop_assert!(verify(b"mine", &sig, &ring, scope));
        prop_assert_eq!(sig.tag(), linkage_tag(&kps[signer].secret, scope).unwrap());
    }

    /// Tags of one signer differ between contexts.
    #[test]
    fn tags_differ_across_contexts(
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        prop_assume!(a != b);
        let kp = personhood_keypair_from_seed(b"attendee");
        let ta = linkage_tag(&kp.secret, LinkScope::new(&a, b"mine")).unwrap();
        let tb = linkage_tag(&kp.secret, LinkScope::new(&b, b"mine")).unwrap();
        prop_assert_ne!(ta, tb);
    }
}
