//! Linkable ring signatures over Ristretto255.
//!
//! A signature proves that the signer owns the secret behind one key of a
//! disclosed ring, without revealing which one, and carries a linkage tag
//! `T = x·H(scope)`. The link base `H` is derived from the [`LinkScope`]
//! (party context plus action label) and not from the message, so one signer
//! produces the same tag for every signature under a scope and unrelated tags
//! under any other scope.
//!
//! Ring equation, for member `i` with key `P_i`:
//! ```text
//! L_i = s_i·G + c_i·P_i
//! R_i = s_i·H + c_i·T
//! c_{i+1} = Hs(prefix || L_i || R_i)
//! ```
//! where `prefix` commits to the scope, the full ring, `T`, and the message.
//! The signature is valid when walking the whole ring from `c_0` closes back
//! to `c_0`.
//!
//! The engine does not prevent double use of a tag; the ledger does.

use blake2::{Blake2b512, Digest};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use pop_types::{LinkageTag, PersonhoodKey, PersonhoodSecret};
use rayon::prelude::*;
use zeroize::Zeroize;

use crate::hash::{blake2b_512_multi, finalize_wide};
use crate::keys::{decompress_personhood_key, secret_scalar};
use crate::random::random_scalar;
use crate::CryptoError;

const LINK_BASE_DOMAIN: &[u8] = b"pop/lrs/link-base/v1";
const CHALLENGE_DOMAIN: &[u8] = b"pop/lrs/challenge/v1";

/// What a linkage tag is bound to.
#[derive(Clone, Copy, Debug)]
pub struct LinkScope<'a> {
    /// Party context, normally the party's ledger instance id.
    pub context: &'a [u8],
    /// Claimable action label, e.g. `b"mine"`.
    pub action: &'a [u8],
}

impl<'a> LinkScope<'a> {
    pub fn new(context: &'a [u8], action: &'a [u8]) -> Self {
        Self { context, action }
    }

    fn link_base(&self) -> RistrettoPoint {
        let wide = blake2b_512_multi(&[
            LINK_BASE_DOMAIN,
            &(self.context.len() as u64).to_le_bytes(),
            self.context,
            &(self.action.len() as u64).to_le_bytes(),
            self.action,
        ]);
        RistrettoPoint::from_uniform_bytes(&wide)
    }
}

/// A linkable ring signature.
///
/// Wire layout: `tag (32) || c_0 (32) || s_0 .. s_{n-1} (32 each)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkableSignature {
    tag: LinkageTag,
    challenge: [u8; 32],
    responses: Vec<[u8; 32]>,
}

impl LinkableSignature {
    pub fn tag(&self) -> LinkageTag {
        self.tag
    }

    /// Number of ring members this signature was produced over.
    pub fn ring_size(&self) -> usize {
        self.responses.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + 32 * self.responses.len());
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(&self.challenge);
        for s in &self.responses {
            out.extend_from_slice(s);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < 96 || bytes.len() % 32 != 0 {
            return Err(CryptoError::MalformedSignature(format!(
                "length {} is not 64 + 32·n with n ≥ 1",
                bytes.len()
            )));
        }
        let mut chunks = bytes.chunks_exact(32).map(|c| {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(c);
            arr
        });
        let tag = LinkageTag(chunks.next().unwrap_or_default());
        let challenge = chunks.next().unwrap_or_default();
        Ok(Self {
            tag,
            challenge,
            responses: chunks.collect(),
        })
    }
}

/// Sign `message` as an anonymous member of `ring`.
///
/// The signer's position is found by matching the public counterpart of
/// `secret` against the ring.
pub fn sign(
    message: &[u8],
    ring: &[PersonhoodKey],
    scope: LinkScope<'_>,
    secret: &PersonhoodSecret,
) -> Result<LinkableSignature, CryptoError> {
    if ring.is_empty() {
        return Err(CryptoError::EmptyRing);
    }
    let points = decompress_ring(ring)?;
    let mut x = secret_scalar(secret)?;

    let own = RistrettoPoint::mul_base(&x).compress().to_bytes();
    let mut position = None;
    for (i, key) in ring.iter().enumerate() {
        if position.is_none() && key.0 == own {
            position = Some(i);
        }
    }
    let Some(pi) = position else {
        x.zeroize();
        return Err(CryptoError::SignerNotInRing);
    };

    let n = ring.len();
    let base = scope.link_base();
    let tag = x * base;
    let tag_bytes = tag.compress().to_bytes();
    let prefix = challenge_prefix(message, ring, scope, &tag_bytes);

    let mut u = random_scalar()?;
    let mut c = vec![Scalar::ZERO; n];
    let mut s = vec![Scalar::ZERO; n];
    c[(pi + 1) % n] = round_challenge(&prefix, &RistrettoPoint::mul_base(&u), &(u * base));

    let mut i = (pi + 1) % n;
    while i != pi {
        s[i] = random_scalar()?;
        let l = RistrettoPoint::mul_base(&s[i]) + c[i] * points[i];
        let r = s[i] * base + c[i] * tag;
        c[(i + 1) % n] = round_challenge(&prefix, &l, &r);
        i = (i + 1) % n;
    }
    s[pi] = u - x * c[pi];

    u.zeroize();
    x.zeroize();

    Ok(LinkableSignature {
        tag: LinkageTag(tag_bytes),
        challenge: c[0].to_bytes(),
        responses: s.iter().map(Scalar::to_bytes).collect(),
    })
}

/// Check a linkable signature against exactly `ring` and `scope`.
///
/// Every ring member is processed regardless of intermediate results.
pub fn verify(
    message: &[u8],
    signature: &LinkableSignature,
    ring: &[PersonhoodKey],
    scope: LinkScope<'_>,
) -> bool {
    if ring.is_empty() || signature.responses.len() != ring.len() {
        return false;
    }
    let Ok(points) = decompress_ring(ring) else {
        return false;
    };
    let Some(tag) = decompress_tag(&signature.tag) else {
        return false;
    };
    let Some(c0) = canonical_scalar(&signature.challenge) else {
        return false;
    };
    let responses: Option<Vec<Scalar>> =
        signature.responses.iter().map(canonical_scalar).collect();
    let Some(responses) = responses else {
        return false;
    };

    let base = scope.link_base();
    let prefix = challenge_prefix(message, ring, scope, signature.tag.as_bytes());

    let mut c = c0;
    for (s, p) in responses.iter().zip(points.iter()) {
        let l = RistrettoPoint::vartime_double_scalar_mul_basepoint(&c, p, s);
        let r = s * base + c * tag;
        c = round_challenge(&prefix, &l, &r);
    }
    // Scalar equality is constant-time.
    c == c0
}

/// Verify independent signatures over the same ring and scope in parallel.
pub fn verify_many(
    claims: &[(&[u8], &LinkableSignature)],
    ring: &[PersonhoodKey],
    scope: LinkScope<'_>,
) -> Vec<bool> {
    claims
        .par_iter()
        .map(|(message, signature)| verify(message, signature, ring, scope))
        .collect()
}

/// The tag `secret` would produce under `scope`, without signing anything.
pub fn linkage_tag(
    secret: &PersonhoodSecret,
    scope: LinkScope<'_>,
) -> Result<LinkageTag, CryptoError> {
    let mut x = secret_scalar(secret)?;
    let tag = (x * scope.link_base()).compress().to_bytes();
    x.zeroize();
    Ok(LinkageTag(tag))
}

fn decompress_ring(ring: &[PersonhoodKey]) -> Result<Vec<RistrettoPoint>, CryptoError> {
    ring.iter()
        .enumerate()
        .map(|(i, key)| decompress_personhood_key(key).ok_or(CryptoError::InvalidRingKey(i)))
        .collect()
}

fn decompress_tag(tag: &LinkageTag) -> Option<RistrettoPoint> {
    if tag.0 == [0u8; 32] {
        return None;
    }
    CompressedRistretto(tag.0).decompress()
}

fn canonical_scalar(bytes: &[u8; 32]) -> Option<Scalar> {
    Scalar::from_canonical_bytes(*bytes).into()
}

fn put(hasher: &mut Blake2b512, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn challenge_prefix(
    message: &[u8],
    ring: &[PersonhoodKey],
    scope: LinkScope<'_>,
    tag: &[u8; 32],
) -> Blake2b512 {
    let mut hasher = Blake2b512::new();
    hasher.update(CHALLENGE_DOMAIN);
    put(&mut hasher, scope.context);
    put(&mut hasher, scope.action);
    hasher.update((ring.len() as u64).to_le_bytes());
    for key in ring {
        hasher.update(key.as_bytes());
    }
    hasher.update(tag);
    put(&mut hasher, message);
    hasher
}

fn round_challenge(prefix: &Blake2b512, l: &RistrettoPoint, r: &RistrettoPoint) -> Scalar {
    let mut hasher = prefix.clone();
    hasher.update(l.compress().as_bytes());
    hasher.update(r.compress().as_bytes());
    Scalar::from_bytes_mod_order_wide(&finalize_wide(hasher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::personhood_keypair_from_seed;
    use pop_types::PersonhoodKeyPair;

    const PARTY_A: &[u8] = &[0xA1; 32];
    const PARTY_B: &[u8] = &[0xB2; 32];

    fn attendees(n: usize) -> (Vec<PersonhoodKeyPair>, Vec<PersonhoodKey>) {
        let kps: Vec<_> = (0..n)
            .map(|i| personhood_keypair_from_seed(&[i as u8]))
            .collect();
        let mut ring: Vec<_> = kps.iter().map(|kp| kp.public).collect();
        ring.sort();
        (kps, ring)
    }

    #[test]
    fn every_member_can_sign() {
        let (kps, ring) = attendees(5);
        let scope = LinkScope::new(PARTY_A, b"mine");
        for kp in &kps {
            let sig = sign(b"mine", &ring, scope, &kp.secret).unwrap();
            assert!(verify(b"mine", &sig, &ring, scope));
        }
    }

    #[test]
    fn single_member_ring() {
        let (kps, ring) = attendees(1);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let sig = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();
        assert!(verify(b"mine", &sig, &ring, scope));
    }

    #[test]
    fn same_signer_same_scope_links() {
        let (kps, ring) = attendees(3);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let a = sign(b"first", &ring, scope, &kps[1].secret).unwrap();
        let b = sign(b"second", &ring, scope, &kps[1].secret).unwrap();
        assert_eq!(a.tag(), b.tag());
        assert_ne!(a, b);
    }

    #[test]
    fn different_signers_do_not_link() {
        let (kps, ring) = attendees(3);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let a = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();
        let b = sign(b"mine", &ring, scope, &kps[1].secret).unwrap();
        assert_ne!(a.tag(), b.tag());
    }

    #[test]
    fn tag_depends_on_context_and_action() {
        let kp = personhood_keypair_from_seed(b"attendee");
        let mine_a = linkage_tag(&kp.secret, LinkScope::new(PARTY_A, b"mine")).unwrap();
        let mine_b = linkage_tag(&kp.secret, LinkScope::new(PARTY_B, b"mine")).unwrap();
        let vote_a = linkage_tag(&kp.secret, LinkScope::new(PARTY_A, b"vote")).unwrap();
        assert_ne!(mine_a, mine_b);
        assert_ne!(mine_a, vote_a);
    }

    #[test]
    fn linkage_tag_matches_signature_tag() {
        let (kps, ring) = attendees(4);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let sig = sign(b"mine", &ring, scope, &kps[2].secret).unwrap();
        assert_eq!(linkage_tag(&kps[2].secret, scope).unwrap(), sig.tag());
    }

    #[test]
    fn wrong_message_scope_or_ring_fails() {
        let (kps, ring) = attendees(3);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let sig = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();

        assert!(!verify(b"mint", &sig, &ring, scope));
        assert!(!verify(b"mine", &sig, &ring, LinkScope::new(PARTY_B, b"mine")));
        assert!(!verify(b"mine", &sig, &ring, LinkScope::new(PARTY_A, b"vote")));

        let mut reordered = ring.clone();
        reordered.swap(0, 2);
        assert!(!verify(b"mine", &sig, &reordered, scope));

        let (_, other_ring) = attendees(4);
        assert!(!verify(b"mine", &sig, &other_ring, scope));
    }

    #[test]
    fn forged_tag_fails() {
        let (kps, ring) = attendees(3);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let honest = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();
        let other = sign(b"mine", &ring, scope, &kps[1].secret).unwrap();
        let forged = LinkableSignature {
            tag: other.tag(),
            ..honest
        };
        assert!(!verify(b"mine", &forged, &ring, scope));
    }

    #[test]
    fn outsider_cannot_sign() {
        let (_, ring) = attendees(3);
        let outsider = personhood_keypair_from_seed(b"gatecrasher");
        let err = sign(b"mine", &ring, LinkScope::new(PARTY_A, b"mine"), &outsider.secret)
            .unwrap_err();
        assert!(matches!(err, CryptoError::SignerNotInRing));
    }

    #[test]
    fn empty_and_invalid_rings_are_rejected() {
        let kp = personhood_keypair_from_seed(b"solo");
        let scope = LinkScope::new(PARTY_A, b"mine");
        assert!(matches!(
            sign(b"mine", &[], scope, &kp.secret).unwrap_err(),
            CryptoError::EmptyRing
        ));
        let ring = vec![kp.public, PersonhoodKey([0u8; 32])];
        assert!(matches!(
            sign(b"mine", &ring, scope, &kp.secret).unwrap_err(),
            CryptoError::InvalidRingKey(1)
        ));
    }

    #[test]
    fn bytes_roundtrip_and_length_checks() {
        let (kps, ring) = attendees(3);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let sig = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();
        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), 64 + 32 * 3);
        let back = LinkableSignature::from_bytes(&bytes).unwrap();
        assert_eq!(back, sig);
        assert!(verify(b"mine", &back, &ring, scope));

        assert!(LinkableSignature::from_bytes(&bytes[..64]).is_err());
        assert!(LinkableSignature::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn truncated_responses_fail() {
        let (kps, ring) = attendees(3);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let sig = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();
        let bytes = sig.to_bytes();
        let short = LinkableSignature::from_bytes(&bytes[..bytes.len() - 32]).unwrap();
        assert!(!verify(b"mine", &short, &ring, scope));
    }

    #[test]
    fn verify_many_flags_each_claim() {
        let (kps, ring) = attendees(4);
        let scope = LinkScope::new(PARTY_A, b"mine");
        let good = sign(b"mine", &ring, scope, &kps[0].secret).unwrap();
        let other = sign(b"mine", &ring, LinkScope::new(PARTY_B, b"mine"), &kps[1].secret)
            .unwrap();
        let results = verify_many(
            &[(b"mine".as_slice(), &good), (b"mine".as_slice(), &other)],
            &ring,
            scope,
        );
        assert_eq!(results, vec![true, false]);
    }
}
