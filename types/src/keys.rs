//! Key types for identity signing and anonymous personhood credentials.
//!
//! Two key families coexist:
//! - Ed25519 identity keys ([`PublicKey`], [`PrivateKey`]) authorise
//!   organizer instructions on the ledger.
//! - Personhood keys ([`PersonhoodKey`], [`PersonhoodSecret`]) are Ristretto
//!   group elements scanned at a party and used as ring members when mining.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte Ed25519 public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

/// A 32-byte Ed25519 private key (seed).
///
/// Does not implement `Debug`, `Serialize`, or `Clone`. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A 64-byte Ed25519 signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SigVisitor;

        impl<'de> serde::de::Visitor<'de> for SigVisitor {
            type Value = Signature;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "64 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                let arr: [u8; 64] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                Ok(Signature(arr))
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut arr = [0u8; 64];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(Signature(arr))
            }
        }

        deserializer.deserialize_bytes(SigVisitor)
    }
}

/// An Ed25519 identity key pair.
///
/// Built by `pop_crypto::generate_keypair()` or `pop_crypto::keypair_from_seed()`.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

/// A personhood public key: the canonical 32-byte compressed Ristretto encoding.
///
/// Ordering is unsigned byte-wise lexicographic on the encoding, which is the
/// order a finalized roster is sorted in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonhoodKey(pub [u8; 32]);

impl PersonhoodKey {
    pub const LEN: usize = 32;

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PersonhoodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonhoodKey({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for PersonhoodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// The secret scalar behind a [`PersonhoodKey`], in canonical little-endian form.
///
/// Zeroized on drop and never printed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PersonhoodSecret(pub [u8; 32]);

/// A personhood key pair as held by an attendee.
pub struct PersonhoodKeyPair {
    pub public: PersonhoodKey,
    pub secret: PersonhoodSecret,
}

/// Linkage tag of a linkable ring signature.
///
/// Identical for the same signer under the same context and action, so the
/// ledger can refuse a second claim without learning who claimed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkageTag(pub [u8; 32]);

impl LinkageTag {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for LinkageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkageTag({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for LinkageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personhood_keys_order_bytewise() {
        let mut keys = vec![
            PersonhoodKey([0x02; 32]),
            PersonhoodKey([0x00; 32]),
            PersonhoodKey([0x01; 32]),
        ];
        keys.sort();
        assert_eq!(keys[0].0[0], 0x00);
        assert_eq!(keys[1].0[0], 0x01);
        assert_eq!(keys[2].0[0], 0x02);
    }

    #[test]
    fn ordering_is_unsigned() {
        let mut low = [0u8; 32];
        low[0] = 0x7F;
        let mut high = [0u8; 32];
        high[0] = 0x80;
        assert!(PersonhoodKey(low) < PersonhoodKey(high));
    }

    #[test]
    fn signature_bincode_roundtrip() {
        let sig = Signature([7u8; 64]);
        let bytes = bincode::serialize(&sig).unwrap();
        let back: Signature = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, sig);
    }
}
