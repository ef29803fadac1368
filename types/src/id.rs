//! 32-byte identifiers for ledger instances and identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

macro_rules! byte_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
                    expected: 32,
                    actual: bytes.len(),
                })?;
                Ok(Self(arr))
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(s.trim())?;
                Self::from_slice(&bytes)
            }
        }
    };
}

byte_id!(
    /// Identifier of an instance (party, access rules, credential, coin) on the ledger.
    ///
    /// A party's instance id doubles as the context of its linkable ring
    /// signatures, which binds every mining claim to exactly one party.
    InstanceId
);

byte_id!(
    /// Reference to an identity known to the ledger's access control.
    ///
    /// Resolves to an Ed25519 signing key for authorisation and, through the
    /// identity's credential, to a personhood key.
    IdentityRef
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_roundtrips_through_from_str() {
        let id = InstanceId::new([0xAB; 32]);
        let parsed: InstanceId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn from_str_rejects_wrong_length() {
        let err = "abcd".parse::<IdentityRef>().unwrap_err();
        assert!(matches!(
            err,
            TypesError::InvalidLength {
                expected: 32,
                actual: 2
            }
        ));
    }

    #[test]
    fn from_str_rejects_non_hex() {
        assert!("zz".repeat(32).parse::<InstanceId>().is_err());
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = IdentityRef::new([0x01; 32]);
        assert_eq!(format!("{id:?}"), "IdentityRef(01010101)");
    }

    #[test]
    fn zero_detection() {
        assert!(InstanceId::ZERO.is_zero());
        assert!(!InstanceId::new([1; 32]).is_zero());
    }
}
