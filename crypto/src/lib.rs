//! Cryptographic primitives for proof-of-personhood parties.
//!
//! - **Ed25519** for organizer identities signing ledger instructions
//! - **Blake2b** for digests, id derivation, and hash-to-group
//! - **Ristretto255** personhood keys and the linkable ring signature
//!   used to mine anonymously (see [`ring`])

pub mod error;
pub mod hash;
pub mod keys;
mod random;
pub mod ring;
pub mod sign;

pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, blake2b_512_multi};
pub use keys::{
    generate_keypair, generate_personhood_keypair, identity_of, is_valid_personhood_key,
    keypair_from_seed, personhood_keypair_from_seed, personhood_public, public_from_private,
};
pub use ring::{linkage_tag, sign, verify, verify_many, LinkScope, LinkableSignature};
pub use sign::{sign_message, verify_signature};
