//! Identity (Ed25519) and personhood (Ristretto255) key generation.

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::SigningKey;
use pop_types::{
    IdentityRef, KeyPair, PersonhoodKey, PersonhoodKeyPair, PersonhoodSecret, PrivateKey,
    PublicKey,
};
use zeroize::Zeroize;

use crate::hash::{blake2b_256_multi, blake2b_512_multi};
use crate::random::{random_bytes, random_scalar};
use crate::CryptoError;

const IDENTITY_DOMAIN: &[u8] = b"pop/identity/v1";
const PERSONHOOD_SEED_DOMAIN: &[u8] = b"pop/personhood-seed/v1";

/// Generate a new Ed25519 identity key pair from OS entropy.
pub fn generate_keypair() -> Result<KeyPair, CryptoError> {
    let mut seed = random_bytes::<32>()?;
    let kp = keypair_from_seed(&seed);
    seed.zeroize();
    Ok(kp)
}

/// Derive an identity key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// The identity reference the ledger's access control knows this key by.
pub fn identity_of(public: &PublicKey) -> IdentityRef {
    IdentityRef::new(blake2b_256_multi(&[IDENTITY_DOMAIN, public.as_bytes()]))
}

/// Generate a fresh personhood key pair from OS entropy.
pub fn generate_personhood_keypair() -> Result<PersonhoodKeyPair, CryptoError> {
    let mut scalar = random_scalar()?;
    let kp = personhood_keypair(&scalar);
    scalar.zeroize();
    Ok(kp)
}

/// Derive a personhood key pair from arbitrary seed material (deterministic).
pub fn personhood_keypair_from_seed(seed: &[u8]) -> PersonhoodKeyPair {
    let mut wide = blake2b_512_multi(&[PERSONHOOD_SEED_DOMAIN, seed]);
    let mut scalar = Scalar::from_bytes_mod_order_wide(&wide);
    let kp = personhood_keypair(&scalar);
    wide.zeroize();
    scalar.zeroize();
    kp
}

/// Recompute the public personhood key for a secret.
pub fn personhood_public(secret: &PersonhoodSecret) -> Result<PersonhoodKey, CryptoError> {
    let mut scalar = secret_scalar(secret)?;
    let public = PersonhoodKey(RistrettoPoint::mul_base(&scalar).compress().to_bytes());
    scalar.zeroize();
    Ok(public)
}

/// Whether `key` decodes to a usable (non-identity) group element.
pub fn is_valid_personhood_key(key: &PersonhoodKey) -> bool {
    decompress_personhood_key(key).is_some()
}

fn personhood_keypair(scalar: &Scalar) -> PersonhoodKeyPair {
    PersonhoodKeyPair {
        public: PersonhoodKey(RistrettoPoint::mul_base(scalar).compress().to_bytes()),
        secret: PersonhoodSecret(scalar.to_bytes()),
    }
}

pub(crate) fn secret_scalar(secret: &PersonhoodSecret) -> Result<Scalar, CryptoError> {
    let scalar: Option<Scalar> = Scalar::from_canonical_bytes(secret.0).into();
    match scalar {
        Some(s) if s != Scalar::ZERO => Ok(s),
        _ => Err(CryptoError::InvalidSecret),
    }
}

pub(crate) fn decompress_personhood_key(key: &PersonhoodKey) -> Option<RistrettoPoint> {
    // The all-zero encoding is the identity element, which no secret maps to.
    if key.0 == [0u8; 32] {
        return None;
    }
    CompressedRistretto(key.0).decompress()
}
