//! Ed25519 signatures over instruction digests.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use pop_types::{PrivateKey, PublicKey, Signature};

/// Sign `message` with an identity's private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Check an identity signature. Malformed keys verify as `false`.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn signs_and_verifies_digest() {
        let kp = keypair_from_seed(&[3u8; 32]);
        let digest = [0x5Au8; 32];
        let sig = sign_message(&digest, &kp.private);
        assert!(verify_signature(&digest, &sig, &kp.public));
    }

    #[test]
    fn rejects_other_signer() {
        let organizer = keypair_from_seed(&[3u8; 32]);
        let impostor = keypair_from_seed(&[4u8; 32]);
        let sig = sign_message(b"barrier", &impostor.private);
        assert!(!verify_signature(b"barrier", &sig, &organizer.public));
    }

    #[test]
    fn rejects_tampered_message() {
        let kp = keypair_from_seed(&[3u8; 32]);
        let sig = sign_message(b"finalize", &kp.private);
        assert!(!verify_signature(b"finalise", &sig, &kp.public));
    }

    #[test]
    fn rejects_undecodable_public_key() {
        let kp = keypair_from_seed(&[3u8; 32]);
        let sig = sign_message(b"x", &kp.private);
        assert!(!verify_signature(b"x", &sig, &PublicKey([0xFF; 32])));
    }
}
