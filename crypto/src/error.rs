use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("ring must contain at least one public key")]
    EmptyRing,

    #[error("signer's public key is not a member of the ring")]
    SignerNotInRing,

    #[error("ring member {0} is not a valid personhood key")]
    InvalidRingKey(usize),

    #[error("personhood secret is not a canonical non-zero scalar")]
    InvalidSecret,

    #[error("malformed linkable signature: {0}")]
    MalformedSignature(String),

    #[error("entropy source failed: {0}")]
    Entropy(String),
}
