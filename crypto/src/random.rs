//! OS entropy for key generation and signature nonces.

use curve25519_dalek::scalar::Scalar;
use zeroize::Zeroize;

use crate::CryptoError;

pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf).map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(buf)
}

/// A uniformly random scalar, reduced from 64 bytes of entropy.
pub(crate) fn random_scalar() -> Result<Scalar, CryptoError> {
    let mut wide = random_bytes::<64>()?;
    let scalar = Scalar::from_bytes_mod_order_wide(&wide);
    wide.zeroize();
    Ok(scalar)
}
