//! Blake2b hashing.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Blake2b512, Digest};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence without concatenating them.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// 512-bit variant, used wherever a uniform wide input is reduced into the
/// scalar field or mapped onto the group.
pub fn blake2b_512_multi(parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    for part in parts {
        hasher.update(part);
    }
    finalize_wide(hasher)
}

pub(crate) fn finalize_wide(hasher: Blake2b512) -> [u8; 64] {
    let mut output = [0u8; 64];
    output.copy_from_slice(&hasher.finalize());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        assert_eq!(blake2b_256(b"party"), blake2b_256(b"party"));
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"barrier"), blake2b_256(b"finalize"));
    }

    #[test]
    fn multi_matches_concatenation() {
        assert_eq!(
            blake2b_256(b"popparty"),
            blake2b_256_multi(&[b"pop", b"party"])
        );
        assert_eq!(
            blake2b_512_multi(&[b"popparty"]),
            blake2b_512_multi(&[b"pop", b"party"])
        );
    }

    #[test]
    fn wide_output_is_not_padded_narrow() {
        let wide = blake2b_512_multi(&[b"mine"]);
        assert_ne!(&wide[..32], &blake2b_256(b"mine")[..]);
    }
}
