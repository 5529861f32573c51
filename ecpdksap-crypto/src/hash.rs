//! Hashing utilities.
//!
//! Two hash functions are used by the protocol:
//!
//! ```text
//! SHA-256    → view tags, hash-to-scalar (V1)
//! Keccak-256 → Ethereum addresses (V2)
//! ```
//!
//! Points are always hashed over their fixed-width big-endian `x‖y`
//! encoding, never over a textual form.

use ark_bn254::{Fr, G1Affine};
use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

use ecpdksap_core::constants::{KECCAK256_SIZE, SHA256_SIZE};

use crate::codec::g1_to_xy_bytes;

// ═══════════════════════════════════════════════════════════════════════════════
// SHA-256
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes SHA-256 of `input`.
pub fn sha256(input: &[u8]) -> [u8; SHA256_SIZE] {
    Sha256::digest(input).into()
}

/// SHA-256 of a G1 point's `x‖y` encoding.
pub fn sha256_g1(point: &G1Affine) -> [u8; SHA256_SIZE] {
    sha256(&g1_to_xy_bytes(point))
}

/// Maps a G1 point to a BN254 scalar.
///
/// `h = SHA-256(x‖y) mod r`, digest read big-endian.
pub fn hash_to_scalar(point: &G1Affine) -> Fr {
    Fr::from_be_bytes_mod_order(&sha256_g1(point))
}

// ═══════════════════════════════════════════════════════════════════════════════
// KECCAK-256
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes Keccak256 hash (used for Ethereum addresses).
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; KECCAK256_SIZE] {
    use sha3::Keccak256;

    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_g1_hashes_xy() {
        let mut xy = [0u8; 64];
        xy[31] = 1;
        xy[63] = 2;
        assert_eq!(sha256_g1(&G1Affine::generator()), sha256(&xy));
    }

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_to_scalar_stable() {
        let g = G1Affine::generator();
        let h1 = hash_to_scalar(&g);
        let h2 = hash_to_scalar(&g);
        assert_eq!(h1, h2);

        let mut xy = [0u8; 64];
        xy[31] = 1;
        xy[63] = 2;
        assert_eq!(h1, Fr::from_be_bytes_mod_order(&sha256(&xy)));
    }

    #[test]
    fn test_hash_to_scalar_separates_points() {
        let g = G1Affine::generator();
        let two_g = (g + g).into();
        assert_ne!(hash_to_scalar(&g), hash_to_scalar(&two_g));
    }
}
