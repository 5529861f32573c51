//! Protocol constants for ECPDKSAP.
//!
//! Sizes follow the fixed-width encodings of BN254 and secp256k1 field
//! elements. Every wire encoding in the protocol is built from them.

// ═══════════════════════════════════════════════════════════════════════════════
// FIELD & POINT ENCODINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a big-endian BN254 base or scalar field element encoding.
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Size of a big-endian secp256k1 field element or scalar encoding.
pub const SECP256K1_FIELD_SIZE: usize = 32;

/// Separator between the hex coordinates of an encoded point.
pub const COORDINATE_SEPARATOR: char = '.';

/// Number of hex coordinates in an encoded G1 / secp256k1 point (`x.y`).
pub const AFFINE_COORDINATE_COUNT: usize = 2;

/// Number of hex coordinates in an encoded G2 point (`x0.x1.y0.y1`).
pub const G2_COORDINATE_COUNT: usize = 4;

/// Size of the canonical uncompressed encoding of a BN254 pairing output
/// (twelve base field elements).
pub const GT_SERIALIZED_SIZE: usize = 12 * FIELD_ELEMENT_SIZE;

/// Size of an uncompressed secp256k1 point without the SEC1 tag byte.
pub const SECP256K1_UNCOMPRESSED_XY_SIZE: usize = 2 * SECP256K1_FIELD_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAG CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Shortest supported view tag in bytes.
pub const VIEW_TAG_MIN_LEN: usize = 1;

/// Longest supported view tag in bytes.
pub const VIEW_TAG_MAX_LEN: usize = 2;

/// Number of possible values of a one-byte view tag.
pub const VIEW_TAG_SPACE: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of Ethereum address in bytes (20 bytes = 160 bits).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

/// Size of SHA-256 hash output.
pub const SHA256_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// PERFORMANCE TUNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default batch size for scanning candidates.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 1000;

/// Maximum candidates dispatched in a single batch.
pub const MAX_SCAN_BATCH_SIZE: usize = 10_000;

/// Expected probability that a non-matching candidate survives a view tag
/// filter of `num_bytes` bytes.
pub fn expected_false_positive_rate(num_bytes: usize) -> f64 {
    1.0 / (VIEW_TAG_SPACE as f64).powi(num_bytes as i32)
}
