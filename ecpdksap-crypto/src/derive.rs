//! Shared-point and cross-curve derivation.
//!
//! ## Derivation Flow (V2)
//!
//! ```text
//! shared point (r·V = v·R)
//!       ↓
//! S = e(shared, G2)                       BN254 pairing
//!       ↓
//! b = S.c0.c0.c0 mod n                    first Fp coefficient, secp256k1 order
//!       ↓
//! P = b·K                                 secp256k1
//!       ↓
//! eth_address = keccak256(P.x‖P.y)[12..32]
//! ```
//!
//! ## Private Key Derivation
//!
//! The recipient holding `k` controls `P`:
//!
//! ```text
//! sk = k·b mod n        sk·G = P
//! ```

use ark_bn254::{Fr, G1Affine};
use ark_ec::CurveGroup;
use ark_ff::{BigInteger, PrimeField};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar, U256};

use ecpdksap_core::constants::{ETH_ADDRESS_SIZE, KECCAK256_SIZE, SECP256K1_UNCOMPRESSED_XY_SIZE};
use ecpdksap_core::types::EthAddress;

use crate::context::Gt;
use crate::hash::keccak256;

// ═══════════════════════════════════════════════════════════════════════════════
// PAIRING CURVE
// ═══════════════════════════════════════════════════════════════════════════════

/// Diffie–Hellman point `scalar·point` on G1.
///
/// The sender calls it with `(r, V)`, the recipient with `(v, R)`; both
/// yield the same point.
pub fn diffie_hellman(scalar: &Fr, point: &G1Affine) -> G1Affine {
    (*point * scalar).into_affine()
}

/// Reads `b` out of a pairing output.
///
/// Takes the first base-field coefficient of the Fp12 tower (`c0.c0.c0`),
/// interprets its canonical big-endian bytes as an integer and reduces it
/// modulo the secp256k1 group order.
pub fn gt_to_secp256k1_scalar(gt: &Gt) -> Scalar {
    let coefficient = gt.0.c0.c0.c0;
    let bytes = coefficient.into_bigint().to_bytes_be();
    <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&bytes))
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes `scalar·point` on secp256k1.
pub fn secp256k1_mul(point: &AffinePoint, scalar: &Scalar) -> AffinePoint {
    (ProjectivePoint::from(*point) * scalar).to_affine()
}

/// Uncompressed `x‖y` encoding without the SEC1 tag byte.
///
/// Returns `None` for the identity.
pub fn secp256k1_uncompressed_xy(point: &AffinePoint) -> Option<[u8; SECP256K1_UNCOMPRESSED_XY_SIZE]> {
    let encoded = point.to_encoded_point(false);
    let bytes = encoded.as_bytes();
    if bytes.len() != SECP256K1_UNCOMPRESSED_XY_SIZE + 1 {
        return None;
    }
    let mut out = [0u8; SECP256K1_UNCOMPRESSED_XY_SIZE];
    out.copy_from_slice(&bytes[1..]);
    Some(out)
}

/// Derives the Ethereum address of a secp256k1 public key.
///
/// # Algorithm
///
/// ```text
/// address = keccak256(x‖y)[12..32]
/// ```
///
/// The identity has no address; it maps to the zero address.
pub fn eth_address(point: &AffinePoint) -> EthAddress {
    let Some(xy) = secp256k1_uncompressed_xy(point) else {
        return EthAddress::zero();
    };
    let hash = keccak256(&xy);

    // Take last 20 bytes as Ethereum address
    let mut address_bytes = [0u8; ETH_ADDRESS_SIZE];
    address_bytes.copy_from_slice(&hash[KECCAK256_SIZE - ETH_ADDRESS_SIZE..]);
    EthAddress::from_array(address_bytes)
}
