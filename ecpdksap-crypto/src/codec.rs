//! Hex wire formats for scalars, points and pairing outputs.
//!
//! ## Formats
//!
//! | value | encoding |
//! |---|---|
//! | BN254 / secp256k1 scalar | big-endian hex, optional `0x`, reduced into the field |
//! | BN254 G1, secp256k1 point | `x.y`, each coordinate big-endian hex |
//! | BN254 G2 point | `x.c0.x.c1.y.c0.y.c1` |
//! | GT element | hex of the 384-byte canonical uncompressed serialization |
//! | Ethereum address | `0x` + 40 lowercase hex characters |
//!
//! Coordinates must be canonical field elements (`MalformedEncoding`
//! otherwise) and the decoded point must lie on the curve and in the prime
//! order subgroup (`PointNotOnCurve` otherwise).

use ark_bn254::{Fq, Fq2, Fr, G1Affine};
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, Scalar, U256};

use ecpdksap_core::constants::{
    AFFINE_COORDINATE_COUNT, COORDINATE_SEPARATOR, FIELD_ELEMENT_SIZE, G2_COORDINATE_COUNT,
    GT_SERIALIZED_SIZE, SECP256K1_FIELD_SIZE,
};
use ecpdksap_core::error::{EcpdksapError, Result};
use ecpdksap_core::types::EthAddress;

use crate::context::Gt;

/// secp256k1 base field modulus, big-endian.
const SECP256K1_P: [u8; SECP256K1_FIELD_SIZE] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// A value with a textual hex wire encoding.
pub trait WireFormat: Sized {
    /// Name used in error messages.
    const WHAT: &'static str;

    /// Encodes the value.
    fn to_wire(&self) -> String;

    /// Decodes and validates a value.
    fn from_wire(s: &str) -> Result<Self>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes big-endian hex of at most 32 bytes into a left-padded array.
///
/// Odd-length input is accepted (`0x1` is one).
fn decode_be32(what: &'static str, s: &str) -> Result<[u8; FIELD_ELEMENT_SIZE]> {
    let digits = strip_hex_prefix(s);
    if digits.is_empty() {
        return Err(EcpdksapError::malformed(what, "empty value"));
    }
    if digits.len() > FIELD_ELEMENT_SIZE * 2 {
        return Err(EcpdksapError::malformed(
            what,
            format!("{} hex digits, at most {}", digits.len(), FIELD_ELEMENT_SIZE * 2),
        ));
    }

    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    let bytes = hex::decode(digits).map_err(|e| EcpdksapError::malformed(what, e.to_string()))?;

    let mut out = [0u8; FIELD_ELEMENT_SIZE];
    out[FIELD_ELEMENT_SIZE - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

fn split_coordinates<'a>(what: &'static str, s: &'a str, count: usize) -> Result<Vec<&'a str>> {
    let parts: Vec<&str> = s.trim().split(COORDINATE_SEPARATOR).collect();
    if parts.len() != count {
        return Err(EcpdksapError::malformed(
            what,
            format!("expected {count} coordinates, found {}", parts.len()),
        ));
    }
    Ok(parts)
}

fn fq_to_be(f: &Fq) -> [u8; FIELD_ELEMENT_SIZE] {
    let mut out = [0u8; FIELD_ELEMENT_SIZE];
    out.copy_from_slice(&f.into_bigint().to_bytes_be());
    out
}

fn fq_from_wire(what: &'static str, s: &str) -> Result<Fq> {
    let bytes = decode_be32(what, s)?;
    let f = Fq::from_be_bytes_mod_order(&bytes);
    if fq_to_be(&f) != bytes {
        return Err(EcpdksapError::malformed(what, "coordinate is not a field element"));
    }
    Ok(f)
}

/// Big-endian `x‖y` coordinates of a G1 point.
pub fn g1_to_xy_bytes(p: &G1Affine) -> [u8; 2 * FIELD_ELEMENT_SIZE] {
    let mut out = [0u8; 2 * FIELD_ELEMENT_SIZE];
    out[..FIELD_ELEMENT_SIZE].copy_from_slice(&fq_to_be(&p.x));
    out[FIELD_ELEMENT_SIZE..].copy_from_slice(&fq_to_be(&p.y));
    out
}

/// Big-endian X coordinate of a G1 point.
pub fn g1_x_bytes(p: &G1Affine) -> [u8; FIELD_ELEMENT_SIZE] {
    fq_to_be(&p.x)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

impl WireFormat for Fr {
    const WHAT: &'static str = "BN254 scalar";

    fn to_wire(&self) -> String {
        hex::encode(self.into_bigint().to_bytes_be())
    }

    fn from_wire(s: &str) -> Result<Self> {
        Ok(Fr::from_be_bytes_mod_order(&decode_be32(Self::WHAT, s)?))
    }
}

impl WireFormat for Scalar {
    const WHAT: &'static str = "secp256k1 scalar";

    fn to_wire(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn from_wire(s: &str) -> Result<Self> {
        let bytes = decode_be32(Self::WHAT, s)?;
        Ok(<Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&bytes)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Base field of a BN254 group, laid out as base field limbs on the wire.
pub trait CoordinateField: Copy {
    /// Name of points over this field, used in error messages.
    const POINT: &'static str;
    /// Hex coordinates in one encoded point (`x` and `y` together).
    const COORDINATES: usize;

    /// Limbs of one coordinate, lowest first.
    fn to_limbs(&self) -> Vec<Fq>;

    /// Rebuilds a coordinate from `COORDINATES / 2` limbs.
    fn from_limbs(limbs: &[Fq]) -> Self;
}

impl CoordinateField for Fq {
    const POINT: &'static str = "BN254 G1 point";
    const COORDINATES: usize = AFFINE_COORDINATE_COUNT;

    fn to_limbs(&self) -> Vec<Fq> {
        vec![*self]
    }

    fn from_limbs(limbs: &[Fq]) -> Self {
        limbs[0]
    }
}

impl CoordinateField for Fq2 {
    const POINT: &'static str = "BN254 G2 point";
    const COORDINATES: usize = G2_COORDINATE_COUNT;

    fn to_limbs(&self) -> Vec<Fq> {
        vec![self.c0, self.c1]
    }

    fn from_limbs(limbs: &[Fq]) -> Self {
        Fq2::new(limbs[0], limbs[1])
    }
}

impl<P> WireFormat for Affine<P>
where
    P: SWCurveConfig,
    P::BaseField: CoordinateField,
{
    const WHAT: &'static str = <P::BaseField as CoordinateField>::POINT;

    fn to_wire(&self) -> String {
        let separator = COORDINATE_SEPARATOR.to_string();
        let mut limbs = self.x.to_limbs();
        limbs.extend(self.y.to_limbs());
        limbs
            .iter()
            .map(|c| hex::encode(fq_to_be(c)))
            .collect::<Vec<_>>()
            .join(separator.as_str())
    }

    fn from_wire(s: &str) -> Result<Self> {
        let count = <P::BaseField as CoordinateField>::COORDINATES;
        let parts = split_coordinates(Self::WHAT, s, count)?;
        let limbs = parts
            .into_iter()
            .map(|part| fq_from_wire(Self::WHAT, part))
            .collect::<Result<Vec<_>>>()?;

        let (x, y) = limbs.split_at(count / 2);
        let point = Affine::<P>::new_unchecked(
            P::BaseField::from_limbs(x),
            P::BaseField::from_limbs(y),
        );
        if point.infinity
            || !point.is_on_curve()
            || !point.is_in_correct_subgroup_assuming_on_curve()
        {
            return Err(EcpdksapError::PointNotOnCurve(Self::WHAT));
        }
        Ok(point)
    }
}

impl WireFormat for AffinePoint {
    const WHAT: &'static str = "secp256k1 point";

    fn to_wire(&self) -> String {
        let encoded = self.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => format!("{}{COORDINATE_SEPARATOR}{}", hex::encode(x), hex::encode(y)),
            // identity has no affine coordinates
            _ => format!("{0}{COORDINATE_SEPARATOR}{0}", "00".repeat(SECP256K1_FIELD_SIZE)),
        }
    }

    fn from_wire(s: &str) -> Result<Self> {
        let parts = split_coordinates(Self::WHAT, s, AFFINE_COORDINATE_COUNT)?;
        let x = decode_be32(Self::WHAT, parts[0])?;
        let y = decode_be32(Self::WHAT, parts[1])?;
        if x >= SECP256K1_P || y >= SECP256K1_P {
            return Err(EcpdksapError::malformed(
                Self::WHAT,
                "coordinate is not a field element",
            ));
        }

        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&x),
            FieldBytes::from_slice(&y),
            false,
        );
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(EcpdksapError::PointNotOnCurve(Self::WHAT))
    }
}

impl WireFormat for EthAddress {
    const WHAT: &'static str = "address";

    fn to_wire(&self) -> String {
        self.to_hex_string()
    }

    fn from_wire(s: &str) -> Result<Self> {
        EthAddress::from_hex(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAIRING OUTPUTS
// ═══════════════════════════════════════════════════════════════════════════════

impl WireFormat for Gt {
    const WHAT: &'static str = "pairing output";

    fn to_wire(&self) -> String {
        let mut bytes = Vec::with_capacity(GT_SERIALIZED_SIZE);
        self.serialize_uncompressed(&mut bytes)
            .expect("Vec writer is infallible");
        hex::encode(bytes)
    }

    fn from_wire(s: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(s))
            .map_err(|e| EcpdksapError::malformed(Self::WHAT, e.to_string()))?;
        if bytes.len() != GT_SERIALIZED_SIZE {
            return Err(EcpdksapError::malformed(
                Self::WHAT,
                format!("{} bytes, expected {GT_SERIALIZED_SIZE}", bytes.len()),
            ));
        }
        Gt::deserialize_uncompressed(bytes.as_slice())
            .map_err(|e| EcpdksapError::malformed(Self::WHAT, e.to_string()))
    }
}
