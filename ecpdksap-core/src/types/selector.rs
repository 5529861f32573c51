//! Protocol variant and view tag selectors.
//!
//! Selectors arrive as strings from requests and flags. Parsing them is the
//! only place where [`EcpdksapError::UnsupportedVariant`] and
//! [`EcpdksapError::InvalidTagLength`] are raised.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{VIEW_TAG_MAX_LEN, VIEW_TAG_MIN_LEN};
use crate::error::{EcpdksapError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PROTOCOL VARIANT
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifies one of the three key-derivation schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantId {
    /// Pairing-symmetric: identifier is `e(R, K)^v`.
    V0,
    /// Hash-to-scalar: identifier is `H(v·R)·G1 + K`.
    V1,
    /// Cross-curve: identifier is an Ethereum address on secp256k1.
    V2,
}

impl VariantId {
    /// All variants, in protocol order.
    pub const ALL: [VariantId; 3] = [VariantId::V0, VariantId::V1, VariantId::V2];

    /// Returns the lowercase selector string.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantId::V0 => "v0",
            VariantId::V1 => "v1",
            VariantId::V2 => "v2",
        }
    }
}

impl FromStr for VariantId {
    type Err = EcpdksapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v0" => Ok(VariantId::V0),
            "v1" => Ok(VariantId::V1),
            "v2" => Ok(VariantId::V2),
            _ => Err(EcpdksapError::UnsupportedVariant(s.to_string())),
        }
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAG SCHEME
// ═══════════════════════════════════════════════════════════════════════════════

/// The two view tag constructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewTagScheme {
    /// Leading bytes of SHA-256(x || y).
    Hash,
    /// Leading bytes of the big-endian x coordinate.
    Coordinate,
}

/// A view tag construction together with its length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewTagConfig {
    scheme: ViewTagScheme,
    num_bytes: u8,
}

impl ViewTagConfig {
    /// Creates a config, rejecting lengths outside `1..=2`.
    pub fn new(scheme: ViewTagScheme, num_bytes: usize) -> Result<Self> {
        if !(VIEW_TAG_MIN_LEN..=VIEW_TAG_MAX_LEN).contains(&num_bytes) {
            return Err(EcpdksapError::InvalidTagLength(num_bytes));
        }
        Ok(Self {
            scheme,
            num_bytes: num_bytes as u8,
        })
    }

    /// Hash-based tag of `num_bytes` bytes.
    pub fn hash(num_bytes: usize) -> Result<Self> {
        Self::new(ViewTagScheme::Hash, num_bytes)
    }

    /// Coordinate-based tag of `num_bytes` bytes.
    pub fn coordinate(num_bytes: usize) -> Result<Self> {
        Self::new(ViewTagScheme::Coordinate, num_bytes)
    }

    /// Parses a selector string; `none` (or empty) disables tagging.
    ///
    /// Accepted: `none`, `v0-1byte`, `v0-2bytes` (hash-based) and
    /// `v1-1byte`, `v1-2bytes` (coordinate-based).
    pub fn from_selector(selector: &str) -> Result<Option<Self>> {
        let normalized = selector.trim().to_ascii_lowercase();
        let config = match normalized.as_str() {
            "" | "none" => return Ok(None),
            "v0-1byte" => Self::hash(1)?,
            "v0-2bytes" => Self::hash(2)?,
            "v1-1byte" => Self::coordinate(1)?,
            "v1-2bytes" => Self::coordinate(2)?,
            _ => return Err(EcpdksapError::UnsupportedVariant(selector.to_string())),
        };
        Ok(Some(config))
    }

    /// Returns the selector string that parses back to this config.
    pub fn selector(&self) -> &'static str {
        match (self.scheme, self.num_bytes) {
            (ViewTagScheme::Hash, 1) => "v0-1byte",
            (ViewTagScheme::Hash, _) => "v0-2bytes",
            (ViewTagScheme::Coordinate, 1) => "v1-1byte",
            (ViewTagScheme::Coordinate, _) => "v1-2bytes",
        }
    }

    /// Returns the construction.
    pub fn scheme(&self) -> ViewTagScheme {
        self.scheme
    }

    /// Returns the tag length in bytes.
    pub fn num_bytes(&self) -> usize {
        self.num_bytes as usize
    }
}

impl fmt::Display for ViewTagConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("v0", VariantId::V0)]
    #[test_case("V1", VariantId::V1)]
    #[test_case(" v2 ", VariantId::V2)]
    fn test_variant_parse(input: &str, expected: VariantId) {
        assert_eq!(input.parse::<VariantId>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_variant() {
        let err = "v3".parse::<VariantId>().unwrap_err();
        assert!(matches!(err, EcpdksapError::UnsupportedVariant(s) if s == "v3"));
    }

    #[test]
    fn test_variant_serde() {
        let json = serde_json::to_string(&VariantId::V1).unwrap();
        assert_eq!(json, "\"v1\"");
        let back: VariantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VariantId::V1);
    }

    #[test_case("v0-1byte", ViewTagScheme::Hash, 1)]
    #[test_case("v0-2bytes", ViewTagScheme::Hash, 2)]
    #[test_case("v1-1byte", ViewTagScheme::Coordinate, 1)]
    #[test_case("v1-2bytes", ViewTagScheme::Coordinate, 2)]
    fn test_selector_roundtrip(selector: &str, scheme: ViewTagScheme, len: usize) {
        let config = ViewTagConfig::from_selector(selector).unwrap().unwrap();
        assert_eq!(config.scheme(), scheme);
        assert_eq!(config.num_bytes(), len);
        assert_eq!(config.selector(), selector);
    }

    #[test]
    fn test_selector_none() {
        assert_eq!(ViewTagConfig::from_selector("none").unwrap(), None);
        assert_eq!(ViewTagConfig::from_selector("").unwrap(), None);
    }

    #[test]
    fn test_selector_unknown() {
        let err = ViewTagConfig::from_selector("v2-1byte").unwrap_err();
        assert!(matches!(err, EcpdksapError::UnsupportedVariant(_)));
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(32)]
    fn test_invalid_tag_length(len: usize) {
        let err = ViewTagConfig::hash(len).unwrap_err();
        assert!(matches!(err, EcpdksapError::InvalidTagLength(l) if l == len));
    }
}
