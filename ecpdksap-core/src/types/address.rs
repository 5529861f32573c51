//! Destination address type.
//!
//! Variant V2 derives a one-time secp256k1 public key and publishes it as a
//! standard 20-byte Ethereum address.

use serde::{Deserialize, Serialize};

use crate::constants::ETH_ADDRESS_SIZE;
use crate::error::{EcpdksapError, Result};

/// An Ethereum address derived for a specific stealth payment.
///
/// The recipient recovers the matching one-time private key while scanning.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthAddress {
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(EcpdksapError::malformed(
                "address",
                format!("expected {} bytes, got {}", ETH_ADDRESS_SIZE, bytes.len()),
            ));
        }

        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the lowercase `0x`-prefixed hex string.
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Parses from hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| EcpdksapError::malformed("address", e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; ETH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({})", self.to_hex_string())
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eth_address_formatting() {
        let addr = EthAddress::from_array([0xAB; 20]);
        let s = addr.to_hex_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 42); // "0x" + 40 hex chars
    }

    #[test]
    fn test_eth_address_hex_roundtrip() {
        let addr = EthAddress::from_array([0x12; 20]);
        let addr2 = EthAddress::from_hex(&addr.to_hex_string()).unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_eth_address_wrong_length() {
        let err = EthAddress::from_hex("0x1234").unwrap_err();
        assert!(matches!(err, EcpdksapError::MalformedEncoding { what: "address", .. }));
    }

    #[test]
    fn test_eth_address_zero() {
        assert!(EthAddress::zero().is_zero());
        assert!(!EthAddress::from_array([1; 20]).is_zero());
    }

    #[test]
    fn test_eth_address_serde() {
        let addr = EthAddress::from_array([0x42; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "42".repeat(20)));
        let back: EthAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
