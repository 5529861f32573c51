//! The view tag value published next to an ephemeral point.
//!
//! A view tag is a non-secret filtering hint. It never feeds into the
//! derivation of identifiers or keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{VIEW_TAG_MAX_LEN, VIEW_TAG_MIN_LEN};
use crate::error::{EcpdksapError, Result};

/// A 1 or 2 byte view tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewTag {
    bytes: [u8; VIEW_TAG_MAX_LEN],
    len: u8,
}

impl ViewTag {
    /// Creates a tag from its bytes.
    ///
    /// # Errors
    /// Returns [`EcpdksapError::InvalidTagLength`] unless `bytes` has 1 or 2 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if !(VIEW_TAG_MIN_LEN..=VIEW_TAG_MAX_LEN).contains(&bytes.len()) {
            return Err(EcpdksapError::InvalidTagLength(bytes.len()));
        }

        let mut arr = [0u8; VIEW_TAG_MAX_LEN];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bytes: arr,
            len: bytes.len() as u8,
        })
    }

    /// Takes the leading `num_bytes` of a longer digest or encoding.
    pub fn truncate(source: &[u8], num_bytes: usize) -> Result<Self> {
        if num_bytes > source.len() {
            return Err(EcpdksapError::InvalidTagLength(num_bytes));
        }
        Self::from_bytes(&source[..num_bytes])
    }

    /// Returns the tag bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Returns the tag length in bytes.
    pub fn num_bytes(&self) -> usize {
        self.len as usize
    }

    /// Returns the hex-encoded tag.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parses a hex-encoded tag (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| EcpdksapError::malformed("view tag", e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewTag({})", self.to_hex())
    }
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serde implementation that uses hex encoding
impl Serialize for ViewTag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ViewTag {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
