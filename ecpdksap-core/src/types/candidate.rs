//! Wire records exchanged between sender, transport and scanner.
//!
//! Points and scalars inside these records stay in their hex wire form.
//! Decoding happens per candidate inside the scanner so that one malformed
//! entry can be reported without discarding the rest of a batch.

use serde::{Deserialize, Serialize};

use super::{EthAddress, VariantId, ViewTag};
use crate::error::Result;

/// One published ephemeral point the recipient must evaluate.
///
/// Candidates are independent of each other; list order carries no meaning
/// beyond the order of the scan output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCandidate {
    /// Encoded ephemeral point `R` (`x.y` hex)
    pub ephemeral_key: String,
    /// Hex view tag published by the sender, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_tag: Option<String>,
}

impl ScanCandidate {
    /// Creates a candidate without a view tag.
    pub fn new(ephemeral_key: impl Into<String>) -> Self {
        Self {
            ephemeral_key: ephemeral_key.into(),
            view_tag: None,
        }
    }

    /// Creates a candidate carrying a view tag.
    pub fn with_tag(ephemeral_key: impl Into<String>, view_tag: ViewTag) -> Self {
        Self {
            ephemeral_key: ephemeral_key.into(),
            view_tag: Some(view_tag.to_hex()),
        }
    }

    /// Decodes the published view tag. An empty string counts as absent.
    pub fn decode_view_tag(&self) -> Result<Option<ViewTag>> {
        match self.view_tag.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(hex) => ViewTag::from_hex(hex).map(Some),
        }
    }
}

/// What a sender publishes (or keeps) after one send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Protocol variant used for the send
    pub variant: VariantId,
    /// Encoded ephemeral point `R`
    pub ephemeral_key: String,
    /// Encoded stealth identifier (pairing output, G1 point or address)
    pub identifier: String,
    /// View tag to publish next to `R`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_tag: Option<ViewTag>,
}

impl PublicationRecord {
    /// Returns the candidate a recipient would receive from transport.
    pub fn to_candidate(&self) -> ScanCandidate {
        ScanCandidate {
            ephemeral_key: self.ephemeral_key.clone(),
            view_tag: self.view_tag.map(|t| t.to_hex()),
        }
    }
}

/// One recovered identifier in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveredRecord {
    /// Index of the matching candidate in the scanned batch
    pub index: usize,
    /// Encoded stealth identifier, comparable to [`PublicationRecord::identifier`]
    pub identifier: String,
    /// Destination address (variant V2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<EthAddress>,
    /// Encoded one-time public key behind the identifier, when it differs from it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// `0x`-prefixed big-endian one-time private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_tag_decoding() {
        let tag = ViewTag::from_bytes(&[0xAA]).unwrap();
        let candidate = ScanCandidate::with_tag("01.02", tag);
        assert_eq!(candidate.decode_view_tag().unwrap(), Some(tag));

        assert_eq!(ScanCandidate::new("01.02").decode_view_tag().unwrap(), None);

        let empty = ScanCandidate {
            ephemeral_key: "01.02".into(),
            view_tag: Some(String::new()),
        };
        assert_eq!(empty.decode_view_tag().unwrap(), None);

        let bad = ScanCandidate {
            ephemeral_key: "01.02".into(),
            view_tag: Some("zz".into()),
        };
        assert!(bad.decode_view_tag().unwrap_err().is_encoding_error());
    }

    #[test]
    fn test_publication_to_candidate() {
        let record = PublicationRecord {
            variant: VariantId::V1,
            ephemeral_key: "0a.0b".into(),
            identifier: "0c.0d".into(),
            view_tag: Some(ViewTag::from_bytes(&[0x01, 0x02]).unwrap()),
        };
        let candidate = record.to_candidate();
        assert_eq!(candidate.ephemeral_key, "0a.0b");
        assert_eq!(candidate.view_tag.as_deref(), Some("0102"));
    }

    #[test]
    fn test_candidate_json_omits_missing_tag() {
        let json = serde_json::to_string(&ScanCandidate::new("0a.0b")).unwrap();
        assert_eq!(json, r#"{"ephemeral_key":"0a.0b"}"#);
    }
}
