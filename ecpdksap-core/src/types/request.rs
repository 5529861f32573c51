//! JSON requests accepted by the `send` and `scan` commands.
//!
//! Field names follow the established front-end format (`k`, `v`, `Rs`,
//! `Version`, `ViewTags`, `ViewTagVersion`) so existing request files keep
//! working. Selectors stay as strings until use so that a bad selector is
//! reported as [`EcpdksapError::UnsupportedVariant`] rather than a JSON error.

use serde::{Deserialize, Serialize};

use super::{ScanCandidate, VariantId, ViewTagConfig};
use crate::error::{EcpdksapError, Result};

fn default_tag_selector() -> String {
    "none".to_string()
}

/// Recipient-side scan request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Hex spend private key `k` (BN254 scalar for V0/V1, secp256k1 for V2)
    pub k: String,
    /// Hex view private key `v` (BN254 scalar)
    pub v: String,
    /// Encoded ephemeral points to scan
    #[serde(rename = "Rs")]
    pub ephemeral_keys: Vec<String>,
    /// Variant selector: `v0`, `v1` or `v2`
    #[serde(rename = "Version")]
    pub version: String,
    /// Published view tags, aligned with `Rs`. Missing or empty entries mean no tag.
    #[serde(rename = "ViewTags", default)]
    pub view_tags: Vec<String>,
    /// View tag selector, see [`ViewTagConfig::from_selector`]
    #[serde(rename = "ViewTagVersion", default = "default_tag_selector")]
    pub view_tag_version: String,
}

impl ScanRequest {
    /// Parses a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolved protocol variant.
    pub fn variant(&self) -> Result<VariantId> {
        self.version.parse()
    }

    /// Resolved view tag configuration (`None` disables filtering).
    pub fn view_tag_config(&self) -> Result<Option<ViewTagConfig>> {
        ViewTagConfig::from_selector(&self.view_tag_version)
    }

    /// Pairs every ephemeral point with its published tag, in input order.
    pub fn candidates(&self) -> Vec<ScanCandidate> {
        self.ephemeral_keys
            .iter()
            .enumerate()
            .map(|(i, r)| ScanCandidate {
                ephemeral_key: r.clone(),
                view_tag: self
                    .view_tags
                    .get(i)
                    .filter(|t| !t.trim().is_empty())
                    .cloned(),
            })
            .collect()
    }
}

/// Sender-side request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Encoded recipient spend public key `K`
    #[serde(rename = "K")]
    pub spend_public_key: String,
    /// Encoded recipient view public key `V`
    #[serde(rename = "V")]
    pub view_public_key: String,
    /// Variant selector: `v0`, `v1` or `v2`
    #[serde(rename = "Version")]
    pub version: String,
    /// View tag selector, see [`ViewTagConfig::from_selector`]
    #[serde(rename = "ViewTagVersion", default = "default_tag_selector")]
    pub view_tag_version: String,
}

impl SendRequest {
    /// Parses a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolved protocol variant.
    pub fn variant(&self) -> Result<VariantId> {
        self.version.parse()
    }

    /// Resolved view tag configuration (`None` means no tag is published).
    pub fn view_tag_config(&self) -> Result<Option<ViewTagConfig>> {
        ViewTagConfig::from_selector(&self.view_tag_version)
    }

    /// Rejects requests with an empty key field.
    pub fn validate(&self) -> Result<()> {
        if self.spend_public_key.trim().is_empty() || self.view_public_key.trim().is_empty() {
            return Err(EcpdksapError::malformed(
                "send request",
                "recipient public keys must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_front_end_format() {
        let json = r#"{
            "k": "0x01",
            "v": "02",
            "Rs": ["0a.0b", "0c.0d", "0e.0f"],
            "Version": "v2",
            "ViewTags": ["aa", ""],
            "ViewTagVersion": "v0-1byte"
        }"#;
        let req = ScanRequest::from_json(json).unwrap();
        assert_eq!(req.variant().unwrap(), VariantId::V2);
        assert_eq!(
            req.view_tag_config().unwrap(),
            Some(ViewTagConfig::hash(1).unwrap())
        );

        let candidates = req.candidates();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].view_tag.as_deref(), Some("aa"));
        assert_eq!(candidates[1].view_tag, None);
        assert_eq!(candidates[2].view_tag, None);
    }

    #[test]
    fn test_scan_request_defaults() {
        let req = ScanRequest::from_json(r#"{"k":"01","v":"02","Rs":[],"Version":"v0"}"#).unwrap();
        assert!(req.view_tags.is_empty());
        assert_eq!(req.view_tag_config().unwrap(), None);
        assert!(req.candidates().is_empty());
    }

    #[test]
    fn test_unknown_selectors_are_unsupported() {
        let req = ScanRequest::from_json(
            r#"{"k":"01","v":"02","Rs":[],"Version":"v9","ViewTagVersion":"v7-3bytes"}"#,
        )
        .unwrap();
        assert!(matches!(req.variant(), Err(EcpdksapError::UnsupportedVariant(_))));
        assert!(matches!(
            req.view_tag_config(),
            Err(EcpdksapError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn test_send_request() {
        let req = SendRequest::from_json(r#"{"K":"01.02","V":"03.04","Version":"v1"}"#).unwrap();
        assert_eq!(req.variant().unwrap(), VariantId::V1);
        assert!(req.validate().is_ok());

        let empty = SendRequest {
            view_public_key: " ".into(),
            ..req
        };
        assert!(empty.validate().unwrap_err().is_encoding_error());
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        assert!(matches!(
            SendRequest::from_json("{"),
            Err(EcpdksapError::Json(_))
        ));
    }
}
