//! Error types for ECPDKSAP.
//!
//! Every error is a caller input error detected eagerly while decoding or
//! validating. Nothing here is transient, so nothing is retried. A view tag
//! mismatch is a filtering outcome and has no error variant.

use thiserror::Error;

/// Result type alias using `EcpdksapError`.
pub type Result<T> = std::result::Result<T, EcpdksapError>;

/// Main error type for all ECPDKSAP operations.
#[derive(Debug, Error)]
pub enum EcpdksapError {
    // ═══════════════════════════════════════════════════════════════════════════
    // ENCODING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Hex or byte decoding of a point, scalar or tag failed.
    #[error("Malformed {what}: {reason}")]
    MalformedEncoding { what: &'static str, reason: String },

    /// Decoded coordinates do not describe a point of the expected group.
    #[error("Point not on curve: {0}")]
    PointNotOnCurve(&'static str),

    // ═══════════════════════════════════════════════════════════════════════════
    // SELECTOR ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Requested view tag length outside the supported range.
    #[error("Invalid view tag length: {0} (supported: 1 or 2 bytes)")]
    InvalidTagLength(usize),

    /// Unknown protocol variant or view tag scheme selector.
    #[error("Unsupported selector: '{0}'")]
    UnsupportedVariant(String),

    /// Scanner or request configuration is inconsistent.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SCAN ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A single scan candidate failed to decode.
    #[error("Candidate #{index}: {source}")]
    Candidate {
        index: usize,
        #[source]
        source: Box<EcpdksapError>,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION & I/O ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EcpdksapError {
    /// Shorthand for a [`EcpdksapError::MalformedEncoding`].
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        EcpdksapError::MalformedEncoding {
            what,
            reason: reason.into(),
        }
    }

    /// Wraps an error raised while processing candidate `index`.
    pub fn for_candidate(index: usize, source: EcpdksapError) -> Self {
        EcpdksapError::Candidate {
            index,
            source: Box::new(source),
        }
    }

    /// Returns true if this error is a decode failure of some wire value.
    pub fn is_encoding_error(&self) -> bool {
        match self {
            EcpdksapError::MalformedEncoding { .. } | EcpdksapError::PointNotOnCurve(_) => true,
            EcpdksapError::Candidate { source, .. } => source.is_encoding_error(),
            _ => false,
        }
    }

    /// Returns true if this error was caused by caller input.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, EcpdksapError::Io(_))
    }
}

impl From<hex::FromHexError> for EcpdksapError {
    fn from(err: hex::FromHexError) -> Self {
        EcpdksapError::malformed("hex", err.to_string())
    }
}
