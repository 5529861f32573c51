//! # ECPDKSAP Core
//!
//! Core types, errors, and wire formats for the elliptic-curve pairing-based
//! dual-key stealth address protocol.
//!
//! This crate provides the foundational building blocks used by all other
//! ECPDKSAP crates. It contains no curve arithmetic:
//!
//! - **Types**: Protocol selectors, view tags, addresses, scan candidates and requests
//! - **Errors**: One error enum shared by every crate
//! - **Constants**: Encoding sizes and scanner limits
//!
//! ## Example
//!
//! ```rust
//! use ecpdksap_core::{VariantId, ViewTagConfig};
//!
//! let variant: VariantId = "v2".parse().unwrap();
//! let tag = ViewTagConfig::from_selector("v0-1byte").unwrap();
//! assert_eq!(variant, VariantId::V2);
//! assert_eq!(tag.map(|t| t.num_bytes()), Some(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{EcpdksapError, Result};
pub use types::*;
