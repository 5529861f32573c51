//! # ECPDKSAP Stealth Address Protocol
//!
//! Sender and recipient operations for the three protocol variants.
//!
//! This crate provides:
//!
//! - **Variants**: [`V0`] (pairing-symmetric), [`V1`] (hash-to-scalar) and
//!   [`V2`] (cross-curve Ethereum destination) behind [`ProtocolVariant`]
//! - **Key Generation**: [`RecipientKeys`] with spend and view key pairs
//! - **Sending**: [`send`] derives the published point, identifier and view tag
//! - **Discovery**: [`scan_candidate`] filters one candidate and recovers it
//!
//! ## Quick Start
//!
//! ```rust
//! use ecpdksap_core::ViewTagConfig;
//! use ecpdksap_crypto::CurveContext;
//! use ecpdksap_stealth::{scan_candidate, send, RecipientKeys, V2};
//!
//! let ctx = CurveContext::new();
//! let mut rng = rand::thread_rng();
//! let tag = ViewTagConfig::hash(1).unwrap();
//!
//! // Recipient: generate keys, hand out the public half
//! let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);
//!
//! // Sender: derive the destination address and publish (R, tag)
//! let payment = send(&ctx, keys.public_keys(), Some(&tag), &mut rng).unwrap();
//! let candidate = payment.to_record().to_candidate();
//!
//! // Recipient: find it again together with its private key
//! let found = scan_candidate(&ctx, &keys, Some(&tag), &candidate)
//!     .unwrap()
//!     .into_recovered()
//!     .unwrap();
//! assert_eq!(found.identifier, payment.identifier);
//! assert!(found.private_key.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod discovery;
pub mod keys;
pub mod send;
pub mod v0;
pub mod v1;
pub mod v2;
pub mod variant;

pub use discovery::{decode_candidate, filter_point, scan_candidate, scan_point, FilterDecision, ScanOutcome};
pub use keys::{KeyExport, RecipientKeys, RecipientPublicKeys};
pub use send::{send, send_request, send_with_ephemeral, SendOutput};
pub use v0::V0;
pub use v1::V1;
pub use v2::V2;
pub use variant::{NoOneTimeKey, ProtocolVariant, Recovered};
