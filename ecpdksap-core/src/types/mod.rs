//! Domain types for ECPDKSAP.
//!
//! This module provides the curve-independent data structures of the protocol:
//!
//! - [`VariantId`], [`ViewTagScheme`], [`ViewTagConfig`]: protocol and filter selectors
//! - [`ViewTag`]: the 1 or 2 byte filtering hint
//! - [`EthAddress`]: destination address produced by variant V2
//! - [`ScanCandidate`], [`PublicationRecord`], [`RecoveredRecord`]: wire records
//! - [`SendRequest`], [`ScanRequest`]: JSON requests accepted by the CLI

mod address;
mod candidate;
mod request;
mod selector;
mod view_tag;

pub use address::*;
pub use candidate::*;
pub use request::*;
pub use selector::*;
pub use view_tag::*;
