//! # ECPDKSAP Cryptography
//!
//! Curve-level building blocks for the ECPDKSAP protocol.
//!
//! This crate provides:
//!
//! - **Context**: [`CurveContext`] carrying the BN254 and secp256k1 generators
//! - **Codec**: hex wire formats for scalars, points and pairing outputs
//! - **Hash**: SHA-256, Keccak-256 and hash-to-scalar
//! - **View Tags**: hash-based and coordinate-based filtering tags
//! - **Derivation**: Diffie–Hellman points, pairing-to-secp256k1 scalars, Ethereum addresses
//! - **Keys**: key pairs over G1, G2 and secp256k1
//!
//! ## Security Properties
//!
//! - Private scalars held in key pairs are zeroized on drop
//! - Tag comparison uses constant-time equality
//! - No operation is constant-time with respect to the curve arithmetic itself
//!
//! ## Example
//!
//! ```rust
//! use ecpdksap_crypto::{diffie_hellman, CurveContext, G1KeyPair};
//! use rand::thread_rng;
//!
//! let ctx = CurveContext::new();
//! let view = G1KeyPair::generate(&ctx, &mut thread_rng());
//! let ephemeral = G1KeyPair::generate(&ctx, &mut thread_rng());
//!
//! // r·V == v·R
//! let sender = diffie_hellman(ephemeral.secret(), view.public());
//! let recipient = diffie_hellman(view.secret(), ephemeral.public());
//! assert_eq!(sender, recipient);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod codec;
pub mod context;
pub mod derive;
pub mod hash;
pub mod keys;
pub mod view_tag;

// Re-export main items at crate root
pub use codec::{g1_to_xy_bytes, WireFormat};
pub use context::{CurveContext, Gt};
pub use derive::{
    diffie_hellman, eth_address, gt_to_secp256k1_scalar, secp256k1_mul, secp256k1_uncompressed_xy,
};
pub use hash::{hash_to_scalar, keccak256, sha256};
pub use keys::{random_fr, random_secp256k1_scalar, G1KeyPair, G2KeyPair, KeyPair, Secp256k1KeyPair};
pub use view_tag::{
    compute_view_tag, coordinate_view_tag, hash_view_tag, verify_view_tag, ViewTagStats,
};

pub use ark_bn254::{Fq, Fr, G1Affine, G2Affine};
pub use k256::{AffinePoint as Secp256k1Point, Scalar as Secp256k1Scalar};
