//! Recipient key material.
//!
//! A recipient holds two independent key pairs:
//! - Spend key `(k, K)`: controls recovered outputs. Its group depends on the variant.
//! - View key `(v, V)`: a BN254 G1 key pair used to detect payments.

use ark_bn254::{Fr, G1Affine};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use ecpdksap_core::error::Result;
use ecpdksap_core::types::VariantId;
use ecpdksap_crypto::{CurveContext, G1KeyPair, WireFormat};

use crate::variant::ProtocolVariant;

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// What a sender needs to pay a recipient: `(K, V)`.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipientPublicKeys<V: ProtocolVariant> {
    /// Spend public key `K`
    pub spend: V::SpendPublicKey,
    /// View public key `V = v·G1`
    pub view: G1Affine,
}

impl<V: ProtocolVariant> RecipientPublicKeys<V> {
    /// Creates a public key set.
    pub fn new(spend: V::SpendPublicKey, view: G1Affine) -> Self {
        Self { spend, view }
    }

    /// Decodes `K` and `V` from their wire forms.
    pub fn from_wire(spend: &str, view: &str) -> Result<Self> {
        Ok(Self {
            spend: V::SpendPublicKey::from_wire(spend)?,
            view: G1Affine::from_wire(view)?,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Full recipient key set for one variant.
pub struct RecipientKeys<V: ProtocolVariant> {
    spend_secret: V::SpendSecretKey,
    view: G1KeyPair,
    public: RecipientPublicKeys<V>,
}

impl<V: ProtocolVariant> RecipientKeys<V> {
    /// Generates a fresh spend and view key pair.
    pub fn generate<R: RngCore + CryptoRng>(ctx: &CurveContext, rng: &mut R) -> Self {
        let (spend_secret, spend_public) = V::generate_spend_key(ctx, rng);
        let view = G1KeyPair::generate(ctx, rng);
        let public = RecipientPublicKeys::new(spend_public, *view.public());
        Self {
            spend_secret,
            view,
            public,
        }
    }

    /// Rebuilds the key set from both private scalars.
    pub fn from_secrets(ctx: &CurveContext, spend_secret: V::SpendSecretKey, view_secret: Fr) -> Result<Self> {
        let spend_public = V::spend_public_key(ctx, &spend_secret)?;
        let view = G1KeyPair::from_secret(ctx, view_secret)?;
        let public = RecipientPublicKeys::new(spend_public, *view.public());
        Ok(Self {
            spend_secret,
            view,
            public,
        })
    }

    /// Decodes `k` and `v` from hex and rebuilds the key set.
    pub fn from_wire(ctx: &CurveContext, spend_secret: &str, view_secret: &str) -> Result<Self> {
        let k = V::SpendSecretKey::from_wire(spend_secret)?;
        let v = Fr::from_wire(view_secret)?;
        Self::from_secrets(ctx, k, v)
    }

    /// Private spend key `k`.
    pub fn spend_secret(&self) -> &V::SpendSecretKey {
        &self.spend_secret
    }

    /// Private view key `v`.
    pub fn view_secret(&self) -> &Fr {
        self.view.secret()
    }

    /// The public half, to hand to senders.
    pub fn public_keys(&self) -> &RecipientPublicKeys<V> {
        &self.public
    }

    /// Hex export of both key pairs.
    pub fn export(&self) -> KeyExport {
        KeyExport {
            version: V::ID,
            spend_secret: self.spend_secret.to_wire(),
            view_secret: self.view.secret().to_wire(),
            spend_public: self.public.spend.to_wire(),
            view_public: self.public.view.to_wire(),
        }
    }
}

impl<V: ProtocolVariant> Drop for RecipientKeys<V> {
    fn drop(&mut self) {
        self.spend_secret.zeroize();
    }
}

impl<V: ProtocolVariant> std::fmt::Debug for RecipientKeys<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientKeys")
            .field("variant", &V::ID)
            .field("secrets", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}

/// Serialized key set, field names compatible with scan and send requests.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyExport {
    /// Variant the keys belong to
    #[serde(rename = "Version")]
    pub version: VariantId,
    /// Hex private spend key
    #[serde(rename = "k")]
    pub spend_secret: String,
    /// Hex private view key
    #[serde(rename = "v")]
    pub view_secret: String,
    /// Encoded public spend key
    #[serde(rename = "K")]
    pub spend_public: String,
    /// Encoded public view key
    #[serde(rename = "V")]
    pub view_public: String,
}

impl Drop for KeyExport {
    fn drop(&mut self) {
        self.spend_secret.zeroize();
        self.view_secret.zeroize();
    }
}

impl std::fmt::Debug for KeyExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyExport")
            .field("version", &self.version)
            .field("spend_public", &self.spend_public)
            .field("view_public", &self.view_public)
            .finish_non_exhaustive()
    }
}
