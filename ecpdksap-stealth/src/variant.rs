//! The `ProtocolVariant` capability shared by V0, V1 and V2.
//!
//! Every variant pairs a sender-side [`ProtocolVariant::publish`] with a
//! recipient-side [`ProtocolVariant::recover`]. The two must produce the
//! same identifier for the same payment:
//!
//! ```text
//! publish(r, K, V)  ==  recover(k, v, R)      where R = r·G1, V = v·G1
//! ```
//!
//! Both sides can be handed the Diffie–Hellman point (`r·V` for the sender,
//! `v·R` for the recipient) when it was already computed for a view tag;
//! otherwise a variant computes it only if its derivation needs it.

use std::fmt::Debug;

use ark_bn254::{Fr, G1Affine};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use ecpdksap_core::error::{EcpdksapError, Result};
use ecpdksap_core::types::{EthAddress, RecoveredRecord, VariantId};
use ecpdksap_crypto::{CurveContext, WireFormat};

use crate::keys::{RecipientKeys, RecipientPublicKeys};

/// A stealth address derivation scheme.
pub trait ProtocolVariant: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Selector for this variant.
    const ID: VariantId;

    /// Private spend key `k`.
    type SpendSecretKey: WireFormat + Copy + Zeroize + Send + Sync;
    /// Public spend key `K`.
    type SpendPublicKey: WireFormat + Clone + PartialEq + Debug + Send + Sync;
    /// What the sender derives and the recipient reconstructs.
    type Identifier: WireFormat + Clone + PartialEq + Debug + Send + Sync;
    /// Public key of the one-time output ([`NoOneTimeKey`] if there is none).
    type OneTimePublicKey: WireFormat + Clone + PartialEq + Debug + Send + Sync;
    /// Private key controlling the one-time output ([`NoOneTimeKey`] if there is none).
    type OneTimeKey: WireFormat + Copy + Zeroize + Send + Sync;

    /// Samples a spend key pair.
    fn generate_spend_key<R: RngCore + CryptoRng>(
        ctx: &CurveContext,
        rng: &mut R,
    ) -> (Self::SpendSecretKey, Self::SpendPublicKey);

    /// Computes `K` from `k`. Rejects the zero scalar.
    fn spend_public_key(ctx: &CurveContext, secret: &Self::SpendSecretKey) -> Result<Self::SpendPublicKey>;

    /// Sender side: derives the identifier for ephemeral scalar `r`.
    ///
    /// `shared` is `r·V` if the caller already has it.
    fn publish(
        ctx: &CurveContext,
        recipient: &RecipientPublicKeys<Self>,
        r: &Fr,
        shared: Option<&G1Affine>,
    ) -> Self::Identifier;

    /// Recipient side: reconstructs the identifier for ephemeral point `R`.
    ///
    /// `shared` is `v·R` if the caller already has it. Recovery never fails
    /// and never checks the result; a wrong candidate simply yields an
    /// identifier nobody published.
    fn recover(
        ctx: &CurveContext,
        keys: &RecipientKeys<Self>,
        ephemeral: &G1Affine,
        shared: Option<&G1Affine>,
    ) -> Recovered<Self>;

    /// Destination address behind an identifier, if the variant has one.
    fn address(_identifier: &Self::Identifier) -> Option<EthAddress> {
        None
    }
}

/// Output of a successful recovery.
#[derive(Clone)]
pub struct Recovered<V: ProtocolVariant> {
    /// Reconstructed identifier
    pub identifier: V::Identifier,
    /// One-time public key, when the variant defines one
    pub public_key: Option<V::OneTimePublicKey>,
    /// One-time private key, when the variant defines one
    pub private_key: Option<V::OneTimeKey>,
}

impl<V: ProtocolVariant> Recovered<V> {
    /// Destination address, for variants that derive one.
    pub fn address(&self) -> Option<EthAddress> {
        V::address(&self.identifier)
    }

    /// Wire form of this result for candidate `index`.
    pub fn to_record(&self, index: usize) -> RecoveredRecord {
        RecoveredRecord {
            index,
            identifier: self.identifier.to_wire(),
            address: self.address(),
            public_key: self.public_key.as_ref().map(WireFormat::to_wire),
            private_key: self.private_key.as_ref().map(|k| format!("0x{}", k.to_wire())),
        }
    }
}

impl<V: ProtocolVariant> Drop for Recovered<V> {
    fn drop(&mut self) {
        if let Some(key) = self.private_key.as_mut() {
            key.zeroize();
        }
    }
}

impl<V: ProtocolVariant> Debug for Recovered<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recovered")
            .field("variant", &V::ID)
            .field("identifier", &self.identifier)
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NO ONE-TIME KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// One-time key type of variants without a one-time output.
///
/// Uninhabited: `Recovered::public_key` and `Recovered::private_key` are
/// always `None` for such a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoOneTimeKey {}

impl WireFormat for NoOneTimeKey {
    const WHAT: &'static str = "one-time key";

    fn to_wire(&self) -> String {
        match *self {}
    }

    fn from_wire(_s: &str) -> Result<Self> {
        Err(EcpdksapError::malformed(Self::WHAT, "variant has no one-time key"))
    }
}

impl Zeroize for NoOneTimeKey {
    fn zeroize(&mut self) {
        match *self {}
    }
}
