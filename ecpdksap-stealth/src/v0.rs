//! Variant V0: pairing-symmetric identifier.
//!
//! ```text
//! keys:      K = k·G2,  V = v·G1
//! sender:    R = r·G1,  P = e(V, K)^r
//! recipient: P = e(R, K)^v
//! ```
//!
//! Both sides equal `e(G1, G2)^(r·v·k)`. The identifier is the pairing
//! output itself; V0 defines no one-time key pair.

use ark_bn254::{Fr, G1Affine, G2Affine};
use rand::{CryptoRng, RngCore};

use ecpdksap_core::error::Result;
use ecpdksap_core::types::VariantId;
use ecpdksap_crypto::{CurveContext, G2KeyPair, Gt};

use crate::keys::{RecipientKeys, RecipientPublicKeys};
use crate::variant::{NoOneTimeKey, ProtocolVariant, Recovered};

/// Pairing-symmetric variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct V0;

impl ProtocolVariant for V0 {
    const ID: VariantId = VariantId::V0;

    type SpendSecretKey = Fr;
    type SpendPublicKey = G2Affine;
    type Identifier = Gt;
    type OneTimePublicKey = NoOneTimeKey;
    type OneTimeKey = NoOneTimeKey;

    fn generate_spend_key<R: RngCore + CryptoRng>(ctx: &CurveContext, rng: &mut R) -> (Fr, G2Affine) {
        let pair = G2KeyPair::generate(ctx, rng);
        (*pair.secret(), *pair.public())
    }

    fn spend_public_key(ctx: &CurveContext, secret: &Fr) -> Result<G2Affine> {
        Ok(*G2KeyPair::from_secret(ctx, *secret)?.public())
    }

    fn publish(
        ctx: &CurveContext,
        recipient: &RecipientPublicKeys<Self>,
        r: &Fr,
        _shared: Option<&G1Affine>,
    ) -> Gt {
        // e(V, K)^r
        ctx.pairing(&recipient.view, &recipient.spend) * r
    }

    fn recover(
        ctx: &CurveContext,
        keys: &RecipientKeys<Self>,
        ephemeral: &G1Affine,
        _shared: Option<&G1Affine>,
    ) -> Recovered<Self> {
        // e(R, K)^v
        let identifier = ctx.pairing(ephemeral, &keys.public_keys().spend) * keys.view_secret();
        Recovered {
            identifier,
            public_key: None,
            private_key: None,
        }
    }
}
