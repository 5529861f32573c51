//! Variant V1: hash-to-scalar over a Diffie–Hellman point.
//!
//! ```text
//! keys:      K = k·G1,  V = v·G1
//! sender:    R = r·G1,  T = r·V
//! recipient: T = v·R                     (r·V == v·R)
//! both:      h = SHA-256(T.x‖T.y) mod r
//!            P = h·G1 + K
//! recipient: sk = h + k                  (sk·G1 == P)
//! ```

use ark_bn254::{Fr, G1Affine};
use ark_ec::CurveGroup;
use rand::{CryptoRng, RngCore};

use ecpdksap_core::error::Result;
use ecpdksap_core::types::VariantId;
use ecpdksap_crypto::{diffie_hellman, hash_to_scalar, CurveContext, G1KeyPair};

use crate::keys::{RecipientKeys, RecipientPublicKeys};
use crate::variant::{ProtocolVariant, Recovered};

/// Hash-to-scalar variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct V1;

impl V1 {
    /// Public reconstruction `P = h·G1 + K` from the shared point.
    ///
    /// Needs only `K`, so a watch-only holder of `v` can compute it.
    pub fn stealth_public_key(ctx: &CurveContext, spend: &G1Affine, shared: &G1Affine) -> G1Affine {
        let h = hash_to_scalar(shared);
        (*ctx.g1() * h + spend).into_affine()
    }
}

impl ProtocolVariant for V1 {
    const ID: VariantId = VariantId::V1;

    type SpendSecretKey = Fr;
    type SpendPublicKey = G1Affine;
    type Identifier = G1Affine;
    type OneTimePublicKey = G1Affine;
    type OneTimeKey = Fr;

    fn generate_spend_key<R: RngCore + CryptoRng>(ctx: &CurveContext, rng: &mut R) -> (Fr, G1Affine) {
        let pair = G1KeyPair::generate(ctx, rng);
        (*pair.secret(), *pair.public())
    }

    fn spend_public_key(ctx: &CurveContext, secret: &Fr) -> Result<G1Affine> {
        Ok(*G1KeyPair::from_secret(ctx, *secret)?.public())
    }

    fn publish(
        ctx: &CurveContext,
        recipient: &RecipientPublicKeys<Self>,
        r: &Fr,
        shared: Option<&G1Affine>,
    ) -> G1Affine {
        let shared = shared
            .copied()
            .unwrap_or_else(|| diffie_hellman(r, &recipient.view));
        Self::stealth_public_key(ctx, &recipient.spend, &shared)
    }

    fn recover(
        ctx: &CurveContext,
        keys: &RecipientKeys<Self>,
        ephemeral: &G1Affine,
        shared: Option<&G1Affine>,
    ) -> Recovered<Self> {
        let shared = shared
            .copied()
            .unwrap_or_else(|| diffie_hellman(keys.view_secret(), ephemeral));
        let h = hash_to_scalar(&shared);
        let identifier = (*ctx.g1() * h + keys.public_keys().spend).into_affine();
        Recovered {
            identifier,
            public_key: Some(identifier),
            private_key: Some(h + keys.spend_secret()),
        }
    }
}
