//! Variant V2: cross-curve destination address.
//!
//! ```text
//! keys:      k, K = k·G  (secp256k1),   V = v·G1  (BN254)
//! sender:    R = r·G1,  S = e(r·V, G2)
//! recipient:            S = e(v·R, G2)        (r·V == v·R)
//! both:      b = S.c0.c0.c0 mod n
//!            P = b·K,  address = keccak256(P.x‖P.y)[12..]
//! recipient: sk = k·b mod n                   (sk·G == P)
//! ```
//!
//! `G2` is the fixed BN254 generator on both sides. `b` depends on `r·v`,
//! never on `R` alone.

use ark_bn254::{Fr, G1Affine};
use k256::{AffinePoint, Scalar};
use rand::{CryptoRng, RngCore};

use ecpdksap_core::error::Result;
use ecpdksap_core::types::{EthAddress, VariantId};
use ecpdksap_crypto::{
    diffie_hellman, eth_address, gt_to_secp256k1_scalar, secp256k1_mul, CurveContext,
    Secp256k1KeyPair,
};

use crate::keys::{RecipientKeys, RecipientPublicKeys};
use crate::variant::{ProtocolVariant, Recovered};

/// Cross-curve destination variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct V2;

impl V2 {
    /// Computes `b` from the shared point.
    pub fn destination_scalar(ctx: &CurveContext, shared: &G1Affine) -> Scalar {
        gt_to_secp256k1_scalar(&ctx.pair_with_g2(shared))
    }
}

impl ProtocolVariant for V2 {
    const ID: VariantId = VariantId::V2;

    type SpendSecretKey = Scalar;
    type SpendPublicKey = AffinePoint;
    type Identifier = EthAddress;
    type OneTimePublicKey = AffinePoint;
    type OneTimeKey = Scalar;

    fn generate_spend_key<R: RngCore + CryptoRng>(ctx: &CurveContext, rng: &mut R) -> (Scalar, AffinePoint) {
        let pair = Secp256k1KeyPair::generate(ctx, rng);
        (*pair.secret(), *pair.public())
    }

    fn spend_public_key(ctx: &CurveContext, secret: &Scalar) -> Result<AffinePoint> {
        Ok(*Secp256k1KeyPair::from_secret(ctx, *secret)?.public())
    }

    fn publish(
        ctx: &CurveContext,
        recipient: &RecipientPublicKeys<Self>,
        r: &Fr,
        shared: Option<&G1Affine>,
    ) -> EthAddress {
        let shared = shared
            .copied()
            .unwrap_or_else(|| diffie_hellman(r, &recipient.view));
        let b = Self::destination_scalar(ctx, &shared);
        eth_address(&secp256k1_mul(&recipient.spend, &b))
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
        let b = Self::destination_scalar(ctx, &shared);
        let destination = secp256k1_mul(&keys.public_keys().spend, &b);
        Recovered {
            identifier: eth_address(&destination),
            public_key: Some(destination),
            private_key: Some(*keys.spend_secret() * b),
        }
    }

    fn address(identifier: &EthAddress) -> Option<EthAddress> {
        Some(*identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecpdksap_crypto::random_fr;
    use k256::ProjectivePoint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_publish_recover_agree() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(300);
        let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);
        let r = random_fr(&mut rng);
        let big_r = diffie_hellman(&r, ctx.g1());

        let sent = V2::publish(&ctx, keys.public_keys(), &r, None);
        let recovered = V2::recover(&ctx, &keys, &big_r, None);
        assert_eq!(recovered.identifier, sent);
        assert_eq!(recovered.address(), Some(sent));
    }

    #[test]
    fn test_private_key_controls_destination() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(301);
        let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);
        let big_r = diffie_hellman(&random_fr(&mut rng), ctx.g1());

        let recovered = V2::recover(&ctx, &keys, &big_r, None);
        let sk = recovered.private_key.expect("V2 emits a one-time key");
        let public = (ProjectivePoint::GENERATOR * sk).to_affine();
        assert_eq!(Some(public), recovered.public_key);
        assert_eq!(eth_address(&public), recovered.identifier);
    }

    #[test]
    fn test_b_depends_on_view_key() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(302);
        let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);
        let r = random_fr(&mut rng);
        let big_r = diffie_hellman(&r, ctx.g1());

        // b must not be computable from R alone
        let from_r_only = V2::destination_scalar(&ctx, &big_r);
        let from_shared = V2::destination_scalar(&ctx, &diffie_hellman(keys.view_secret(), &big_r));
        assert_ne!(from_r_only, from_shared);
    }
}
