//! Key pairs over the three protocol groups.
//!
//! A [`KeyPair`] holds a private scalar and the matching public point
//! (`public = secret·generator`). Private scalars are zeroized on drop and
//! redacted from `Debug` output.

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::short_weierstrass::{Affine, SWCurveConfig};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_std::UniformRand;
use k256::elliptic_curve::Field;
use k256::{AffinePoint, Scalar};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use ecpdksap_core::error::{EcpdksapError, Result};

use crate::context::CurveContext;

/// A private scalar and its public point.
#[derive(Clone)]
pub struct KeyPair<S: Zeroize, P> {
    secret: S,
    public: P,
}

/// BN254 scalar with public point on G1.
pub type G1KeyPair = KeyPair<Fr, G1Affine>;

/// BN254 scalar with public point on G2.
pub type G2KeyPair = KeyPair<Fr, G2Affine>;

/// secp256k1 key pair.
pub type Secp256k1KeyPair = KeyPair<Scalar, AffinePoint>;

impl<S: Zeroize, P> KeyPair<S, P> {
    /// Returns the private scalar.
    pub fn secret(&self) -> &S {
        &self.secret
    }

    /// Returns the public point.
    pub fn public(&self) -> &P {
        &self.public
    }
}

impl<S: Zeroize, P> Drop for KeyPair<S, P> {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl<S: Zeroize, P: std::fmt::Debug> std::fmt::Debug for KeyPair<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RANDOM SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

/// Samples a uniformly random non-zero BN254 scalar.
pub fn random_fr<R: RngCore + CryptoRng>(rng: &mut R) -> Fr {
    loop {
        let s = Fr::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

/// Samples a uniformly random non-zero secp256k1 scalar.
pub fn random_secp256k1_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = Scalar::random(&mut *rng);
        if !bool::from(s.is_zero()) {
            return s;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════════════

/// BN254 pairs on G1 or G2. The public point is taken over the group's
/// standard generator, the same one [`CurveContext::new`] holds.
impl<C: SWCurveConfig<ScalarField = Fr>> KeyPair<Fr, Affine<C>> {
    /// Generates a fresh key pair.
    pub fn generate<R: RngCore + CryptoRng>(_ctx: &CurveContext, rng: &mut R) -> Self {
        let secret = random_fr(rng);
        let public = (Affine::<C>::generator() * secret).into_affine();
        Self { secret, public }
    }

    /// Rebuilds a key pair from its private scalar.
    pub fn from_secret(_ctx: &CurveContext, secret: Fr) -> Result<Self> {
        if secret.is_zero() {
            return Err(EcpdksapError::malformed("BN254 scalar", "private key is zero"));
        }
        let public = (Affine::<C>::generator() * secret).into_affine();
        Ok(Self { secret, public })
    }
}

impl Secp256k1KeyPair {
    /// Generates a fresh secp256k1 key pair.
    pub fn generate<R: RngCore + CryptoRng>(ctx: &CurveContext, rng: &mut R) -> Self {
        let secret = random_secp256k1_scalar(rng);
        let public = (*ctx.secp256k1_generator() * secret).to_affine();
        Self { secret, public }
    }

    /// Rebuilds a key pair from its private scalar.
    pub fn from_secret(ctx: &CurveContext, secret: Scalar) -> Result<Self> {
        if bool::from(secret.is_zero()) {
            return Err(EcpdksapError::malformed("secp256k1 scalar", "private key is zero"));
        }
        let public = (*ctx.secp256k1_generator() * secret).to_affine();
        Ok(Self { secret, public })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::eth_address;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_generated_pairs_consistent() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let g1 = G1KeyPair::generate(&ctx, &mut rng);
        assert_eq!(G1KeyPair::from_secret(&ctx, *g1.secret()).unwrap().public(), g1.public());

        let g2 = G2KeyPair::generate(&ctx, &mut rng);
        assert!(g2.public().is_in_correct_subgroup_assuming_on_curve());
        assert_eq!(G2KeyPair::from_secret(&ctx, *g2.secret()).unwrap().public(), g2.public());

        let secp = Secp256k1KeyPair::generate(&ctx, &mut rng);
        assert_eq!(
            Secp256k1KeyPair::from_secret(&ctx, *secp.secret()).unwrap().public(),
            secp.public()
        );
    }

    #[test]
    fn test_bn254_pairs_use_context_generators() {
        let ctx = CurveContext::new();
        let secret = Fr::from(31u64);
        let g1 = G1KeyPair::from_secret(&ctx, secret).unwrap();
        let g2 = G2KeyPair::from_secret(&ctx, secret).unwrap();
        assert_eq!(*g1.public(), (*ctx.g1() * secret).into_affine());
        assert_eq!(*g2.public(), (*ctx.g2() * secret).into_affine());
    }

    #[test]
    fn test_zero_secret_rejected() {
        let ctx = CurveContext::new();
        assert!(G1KeyPair::from_secret(&ctx, Fr::zero()).is_err());
        assert!(G2KeyPair::from_secret(&ctx, Fr::zero()).is_err());
        assert!(Secp256k1KeyPair::from_secret(&ctx, Scalar::ZERO).is_err());
    }

    #[test]
    fn test_secp256k1_known_key() {
        let ctx = CurveContext::new();
        let pair = Secp256k1KeyPair::from_secret(&ctx, Scalar::ONE).unwrap();
        assert_eq!(
            eth_address(pair.public()).to_hex_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_seeded_generation_reproducible() {
        let ctx = CurveContext::new();
        let a = G1KeyPair::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(9));
        let b = G1KeyPair::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(9));
        assert_eq!(a.public(), b.public());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let ctx = CurveContext::new();
        let pair = G1KeyPair::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(5));
        let debug = format!("{:?}", pair);
        assert!(debug.contains("REDACTED"));
    }
}
