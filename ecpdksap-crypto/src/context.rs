//! Explicit curve parameters.
//!
//! Every derivation takes a [`CurveContext`] holding the base points it
//! depends on. There are no process-wide generators.

use ark_bn254::{Bn254, G1Affine, G2Affine};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::AffineRepr;
use k256::ProjectivePoint;

/// Element of the BN254 pairing target group.
pub type Gt = PairingOutput<Bn254>;

/// Generators of the three groups used by the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveContext {
    g1: G1Affine,
    g2: G2Affine,
    secp256k1: ProjectivePoint,
}

impl CurveContext {
    /// Standard generators of BN254 G1, G2 and secp256k1.
    pub fn new() -> Self {
        Self {
            g1: G1Affine::generator(),
            g2: G2Affine::generator(),
            secp256k1: ProjectivePoint::GENERATOR,
        }
    }

    /// BN254 G1 generator.
    pub fn g1(&self) -> &G1Affine {
        &self.g1
    }

    /// BN254 G2 generator. Also the fixed second argument of the V2 pairing.
    pub fn g2(&self) -> &G2Affine {
        &self.g2
    }

    /// secp256k1 generator.
    pub fn secp256k1_generator(&self) -> &ProjectivePoint {
        &self.secp256k1
    }

    /// Evaluates `e(p, q)`.
    pub fn pairing(&self, p: &G1Affine, q: &G2Affine) -> Gt {
        Bn254::pairing(*p, *q)
    }

    /// Evaluates `e(p, G2)` against the context's G2 generator.
    pub fn pair_with_g2(&self, p: &G1Affine) -> Gt {
        Bn254::pairing(*p, self.g2)
    }
}

impl Default for CurveContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ec::CurveGroup;

    #[test]
    fn test_generators_on_curve() {
        let ctx = CurveContext::new();
        assert!(ctx.g1().is_on_curve());
        assert!(ctx.g2().is_on_curve());
        assert!(ctx.g2().is_in_correct_subgroup_assuming_on_curve());
    }

    #[test]
    fn test_pairing_bilinear() {
        let ctx = CurveContext::default();
        let a = Fr::from(7u64);
        let b = Fr::from(11u64);
        let ag1 = (*ctx.g1() * a).into_affine();
        let bg2 = (*ctx.g2() * b).into_affine();

        let lhs = ctx.pairing(&ag1, &bg2);
        let rhs = ctx.pairing(ctx.g1(), ctx.g2()) * (a * b);
        assert_eq!(lhs, rhs);
        assert_eq!(ctx.pair_with_g2(&ag1), ctx.pairing(&ag1, ctx.g2()));
    }
}
