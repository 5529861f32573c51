//! View tag computation for efficient scanning.
//!
//! View tags let recipients filter candidates cheaply:
//! - The sender publishes a 1 or 2 byte tag derived from `r·V`
//! - The recipient derives the same point as `v·R` and recomputes the tag
//! - Only candidates with matching tags need the full recovery
//!
//! ## Constructions
//!
//! ```text
//! hash:       tag = SHA-256(x‖y)[..n]
//! coordinate: tag = x[..n]            (big-endian X, no hashing)
//! ```
//!
//! ## Efficiency
//!
//! With `n` tag bytes roughly `1 / 256^n` of non-matching candidates survive
//! the filter. The coordinate construction is slightly biased at the top
//! byte because the BN254 base field is smaller than 2^256.

use ark_bn254::G1Affine;
use subtle::ConstantTimeEq;
use tracing::trace;

use ecpdksap_core::constants::VIEW_TAG_SPACE;
use ecpdksap_core::error::Result;
use ecpdksap_core::types::{ViewTag, ViewTagConfig, ViewTagScheme};

use crate::codec::g1_x_bytes;
use crate::hash::sha256_g1;

/// Hash-based tag: first `num_bytes` of SHA-256 over `x‖y`.
pub fn hash_view_tag(point: &G1Affine, num_bytes: usize) -> Result<ViewTag> {
    ViewTag::truncate(&sha256_g1(point), num_bytes)
}

/// Coordinate-based tag: first `num_bytes` of the big-endian X coordinate.
pub fn coordinate_view_tag(point: &G1Affine, num_bytes: usize) -> Result<ViewTag> {
    ViewTag::truncate(&g1_x_bytes(point), num_bytes)
}

/// Computes the tag `config` selects for the shared point.
///
/// The shared point is `r·V` on the sender side and `v·R` on the recipient side.
pub fn compute_view_tag(config: &ViewTagConfig, shared: &G1Affine) -> Result<ViewTag> {
    match config.scheme() {
        ViewTagScheme::Hash => hash_view_tag(shared, config.num_bytes()),
        ViewTagScheme::Coordinate => coordinate_view_tag(shared, config.num_bytes()),
    }
}

/// Checks a published tag against the one derived from `shared`.
///
/// Tags of a different length than `config` never match. The byte
/// comparison is constant-time.
pub fn verify_view_tag(config: &ViewTagConfig, shared: &G1Affine, published: &ViewTag) -> bool {
    if published.num_bytes() != config.num_bytes() {
        trace!(
            published = published.num_bytes(),
            expected = config.num_bytes(),
            "View tag length mismatch"
        );
        return false;
    }
    match compute_view_tag(config, shared) {
        Ok(tag) => tag.as_bytes().ct_eq(published.as_bytes()).into(),
        Err(_) => false,
    }
}

/// Computes view tag statistics.
///
/// Tracks the first tag byte, which is enough to spot a skewed construction.
#[derive(Debug, Clone)]
pub struct ViewTagStats {
    /// Count of each first-byte value
    pub distribution: Vec<u64>,
    /// Total number of tags analyzed
    pub total: u64,
}

impl Default for ViewTagStats {
    fn default() -> Self {
        Self {
            distribution: vec![0; VIEW_TAG_SPACE],
            total: 0,
        }
    }
}

impl ViewTagStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a view tag.
    pub fn add(&mut self, tag: &ViewTag) {
        if let Some(&first) = tag.as_bytes().first() {
            self.distribution[first as usize] += 1;
            self.total += 1;
        }
    }

    /// Returns the most common first byte.
    pub fn most_common(&self) -> Option<(u8, u64)> {
        self.distribution
            .iter()
            .enumerate()
            .max_by_key(|(_, &count)| count)
            .map(|(tag, &count)| (tag as u8, count))
    }

    /// Returns the expected count per byte value for a uniform distribution.
    pub fn expected_uniform_count(&self) -> f64 {
        self.total as f64 / VIEW_TAG_SPACE as f64
    }

    /// Computes chi-squared statistic for uniformity test.
    pub fn chi_squared(&self) -> f64 {
        let expected = self.expected_uniform_count();
        if expected == 0.0 {
            return 0.0;
        }

        self.distribution
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                (diff * diff) / expected
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::diffie_hellman;
    use crate::keys::random_fr;
    use ark_ec::AffineRepr;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use test_case::test_case;

    fn random_point(rng: &mut ChaCha20Rng) -> G1Affine {
        diffie_hellman(&random_fr(rng), &G1Affine::generator())
    }

    #[test_case(ViewTagScheme::Hash, 1)]
    #[test_case(ViewTagScheme::Hash, 2)]
    #[test_case(ViewTagScheme::Coordinate, 1)]
    #[test_case(ViewTagScheme::Coordinate, 2)]
    fn test_tag_length(scheme: ViewTagScheme, num_bytes: usize) {
        let config = ViewTagConfig::new(scheme, num_bytes).unwrap();
        let tag = compute_view_tag(&config, &G1Affine::generator()).unwrap();
        assert_eq!(tag.num_bytes(), num_bytes);
    }

    #[test]
    fn test_coordinate_tag_is_x_prefix() {
        // G1 generator is (1, 2), X leads with zero bytes
        let tag = coordinate_view_tag(&G1Affine::generator(), 2).unwrap();
        assert_eq!(tag.as_bytes(), &[0, 0]);
    }

    #[test]
    fn test_hash_tag_is_digest_prefix() {
        let g = G1Affine::generator();
        let tag = hash_view_tag(&g, 2).unwrap();
        assert_eq!(tag.as_bytes(), &sha256_g1(&g)[..2]);
    }

    #[test]
    fn test_two_byte_tag_extends_one_byte_tag() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let p = random_point(&mut rng);
        let one = hash_view_tag(&p, 1).unwrap();
        let two = hash_view_tag(&p, 2).unwrap();
        assert_eq!(one.as_bytes(), &two.as_bytes()[..1]);
    }

    #[test]
    fn test_invalid_length_rejected() {
        let g = G1Affine::generator();
        assert!(hash_view_tag(&g, 0).is_err());
        assert!(coordinate_view_tag(&g, 3).is_err());
    }

    #[test]
    fn test_verify_view_tag() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let p = random_point(&mut rng);
        let config = ViewTagConfig::hash(1).unwrap();
        let tag = compute_view_tag(&config, &p).unwrap();
        let wrong = ViewTag::from_bytes(&[tag.as_bytes()[0].wrapping_add(1)]).unwrap();

        assert!(verify_view_tag(&config, &p, &tag));
        assert!(!verify_view_tag(&config, &p, &wrong));

        let two_byte = ViewTagConfig::hash(2).unwrap();
        assert!(!verify_view_tag(&two_byte, &p, &tag));
    }

    #[test]
    fn test_hash_tag_distribution() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut stats = ViewTagStats::new();

        for _ in 0..4096 {
            stats.add(&hash_view_tag(&random_point(&mut rng), 1).unwrap());
        }

        // 255 degrees of freedom, p=0.001 critical value is ~310
        assert_eq!(stats.total, 4096);
        assert!(stats.chi_squared() < 350.0, "chi2 = {}", stats.chi_squared());
        assert!(stats.most_common().is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_tags_deterministic(seed in any::<u64>(), num_bytes in 1usize..=2) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let p = random_point(&mut rng);
            prop_assert_eq!(hash_view_tag(&p, num_bytes).unwrap(), hash_view_tag(&p, num_bytes).unwrap());
            prop_assert_eq!(
                coordinate_view_tag(&p, num_bytes).unwrap(),
                coordinate_view_tag(&p, num_bytes).unwrap()
            );
        }
    }
}
