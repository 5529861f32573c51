//! Payment discovery (recipient side, one candidate at a time).
//!
//! ```text
//! candidate (R, tag?)
//!     ↓ decode R                      MalformedEncoding / PointNotOnCurve
//!     ↓ tag configured and present?
//!         T = v·R, compare tag        mismatch → TagMismatch (not an error)
//!     ↓ recover(R, T?)                → Recovered
//! ```
//!
//! A candidate without a published tag skips the filter and is recovered,
//! so a missing hint never hides a payment.

use ark_bn254::G1Affine;

use ecpdksap_core::error::Result;
use ecpdksap_core::types::{ScanCandidate, ViewTag, ViewTagConfig};
use ecpdksap_crypto::{diffie_hellman, verify_view_tag, CurveContext, WireFormat};

use crate::keys::RecipientKeys;
use crate::variant::{ProtocolVariant, Recovered};

/// Outcome of evaluating a single candidate.
#[derive(Debug)]
pub enum ScanOutcome<V: ProtocolVariant> {
    /// View tag didn't match - not for this recipient
    TagMismatch,
    /// Filter passed (or was not applied) and recovery ran
    Recovered {
        /// Whether the candidate passed a tag comparison to get here
        tag_checked: bool,
        /// Recovery output
        result: Recovered<V>,
    },
}

impl<V: ProtocolVariant> ScanOutcome<V> {
    /// Returns true if recovery ran.
    pub fn is_recovered(&self) -> bool {
        matches!(self, ScanOutcome::Recovered { .. })
    }

    /// Returns the recovery output if present.
    pub fn into_recovered(self) -> Option<Recovered<V>> {
        match self {
            ScanOutcome::Recovered { result, .. } => Some(result),
            ScanOutcome::TagMismatch => None,
        }
    }
}

/// Result of the cheap filtering phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDecision {
    /// Published tag differs from the recomputed one
    Reject,
    /// Candidate goes on to recovery
    Pass {
        /// `v·R`, when the filter already computed it
        shared: Option<G1Affine>,
    },
}

/// Filtering phase: recomputes the tag over `v·R` and compares.
///
/// Passes without any work when no scheme is configured or the candidate
/// has no published tag.
pub fn filter_point<V: ProtocolVariant>(
    keys: &RecipientKeys<V>,
    view_tag: Option<&ViewTagConfig>,
    ephemeral: &G1Affine,
    published_tag: Option<&ViewTag>,
) -> FilterDecision {
    match (view_tag, published_tag) {
        (Some(config), Some(tag)) => {
            let shared = diffie_hellman(keys.view_secret(), ephemeral);
            if verify_view_tag(config, &shared, tag) {
                FilterDecision::Pass {
                    shared: Some(shared),
                }
            } else {
                FilterDecision::Reject
            }
        }
        _ => FilterDecision::Pass { shared: None },
    }
}

/// Filters and recovers an already decoded candidate.
pub fn scan_point<V: ProtocolVariant>(
    ctx: &CurveContext,
    keys: &RecipientKeys<V>,
    view_tag: Option<&ViewTagConfig>,
    ephemeral: &G1Affine,
    published_tag: Option<&ViewTag>,
) -> ScanOutcome<V> {
    match filter_point(keys, view_tag, ephemeral, published_tag) {
        FilterDecision::Reject => ScanOutcome::TagMismatch,
        FilterDecision::Pass { shared } => ScanOutcome::Recovered {
            tag_checked: shared.is_some(),
            result: V::recover(ctx, keys, ephemeral, shared.as_ref()),
        },
    }
}

/// Decodes a wire candidate, then filters and recovers it.
///
/// # Errors
///
/// Decode failures of the ephemeral point or the tag. A tag mismatch is
/// reported as [`ScanOutcome::TagMismatch`], not as an error.
pub fn scan_candidate<V: ProtocolVariant>(
    ctx: &CurveContext,
    keys: &RecipientKeys<V>,
    view_tag: Option<&ViewTagConfig>,
    candidate: &ScanCandidate,
) -> Result<ScanOutcome<V>> {
    let (ephemeral, published) = decode_candidate(candidate, view_tag)?;
    Ok(scan_point(ctx, keys, view_tag, &ephemeral, published.as_ref()))
}

/// Decodes a candidate's ephemeral point and, when a scheme is configured,
/// its published tag.
pub fn decode_candidate(
    candidate: &ScanCandidate,
    view_tag: Option<&ViewTagConfig>,
) -> Result<(G1Affine, Option<ViewTag>)> {
    let ephemeral = G1Affine::from_wire(&candidate.ephemeral_key)?;
    let published = match view_tag {
        Some(_) => candidate.decode_view_tag()?,
        None => None,
    };
    Ok((ephemeral, published))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::send::send;
    use crate::{V0, V1, V2};
    use ecpdksap_core::EcpdksapError;
    use ecpdksap_crypto::random_fr;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use test_case::test_case;

    fn roundtrip<V: ProtocolVariant>(selector: &str) {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(500);
        let keys = RecipientKeys::<V>::generate(&ctx, &mut rng);
        let config = ViewTagConfig::from_selector(selector).unwrap();

        let sent = send(&ctx, keys.public_keys(), config.as_ref(), &mut rng).unwrap();
        let candidate = sent.to_record().to_candidate();

        let outcome = scan_candidate(&ctx, &keys, config.as_ref(), &candidate).unwrap();
        let recovered = outcome.into_recovered().expect("own payment passes the filter");
        assert_eq!(recovered.identifier, sent.identifier);
        assert_eq!(recovered.identifier.to_wire(), sent.to_record().identifier);
    }

    #[test_case("none" ; "no tag")]
    #[test_case("v0-1byte" ; "hash 1 byte")]
    #[test_case("v0-2bytes" ; "hash 2 bytes")]
    #[test_case("v1-1byte" ; "coordinate 1 byte")]
    #[test_case("v1-2bytes" ; "coordinate 2 bytes")]
    fn test_v0_send_then_scan(selector: &str) {
        roundtrip::<V0>(selector);
    }

    #[test_case("none" ; "no tag")]
    #[test_case("v0-1byte" ; "hash 1 byte")]
    #[test_case("v0-2bytes" ; "hash 2 bytes")]
    #[test_case("v1-1byte" ; "coordinate 1 byte")]
    #[test_case("v1-2bytes" ; "coordinate 2 bytes")]
    fn test_v1_send_then_scan(selector: &str) {
        roundtrip::<V1>(selector);
    }

    #[test_case("none" ; "no tag")]
    #[test_case("v0-1byte" ; "hash 1 byte")]
    #[test_case("v0-2bytes" ; "hash 2 bytes")]
    #[test_case("v1-1byte" ; "coordinate 1 byte")]
    #[test_case("v1-2bytes" ; "coordinate 2 bytes")]
    fn test_v2_send_then_scan(selector: &str) {
        roundtrip::<V2>(selector);
    }

    #[test]
    fn test_wrong_view_key_never_matches() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(501);
        let keys = RecipientKeys::<V1>::generate(&ctx, &mut rng);
        let stranger = RecipientKeys::<V1>::generate(&ctx, &mut rng);
        let config = ViewTagConfig::hash(2).unwrap();

        for _ in 0..8 {
            let sent = send(&ctx, keys.public_keys(), Some(&config), &mut rng).unwrap();
            let candidate = sent.to_record().to_candidate();
            let outcome = scan_candidate(&ctx, &stranger, Some(&config), &candidate).unwrap();
            if let Some(recovered) = outcome.into_recovered() {
                assert_ne!(recovered.identifier, sent.identifier);
            }
        }
    }

    #[test]
    fn test_missing_tag_goes_to_recovery() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(502);
        let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);
        let sent = send(&ctx, keys.public_keys(), None, &mut rng).unwrap();
        let config = ViewTagConfig::coordinate(1).unwrap();

        let candidate = ScanCandidate::new(sent.ephemeral_key.to_wire());
        match scan_candidate(&ctx, &keys, Some(&config), &candidate).unwrap() {
            ScanOutcome::Recovered { tag_checked, result } => {
                assert!(!tag_checked);
                assert_eq!(result.identifier, sent.identifier);
            }
            ScanOutcome::TagMismatch => panic!("untagged candidate was filtered"),
        }
    }

    #[test]
    fn test_tag_mismatch_is_not_an_error() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(503);
        let keys = RecipientKeys::<V0>::generate(&ctx, &mut rng);
        let config = ViewTagConfig::hash(1).unwrap();
        let ephemeral = diffie_hellman(&random_fr(&mut rng), ctx.g1());

        let shared = diffie_hellman(keys.view_secret(), &ephemeral);
        let expected = ecpdksap_crypto::compute_view_tag(&config, &shared).unwrap();
        let wrong = ViewTag::from_bytes(&[expected.as_bytes()[0] ^ 0xff]).unwrap();

        let outcome = scan_point(&ctx, &keys, Some(&config), &ephemeral, Some(&wrong));
        assert!(!outcome.is_recovered());
    }

    #[test]
    fn test_malformed_candidate() {
        let ctx = CurveContext::new();
        let keys = RecipientKeys::<V1>::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(504));

        let err = scan_candidate(&ctx, &keys, None, &ScanCandidate::new("not-a-point")).unwrap_err();
        assert!(matches!(err, EcpdksapError::MalformedEncoding { .. }));

        let off_curve = scan_candidate(&ctx, &keys, None, &ScanCandidate::new("1.3")).unwrap_err();
        assert!(matches!(off_curve, EcpdksapError::PointNotOnCurve(_)));
    }

    #[test]
    fn test_bad_tag_ignored_without_scheme() {
        let ctx = CurveContext::new();
        let keys = RecipientKeys::<V1>::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(505));
        let candidate = ScanCandidate {
            ephemeral_key: "1.2".into(),
            view_tag: Some("zz".into()),
        };
        assert!(scan_candidate(&ctx, &keys, None, &candidate).is_ok());

        let config = ViewTagConfig::hash(1).unwrap();
        assert!(scan_candidate(&ctx, &keys, Some(&config), &candidate)
            .unwrap_err()
            .is_encoding_error());
    }
}
