//! Stealth payment creation (sender side).

use ark_bn254::{Fr, G1Affine};
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};
use zeroize::Zeroize;

use ecpdksap_core::error::Result;
use ecpdksap_core::types::{PublicationRecord, SendRequest, VariantId, ViewTag, ViewTagConfig};
use ecpdksap_crypto::{compute_view_tag, diffie_hellman, random_fr, CurveContext, WireFormat};

use crate::keys::RecipientPublicKeys;
use crate::variant::ProtocolVariant;
use crate::{V0, V1, V2};

/// What one send produces: the point to publish, the identifier and an optional tag.
#[derive(Clone, Debug)]
pub struct SendOutput<V: ProtocolVariant> {
    /// Ephemeral point `R = r·G1`, published
    pub ephemeral_key: G1Affine,
    /// Identifier the recipient will reconstruct
    pub identifier: V::Identifier,
    /// View tag over `r·V`, published next to `R`
    pub view_tag: Option<ViewTag>,
}

impl<V: ProtocolVariant> SendOutput<V> {
    /// Wire form of this send.
    pub fn to_record(&self) -> PublicationRecord {
        PublicationRecord {
            variant: V::ID,
            ephemeral_key: self.ephemeral_key.to_wire(),
            identifier: self.identifier.to_wire(),
            view_tag: self.view_tag,
        }
    }
}

/// Creates a stealth payment with a fresh ephemeral scalar.
pub fn send<V: ProtocolVariant, R: RngCore + CryptoRng>(
    ctx: &CurveContext,
    recipient: &RecipientPublicKeys<V>,
    view_tag: Option<&ViewTagConfig>,
    rng: &mut R,
) -> Result<SendOutput<V>> {
    let mut r = random_fr(rng);
    let output = send_with_ephemeral(ctx, recipient, view_tag, &r);
    r.zeroize();
    output
}

/// Creates a stealth payment for a caller-chosen ephemeral scalar `r`.
///
/// Reusing `r` across payments links them; use [`send`] outside tests.
#[instrument(skip_all, fields(variant = %V::ID, view_tag = ?view_tag.map(|c| c.selector())))]
pub fn send_with_ephemeral<V: ProtocolVariant>(
    ctx: &CurveContext,
    recipient: &RecipientPublicKeys<V>,
    view_tag: Option<&ViewTagConfig>,
    r: &Fr,
) -> Result<SendOutput<V>> {
    let ephemeral_key = diffie_hellman(r, ctx.g1());

    let (shared, view_tag) = match view_tag {
        Some(config) => {
            let shared = diffie_hellman(r, &recipient.view);
            let tag = compute_view_tag(config, &shared)?;
            (Some(shared), Some(tag))
        }
        None => (None, None),
    };

    let identifier = V::publish(ctx, recipient, r, shared.as_ref());
    debug!(tag = ?view_tag, "Derived stealth identifier");

    Ok(SendOutput {
        ephemeral_key,
        identifier,
        view_tag,
    })
}

/// Handles a JSON send request for whichever variant it names.
pub fn send_request<R: RngCore + CryptoRng>(
    ctx: &CurveContext,
    request: &SendRequest,
    rng: &mut R,
) -> Result<PublicationRecord> {
    request.validate()?;
    let variant = request.variant()?;
    let config = request.view_tag_config()?;

    fn run<V: ProtocolVariant, R: RngCore + CryptoRng>(
        ctx: &CurveContext,
        request: &SendRequest,
        config: Option<&ViewTagConfig>,
        rng: &mut R,
    ) -> Result<PublicationRecord> {
        let recipient =
            RecipientPublicKeys::<V>::from_wire(&request.spend_public_key, &request.view_public_key)?;
        Ok(send(ctx, &recipient, config, rng)?.to_record())
    }

    match variant {
        VariantId::V0 => run::<V0, R>(ctx, request, config.as_ref(), rng),
        VariantId::V1 => run::<V1, R>(ctx, request, config.as_ref(), rng),
        VariantId::V2 => run::<V2, R>(ctx, request, config.as_ref(), rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::RecipientKeys;
    use ecpdksap_core::EcpdksapError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_send_publishes_r_times_g1() {
        let ctx = CurveContext::new();
        let keys = RecipientKeys::<V1>::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(1));
        let r = Fr::from(42u64);

        let out = send_with_ephemeral(&ctx, keys.public_keys(), None, &r).unwrap();
        assert_eq!(out.ephemeral_key, diffie_hellman(&r, ctx.g1()));
        assert!(out.view_tag.is_none());
    }

    #[test]
    fn test_tag_computed_over_r_times_v() {
        let ctx = CurveContext::new();
        let keys = RecipientKeys::<V0>::generate(&ctx, &mut ChaCha20Rng::seed_from_u64(2));
        let r = Fr::from(1234u64);
        let config = ViewTagConfig::hash(2).unwrap();

        let out = send_with_ephemeral(&ctx, keys.public_keys(), Some(&config), &r).unwrap();
        let shared = diffie_hellman(keys.view_secret(), &out.ephemeral_key);
        assert_eq!(out.view_tag, Some(compute_view_tag(&config, &shared).unwrap()));
    }

    #[test]
    fn test_sends_are_independent() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);

        let a = send(&ctx, keys.public_keys(), None, &mut rng).unwrap();
        let b = send(&ctx, keys.public_keys(), None, &mut rng).unwrap();
        assert_ne!(a.ephemeral_key, b.ephemeral_key);
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn test_send_request_v2() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let keys = RecipientKeys::<V2>::generate(&ctx, &mut rng);
        let export = keys.export();

        let request = SendRequest {
            spend_public_key: export.spend_public.clone(),
            view_public_key: export.view_public.clone(),
            version: "v2".into(),
            view_tag_version: "v1-1byte".into(),
        };
        let record = send_request(&ctx, &request, &mut rng).unwrap();
        assert_eq!(record.variant, VariantId::V2);
        assert!(record.identifier.starts_with("0x"));
        assert_eq!(record.view_tag.map(|t| t.num_bytes()), Some(1));
    }

    #[test]
    fn test_send_request_rejects_bad_input() {
        let ctx = CurveContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let mut request = SendRequest {
            spend_public_key: "1.2".into(),
            view_public_key: "1.2".into(),
            version: "v3".into(),
            view_tag_version: "none".into(),
        };
        assert!(matches!(
            send_request(&ctx, &request, &mut rng),
            Err(EcpdksapError::UnsupportedVariant(_))
        ));

        request.version = "v1".into();
        request.view_public_key = "1.3".into();
        assert!(matches!(
            send_request(&ctx, &request, &mut rng),
            Err(EcpdksapError::PointNotOnCurve(_))
        ));
    }
}
