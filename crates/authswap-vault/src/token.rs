//! Best-effort access-token inspection.
//!
//! Access tokens are three dot-separated segments whose middle segment is a
//! base64url-encoded JSON claim set. Nothing here verifies a signature, and
//! nothing here is allowed to fail loudly: every malformed input yields
//! `None`. Results are for display only.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Namespaced claim holding the user's profile.
const PROFILE_CLAIM: &str = "https://api.openai.com/profile";

/// URL-safe decoder that accepts both padded and unpadded input.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the claim set of a three-segment token.
pub fn decode_claims(access: &str) -> Option<serde_json::Value> {
    let mut parts = access.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || payload.is_empty() {
        return None;
    }

    // Some issuers emit the standard alphabet; fold it onto the URL-safe one.
    let normalized: String = payload
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = CLAIMS_ENGINE.decode(normalized).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.is_object().then_some(claims)
}

/// Extract a display identifier (an email address) from an access token.
///
/// Looks at the namespaced profile claim first, then a top-level `email`.
pub fn extract_display_id(access: &str) -> Option<String> {
    let claims = decode_claims(access)?;

    let email = claims
        .get(PROFILE_CLAIM)
        .and_then(|profile| profile.get("email"))
        .or_else(|| claims.get("email"))?
        .as_str()?
        .trim();

    (!email.is_empty()).then(|| email.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
