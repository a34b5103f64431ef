use std::collections::BTreeSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer, Serialize};

/// Claims model for the portal-issued session token (transport-agnostic).
///
/// Required claims are `sub` and `exp`; requiredness is enforced by the
/// verifier, not by this struct, so a missing claim deserializes to `None`
/// and surfaces as a precise verification error instead of a decode
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject / authenticated username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration timestamp (epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    /// Issuer, matched against the verifier's expected issuer when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience, matched against the verifier's expected audience when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// App keys explicitly granted to the subject, independent of tiered
    /// policy. A malformed `apps` claim (anything but an array of strings)
    /// coerces to the empty set: it must not crash the resolver, and it
    /// must not silently grant anything either.
    #[serde(default, deserialize_with = "lenient_app_list")]
    pub apps: BTreeSet<String>,
}

fn lenient_app_list<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let apps = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    };
    Ok(apps)
}

/// Claims decoded **without** signature or expiry validation.
///
/// Diagnostic display only (e.g. telling an expired session apart from a
/// corrupt one on an error page). Must never feed an authorization
/// decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UnverifiedClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
}

/// Decode a token's payload without verifying anything about it.
///
/// Returns `None` when the string is not even structurally a JWT.
pub fn peek_unverified(raw: &str) -> Option<UnverifiedClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<UnverifiedClaims>(raw, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}
