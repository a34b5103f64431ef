use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use appgate_core::AppKey;

use crate::claims::TokenClaims;
use crate::identity::IdentityRecord;

/// Default clock-skew tolerance when checking expiry.
pub const DEFAULT_LEEWAY_SECONDS: u64 = 30;

/// Trust-root configuration for a [`TokenVerifier`].
///
/// The portal that issues tokens and every app that verifies them must
/// agree on this tuple; passing it in explicitly (rather than reading
/// process-wide state) lets multiple verifiers with different trust roots
/// coexist and be tested in isolation.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Pre-shared HMAC secret, as agreed with the issuing portal.
    pub secret: String,

    /// Signature algorithm. HS256 unless the portal says otherwise.
    pub algorithm: Algorithm,

    /// Expected `iss` claim; `None` disables issuer checking.
    pub issuer: Option<String>,

    /// Expected `aud` claim; `None` disables audience checking.
    pub audience: Option<String>,

    /// Clock-skew tolerance, applied symmetrically around expiry.
    pub leeway_seconds: u64,
}

impl VerifierConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway_seconds(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}

/// Construction-time misconfiguration.
///
/// This is the only fatal path in the crate: a verifier that cannot verify
/// at all must fail at startup, not per request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierConfigError {
    #[error("verifier secret must not be empty")]
    EmptySecret,
}

/// Why a token was rejected.
///
/// The distinction exists for diagnostics only; every variant means "deny
/// and re-authenticate". Callers must never grant partial trust based on
/// which variant came back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("no token presented")]
    MissingToken,

    #[error("token structure or signature invalid")]
    SignatureInvalid,

    #[error("token expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    #[error("required claim missing: {0}")]
    ClaimsMissing(String),

    #[error("token issuer does not match expected issuer")]
    IssuerMismatch,

    #[error("token audience does not match expected audience")]
    AudienceMismatch,
}

/// Verifies portal-issued session tokens.
///
/// Pure over (token, clock instant, configuration): no IO, no panics, no
/// internal state. Expiry is checked here against an explicit clock rather
/// than delegated to the JWT library, so verification is deterministic
/// under test.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
    leeway: Duration,
}

impl TokenVerifier {
    pub fn new(config: VerifierConfig) -> Result<Self, VerifierConfigError> {
        if config.secret.is_empty() {
            return Err(VerifierConfigError::EmptySecret);
        }

        // The library only checks structure and signature; every claim
        // check happens in `verify_at`, in a fixed order.
        let mut validation = Validation::new(config.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            audience: config.audience,
            // Leeway is a skew tolerance, not a grace period; clamp to a day.
            leeway: Duration::seconds(config.leeway_seconds.min(86_400) as i64),
        })
    }

    /// Verify a possibly-absent raw token against the current wall clock.
    pub fn verify(&self, raw: Option<&str>) -> Result<IdentityRecord, VerificationError> {
        self.verify_at(raw, Utc::now())
    }

    /// Verify against an explicit clock instant.
    ///
    /// Checks, in order: presence, structure/signature, required claims,
    /// expiry with leeway, then issuer and audience. A correctly signed but
    /// expired token therefore always reports [`VerificationError::Expired`],
    /// never [`VerificationError::SignatureInvalid`] and never an
    /// issuer/audience mismatch, since expiry is decided first.
    pub fn verify_at(
        &self,
        raw: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<IdentityRecord, VerificationError> {
        let raw = raw
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(VerificationError::MissingToken)?;

        let claims = jsonwebtoken::decode::<TokenClaims>(raw, &self.decoding_key, &self.validation)
            .map_err(|_| VerificationError::SignatureInvalid)?
            .claims;

        let sub = claims
            .sub
            .ok_or_else(|| VerificationError::ClaimsMissing("sub".to_string()))?;
        let exp = claims
            .exp
            .ok_or_else(|| VerificationError::ClaimsMissing("exp".to_string()))?;

        let expired_at = expiry_instant(exp)?;
        if now > expired_at + self.leeway {
            return Err(VerificationError::Expired { expired_at });
        }

        // Absent iss/aud is not equal to the expected value: fail closed.
        if let Some(expected) = &self.issuer {
            if claims.iss.as_deref() != Some(expected.as_str()) {
                return Err(VerificationError::IssuerMismatch);
            }
        }
        if let Some(expected) = &self.audience {
            if claims.aud.as_deref() != Some(expected.as_str()) {
                return Err(VerificationError::AudienceMismatch);
            }
        }

        Ok(IdentityRecord {
            subject: sub.into(),
            capabilities: claims.apps.into_iter().map(AppKey::from).collect(),
            expires_at: expired_at,
        })
    }
}

fn expiry_instant(exp: u64) -> Result<DateTime<Utc>, VerificationError> {
    // An exp outside the representable range is structural garbage, not a
    // real timestamp.
    i64::try_from(exp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or(VerificationError::SignatureInvalid)
}
