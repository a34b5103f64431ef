use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use appgate_auth::{IdentityRecord, TokenVerifier, UnverifiedClaims, VerificationError, peek_unverified};
use appgate_core::AppKey;
use appgate_events::{DecisionEvent, EventSink};
use appgate_policy::{PolicyProvider, Verdict, authorize, authorize_public};

use crate::store::TokenStore;

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Access granted. `identity` is `None` when a public app was reached
    /// without (or with an unusable) token.
    Granted {
        identity: Option<IdentityRecord>,
        verdict: Verdict,
    },

    /// Token verified, policy said no.
    Denied {
        identity: IdentityRecord,
        verdict: Verdict,
    },

    /// No usable token and the app is not public. `peek` carries the
    /// unverified payload, when the token at least parses, so the caller
    /// can show "expired at ..." style diagnostics in place instead of
    /// blindly redirecting.
    Unauthenticated {
        error: VerificationError,
        peek: Option<UnverifiedClaims>,
    },
}

impl GateDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted { .. })
    }
}

/// One configured gate in front of one app suite.
///
/// Stateless across evaluations: the policy snapshot is reloaded from the
/// provider on every call, so verdicts never go stale behind a settings
/// edit.
pub struct Gate {
    verifier: TokenVerifier,
    provider: Arc<dyn PolicyProvider>,
    sink: Arc<dyn EventSink>,
    cookie_name: String,
}

impl Gate {
    pub fn new(
        verifier: TokenVerifier,
        provider: Arc<dyn PolicyProvider>,
        sink: Arc<dyn EventSink>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            provider,
            sink,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Evaluate access to `app_key` for whoever the token store says is
    /// here, against the current wall clock.
    pub fn evaluate(&self, store: &dyn TokenStore, app_key: &AppKey) -> GateDecision {
        self.evaluate_at(store, app_key, Utc::now())
    }

    /// Evaluate against an explicit clock instant.
    pub fn evaluate_at(
        &self,
        store: &dyn TokenStore,
        app_key: &AppKey,
        now: DateTime<Utc>,
    ) -> GateDecision {
        let raw = store.get(&self.cookie_name);
        let policy = self.provider.load();

        match self.verifier.verify_at(raw.as_deref(), now) {
            Ok(identity) => {
                let verdict = authorize(&identity, app_key, &policy);
                self.sink.record(&DecisionEvent::new(
                    Some(identity.subject.clone()),
                    app_key.clone(),
                    verdict.allowed,
                    verdict.reason.as_str(),
                ));

                if verdict.allowed {
                    GateDecision::Granted {
                        identity: Some(identity),
                        verdict,
                    }
                } else {
                    debug!(
                        subject = %identity.subject,
                        app_key = %app_key,
                        reason = verdict.reason.as_str(),
                        "access denied"
                    );
                    GateDecision::Denied { identity, verdict }
                }
            }
            Err(error) => {
                // Public apps do not need a token at all.
                if let Some(verdict) = authorize_public(app_key, &policy) {
                    self.sink.record(&DecisionEvent::new(
                        None,
                        app_key.clone(),
                        true,
                        verdict.reason.as_str(),
                    ));
                    return GateDecision::Granted {
                        identity: None,
                        verdict,
                    };
                }

                let reason = match &error {
                    VerificationError::Expired { .. } => "expired_token",
                    _ => "invalid_token",
                };
                self.sink
                    .record(&DecisionEvent::new(None, app_key.clone(), false, reason));
                debug!(app_key = %app_key, error = %error, "token rejected");

                let peek = raw.as_deref().and_then(peek_unverified);
                GateDecision::Unauthenticated { error, peek }
            }
        }
    }
}
