use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use appgate_core::{AppKey, Subject};

/// One authorization decision, as reported to the event sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,

    /// Verified subject, when there was one. `None` for unauthenticated
    /// evaluations (public apps, rejected tokens).
    pub subject: Option<Subject>,

    /// The app the decision was about.
    pub app_key: AppKey,

    pub allowed: bool,

    /// Reason code: a resolver reason (`public`, `admin_user`, ...) or a
    /// token failure (`invalid_token`, `expired_token`).
    pub reason: String,
}

impl DecisionEvent {
    pub fn new(
        subject: Option<Subject>,
        app_key: AppKey,
        allowed: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            subject,
            app_key,
            allowed,
            reason: reason.into(),
        }
    }
}
