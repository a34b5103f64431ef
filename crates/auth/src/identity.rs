use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use appgate_core::{AppKey, Subject};

/// The result of successful token verification.
///
/// Owned transiently by the caller for the duration of one authorization
/// decision; never persisted by this workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    /// Verified subject from the token's `sub` claim.
    pub subject: Subject,

    /// App keys explicitly granted in the token (`apps` claim). Reserved:
    /// the tiered resolver does not consult these yet.
    pub capabilities: BTreeSet<AppKey>,

    /// Token expiry, carried for diagnostic display.
    pub expires_at: DateTime<Utc>,
}
