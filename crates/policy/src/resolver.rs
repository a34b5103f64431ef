use serde::Serialize;

use appgate_auth::IdentityRecord;
use appgate_core::AppKey;

use crate::document::AccessPolicyDocument;

/// Which rule decided an authorization, allow or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// App is in the public tier; no identity required.
    Public,
    /// Subject is an admin and bypasses tier checks.
    AdminUser,
    /// App is in the user tier; any verified subject qualifies.
    UserLayer,
    /// App is restricted; membership in its allow list decided the outcome.
    RestrictedUsers,
    /// App is in no tier at all. A normal state for unregistered apps, not
    /// an error.
    UnlistedApp,
}

impl AccessReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessReason::Public => "public",
            AccessReason::AdminUser => "admin_user",
            AccessReason::UserLayer => "user_layer",
            AccessReason::RestrictedUsers => "restricted_users",
            AccessReason::UnlistedApp => "unlisted_app",
        }
    }
}

/// Outcome of one authorization evaluation. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl Verdict {
    fn allow(reason: AccessReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: AccessReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Authorize a verified identity for an app.
///
/// Fixed precedence, first match wins: public, admin bypass, user tier,
/// restricted allow list, deny. The order is deliberate; an app key that a
/// misauthored document places in several tiers resolves by this order
/// alone (see [`AccessPolicyDocument::lint`]).
///
/// - No IO
/// - No panics
/// - No hidden state (identical arguments always yield the identical
///   verdict)
pub fn authorize(
    identity: &IdentityRecord,
    app_key: &AppKey,
    policy: &AccessPolicyDocument,
) -> Verdict {
    if policy.public.contains(app_key) {
        return Verdict::allow(AccessReason::Public);
    }

    if policy.admin_users.contains(&identity.subject) {
        return Verdict::allow(AccessReason::AdminUser);
    }

    if policy.user.contains(app_key) {
        return Verdict::allow(AccessReason::UserLayer);
    }

    if policy.restricted.contains(app_key) {
        let listed = policy
            .restricted_members(app_key)
            .is_some_and(|members| members.contains(&identity.subject));
        return Verdict {
            allowed: listed,
            reason: AccessReason::RestrictedUsers,
        };
    }

    Verdict::deny(AccessReason::UnlistedApp)
}

/// The unauthenticated path: only the public tier can allow.
///
/// Returns `None` when the app is not public, so the caller knows a
/// verified identity is required to go further.
pub fn authorize_public(app_key: &AppKey, policy: &AccessPolicyDocument) -> Option<Verdict> {
    policy
        .public
        .contains(app_key)
        .then(|| Verdict::allow(AccessReason::Public))
}
