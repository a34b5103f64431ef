use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use appgate_core::{AppKey, Subject};

/// The four-tier access policy, loaded by an external settings provider.
///
/// Read-only to this workspace: the resolver consults it and nothing here
/// ever writes back. `Default` is the all-empty document, which is also the
/// fail-closed fallback when the settings source cannot be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicyDocument {
    /// Apps reachable by anyone, verified or not.
    pub public: BTreeSet<AppKey>,

    /// Apps reachable by any subject holding a validly verified token.
    pub user: BTreeSet<AppKey>,

    /// Apps reachable only by subjects enumerated in `restricted_users`.
    pub restricted: BTreeSet<AppKey>,

    /// Per-app allow lists for the restricted tier.
    pub restricted_users: BTreeMap<AppKey, BTreeSet<Subject>>,

    /// Subjects that bypass tier checks for every app.
    pub admin_users: BTreeSet<Subject>,
}

/// An app key found in more than one of {public, user, restricted}.
///
/// Tier membership is supposed to be exclusive, but the settings format
/// does not enforce that. Overlap is reported at load time and resolved at
/// runtime by the resolver's fixed precedence; documents are never rejected
/// for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierOverlap {
    pub app_key: AppKey,
    pub tiers: Vec<&'static str>,
}

impl AccessPolicyDocument {
    /// Report app keys that appear in more than one tier.
    pub fn lint(&self) -> Vec<TierOverlap> {
        let mut overlaps = Vec::new();

        let keys: BTreeSet<&AppKey> = self
            .public
            .iter()
            .chain(&self.user)
            .chain(&self.restricted)
            .collect();

        for key in keys {
            let mut tiers = Vec::new();
            if self.public.contains(key) {
                tiers.push("public");
            }
            if self.user.contains(key) {
                tiers.push("user");
            }
            if self.restricted.contains(key) {
                tiers.push("restricted");
            }
            if tiers.len() > 1 {
                overlaps.push(TierOverlap {
                    app_key: key.clone(),
                    tiers,
                });
            }
        }

        overlaps
    }

    /// Subjects allowed into a restricted app; empty when the app has no
    /// allow list.
    pub fn restricted_members(&self, app_key: &AppKey) -> Option<&BTreeSet<Subject>> {
        self.restricted_users.get(app_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_is_empty() {
        let doc = AccessPolicyDocument::default();
        assert!(doc.public.is_empty());
        assert!(doc.admin_users.is_empty());
        assert!(doc.lint().is_empty());
    }

    #[test]
    fn lint_flags_keys_in_multiple_tiers() {
        let mut doc = AccessPolicyDocument::default();
        doc.public.insert(AppKey::new("login_test"));
        doc.user.insert(AppKey::new("login_test"));
        doc.user.insert(AppKey::new("reports"));

        let overlaps = doc.lint();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].app_key.as_str(), "login_test");
        assert_eq!(overlaps[0].tiers, vec!["public", "user"]);
    }

    #[test]
    fn missing_fields_deserialize_to_empty() {
        let doc: AccessPolicyDocument = serde_json::from_str(r#"{"user": ["reports"]}"#).unwrap();
        assert_eq!(doc.user.len(), 1);
        assert!(doc.public.is_empty());
        assert!(doc.restricted_users.is_empty());
    }
}
