use std::collections::{BTreeMap, BTreeSet};

use toml::Value;

use appgate_core::{AppKey, Subject};
use appgate_policy::AccessPolicyDocument;

/// Parse the portal settings format into a policy document.
///
/// Expected shape:
///
/// ```toml
/// admin_users = ["root"]
///
/// [access.public]
/// apps = ["landing"]
///
/// [access.user]
/// apps = ["reports"]
///
/// [access.restricted]
/// apps = ["login_test"]
///
/// [restricted_users]
/// login_test = ["alice"]
/// ```
///
/// Note `admin_users` is a top-level key and must appear before the first
/// table header, or TOML scopes it into the preceding table.
///
/// `admin_users` may also be written as a table with a `users` array. Any
/// section with the wrong shape coerces to empty rather than failing the
/// whole document; only TOML that does not parse at all is an error, and
/// the provider layer turns even that into the empty document.
pub fn parse_document(text: &str) -> Result<AccessPolicyDocument, toml::de::Error> {
    let root: Value = toml::from_str(text)?;
    Ok(document_from_value(&root))
}

fn document_from_value(root: &Value) -> AccessPolicyDocument {
    let access = root.get("access");

    AccessPolicyDocument {
        public: tier_apps(access, "public"),
        user: tier_apps(access, "user"),
        restricted: tier_apps(access, "restricted"),
        restricted_users: restricted_users(root.get("restricted_users")),
        admin_users: admin_users(root.get("admin_users")),
    }
}

fn tier_apps(access: Option<&Value>, tier: &str) -> BTreeSet<AppKey> {
    let apps = access.and_then(|a| a.get(tier)).and_then(|t| t.get("apps"));
    string_array(apps).into_iter().map(AppKey::from).collect()
}

fn restricted_users(value: Option<&Value>) -> BTreeMap<AppKey, BTreeSet<Subject>> {
    let Some(Value::Table(table)) = value else {
        return BTreeMap::new();
    };

    table
        .iter()
        .map(|(app, members)| {
            let members = string_array(Some(members))
                .into_iter()
                .map(Subject::from)
                .collect();
            (AppKey::from(app.clone()), members)
        })
        .collect()
}

fn admin_users(value: Option<&Value>) -> BTreeSet<Subject> {
    let flat = match value {
        Some(Value::Array(_)) => string_array(value),
        Some(Value::Table(table)) => string_array(table.get("users")),
        _ => Vec::new(),
    };
    flat.into_iter().map(Subject::from).collect()
}

/// An array of strings, or empty for anything else. Non-string entries are
/// dropped, not fatal.
fn string_array(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_parses() {
        let doc = parse_document(
            r#"
            admin_users = ["root"]

            [access.public]
            apps = ["landing"]

            [access.user]
            apps = ["reports", "dashboard"]

            [access.restricted]
            apps = ["login_test"]

            [restricted_users]
            login_test = ["alice", "carol"]
            "#,
        )
        .unwrap();

        assert!(doc.public.contains(&AppKey::new("landing")));
        assert_eq!(doc.user.len(), 2);
        assert!(doc.restricted.contains(&AppKey::new("login_test")));
        assert!(
            doc.restricted_users[&AppKey::new("login_test")].contains(&Subject::new("alice"))
        );
        assert!(doc.admin_users.contains(&Subject::new("root")));
    }

    #[test]
    fn admin_users_table_form_is_accepted() {
        let doc = parse_document(
            r#"
            [admin_users]
            users = ["root", "ops"]
            "#,
        )
        .unwrap();
        assert_eq!(doc.admin_users.len(), 2);
    }

    #[test]
    fn malformed_admin_users_fails_closed() {
        let doc = parse_document(r#"admin_users = "root""#).unwrap();
        assert!(doc.admin_users.is_empty());
    }

    #[test]
    fn wrong_shapes_coerce_to_empty() {
        let doc = parse_document(
            r#"
            [access]
            public = "not-a-table"

            restricted_users = 7
            "#,
        )
        .unwrap();
        assert_eq!(doc, AccessPolicyDocument::default());
    }

    #[test]
    fn empty_input_is_the_empty_document() {
        assert_eq!(parse_document("").unwrap(), AccessPolicyDocument::default());
    }

    #[test]
    fn admin_users_after_a_table_header_belongs_to_that_table() {
        // TOML scopes top-level-looking keys that follow a table header
        // into that table, so this document defines no admins at all. It
        // must fail closed, not grant "root" anything.
        let doc = parse_document(
            r#"
            [restricted_users]
            login_test = ["alice"]

            admin_users = ["root"]
            "#,
        )
        .unwrap();
        assert!(doc.admin_users.is_empty());
        assert!(
            doc.restricted_users[&AppKey::new("login_test")].contains(&Subject::new("alice"))
        );
    }

    #[test]
    fn non_string_entries_are_dropped() {
        let doc = parse_document(
            r#"
            [access.user]
            apps = ["reports", 1, false]
            "#,
        )
        .unwrap();
        assert_eq!(doc.user.len(), 1);
    }
}
