//! End-to-end gate flow: settings file on disk, minted portal token in the
//! store, decisions recorded to a JSONL log.

use std::io::Write;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use appgate_auth::{TokenVerifier, VerificationError, VerifierConfig};
use appgate_core::{AppKey, Subject};
use appgate_events::{DecisionEvent, JsonlSink};
use appgate_gate::{Gate, GateDecision, MemoryTokenStore, TokenStore};
use appgate_policy::AccessReason;
use appgate_settings::TomlPolicyProvider;

const SECRET: &str = "shared-with-the-portal";
const COOKIE: &str = "portal_session";

// admin_users must stay above the first table header: TOML scopes any key
// after `[restricted_users]` into that table.
const SETTINGS: &str = r#"
admin_users = ["root"]

[access.public]
apps = ["landing"]

[access.user]
apps = ["reports"]

[access.restricted]
apps = ["login_test"]

[restricted_users]
login_test = ["alice"]
"#;

struct Harness {
    gate: Gate,
    settings: tempfile::NamedTempFile,
    _log_dir: tempfile::TempDir,
    log_path: std::path::PathBuf,
}

impl Harness {
    fn new() -> Self {
        appgate_observability::init();

        let mut settings = tempfile::NamedTempFile::new().expect("settings file");
        settings
            .write_all(SETTINGS.as_bytes())
            .expect("write settings");

        let log_dir = tempfile::tempdir().expect("log dir");
        let log_path = log_dir.path().join("decisions.jsonl");

        let verifier = TokenVerifier::new(
            VerifierConfig::new(SECRET)
                .with_issuer("portal-auth")
                .with_audience("portal-internal"),
        )
        .expect("verifier config");

        let gate = Gate::new(
            verifier,
            Arc::new(TomlPolicyProvider::new(settings.path())),
            Arc::new(JsonlSink::new(&log_path)),
            COOKIE,
        );

        Self {
            gate,
            settings,
            _log_dir: log_dir,
            log_path,
        }
    }

    fn store_with(&self, token: &str) -> MemoryTokenStore {
        MemoryTokenStore::with_token(COOKIE, token)
    }

    fn recorded_events(&self) -> Vec<DecisionEvent> {
        let contents = std::fs::read_to_string(&self.log_path).unwrap_or_default();
        contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("event line parses"))
            .collect()
    }
}

fn mint_token(sub: &str, ttl_minutes: i64) -> String {
    let claims = serde_json::json!({
        "sub": sub,
        "exp": (Utc::now() + ChronoDuration::minutes(ttl_minutes)).timestamp(),
        "iss": "portal-auth",
        "aud": "portal-internal",
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[test]
fn restricted_app_admits_listed_user_and_rejects_others() {
    let h = Harness::new();
    let app = AppKey::new("login_test");

    let alice = h.store_with(&mint_token("alice", 10));
    assert!(h.gate.evaluate(&alice, &app).is_granted());

    let bob = h.store_with(&mint_token("bob", 10));
    let GateDecision::Denied { verdict, .. } = h.gate.evaluate(&bob, &app) else {
        panic!("expected Denied for bob");
    };
    assert_eq!(verdict.reason, AccessReason::RestrictedUsers);

    // root is an admin and bypasses the allow list.
    let root = h.store_with(&mint_token("root", 10));
    let GateDecision::Granted { verdict, .. } = h.gate.evaluate(&root, &app) else {
        panic!("expected Granted for root");
    };
    assert_eq!(verdict.reason, AccessReason::AdminUser);

    let events = h.recorded_events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].subject, Some(Subject::new("alice")));
    assert!(!events[1].allowed);
    assert_eq!(events[2].reason, "admin_user");
}

#[test]
fn expired_session_reports_expiry_without_redirecting_anywhere() {
    let h = Harness::new();

    let store = h.store_with(&mint_token("alice", -60));
    let decision = h.gate.evaluate(&store, &AppKey::new("reports"));

    let GateDecision::Unauthenticated { error, peek } = decision else {
        panic!("expected Unauthenticated");
    };
    assert!(matches!(error, VerificationError::Expired { .. }));
    assert_eq!(peek.expect("payload parses").sub.as_deref(), Some("alice"));
}

#[test]
fn public_app_needs_no_cookie_at_all() {
    let h = Harness::new();
    let store = MemoryTokenStore::new();

    let decision = h.gate.evaluate(&store, &AppKey::new("landing"));
    let GateDecision::Granted { identity, verdict } = decision else {
        panic!("expected Granted");
    };
    assert!(identity.is_none());
    assert_eq!(verdict.reason, AccessReason::Public);
}

#[test]
fn settings_edit_applies_on_the_next_evaluation() {
    let h = Harness::new();
    let app = AppKey::new("brand_new_app");
    let store = h.store_with(&mint_token("alice", 10));

    let GateDecision::Denied { verdict, .. } = h.gate.evaluate(&store, &app) else {
        panic!("expected Denied before registration");
    };
    assert_eq!(verdict.reason, AccessReason::UnlistedApp);

    // Register the app in the user tier and re-evaluate; no restart, no
    // cached verdicts.
    let amended = SETTINGS.replace(
        "apps = [\"reports\"]",
        "apps = [\"reports\", \"brand_new_app\"]",
    );
    std::fs::write(h.settings.path(), amended).expect("rewrite settings");

    assert!(h.gate.evaluate(&store, &app).is_granted());
}

#[test]
fn logout_deletes_the_cookie_and_locks_the_gate() {
    let h = Harness::new();
    let store = h.store_with(&mint_token("alice", 10));
    let app = AppKey::new("reports");

    assert!(h.gate.evaluate(&store, &app).is_granted());

    store.delete(COOKIE);
    let decision = h.gate.evaluate(&store, &app);
    assert!(matches!(
        decision,
        GateDecision::Unauthenticated {
            error: VerificationError::MissingToken,
            ..
        }
    ));
}
