use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use appgate_policy::{AccessPolicyDocument, PolicyProvider};

use crate::parse::parse_document;

/// Environment variable naming the settings file, checked when no explicit
/// path was given.
pub const SETTINGS_FILE_ENV: &str = "APPGATE_SETTINGS_FILE";

const DEFAULT_SETTINGS_PATH: &str = "settings.toml";

/// File-backed policy provider.
///
/// Re-reads the file on every `load`, so an edited settings file takes
/// effect on the next authorization without process restart. Every failure
/// mode (missing file, unreadable file, invalid TOML) yields the empty
/// document: deny everything that is not public, and with an empty public
/// tier nothing is public.
#[derive(Debug, Clone)]
pub struct TomlPolicyProvider {
    path: PathBuf,
}

impl TomlPolicyProvider {
    /// Provider for an explicitly chosen settings file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider resolved from `APPGATE_SETTINGS_FILE`, falling back to
    /// `settings.toml` in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var_os(SETTINGS_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> AccessPolicyDocument {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "settings file unreadable; using empty policy"
                );
                return AccessPolicyDocument::default();
            }
        };

        match parse_document(&text) {
            Ok(document) => {
                for overlap in document.lint() {
                    warn!(
                        app_key = %overlap.app_key,
                        tiers = ?overlap.tiers,
                        "app key listed in multiple tiers; precedence order will decide"
                    );
                }
                debug!(path = %self.path.display(), "policy snapshot loaded");
                document
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "settings file is not valid TOML; using empty policy"
                );
                AccessPolicyDocument::default()
            }
        }
    }
}

impl PolicyProvider for TomlPolicyProvider {
    fn load(&self) -> AccessPolicyDocument {
        self.read()
    }
}
