//! `appgate-settings` — access-policy snapshot loading.
//!
//! Reads the portal's `settings.toml` and produces an
//! [`appgate_policy::AccessPolicyDocument`]. Loading is total: unreadable
//! files, malformed TOML and wrongly-shaped sections all coerce toward the
//! empty document (fail closed, never open) with a warning in the logs.

pub mod parse;
pub mod provider;

pub use parse::parse_document;
pub use provider::{SETTINGS_FILE_ENV, TomlPolicyProvider};
