use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Application identifier.
///
/// App keys are modeled as opaque strings (e.g. "login_test"), derived by the
/// hosting layer from the app's public path. The policy layer matches them
/// verbatim; no normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppKey(Cow<'static, str>);

impl AppKey {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AppKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AppKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&'static str> for AppKey {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}
