use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Identity of an authenticated subject.
///
/// Subjects are intentionally opaque strings at this layer; the issuing
/// portal puts a username into the token's `sub` claim and every consumer
/// compares it verbatim against policy membership lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(Cow<'static, str>);

impl Subject {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&'static str> for Subject {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}
