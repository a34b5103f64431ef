use crate::document::AccessPolicyDocument;

/// Source of the access policy snapshot.
///
/// Implementations own discovery, parsing and reload cadence; the contract
/// here is total: a provider that cannot produce a document returns the
/// empty (deny-all-but-public) document instead of an error. The resolver
/// side never caches a snapshot across calls, so a freshly reloaded
/// document takes effect on the next authorization.
pub trait PolicyProvider: Send + Sync {
    fn load(&self) -> AccessPolicyDocument;
}

/// A fixed in-memory snapshot, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyProvider {
    document: AccessPolicyDocument,
}

impl StaticPolicyProvider {
    pub fn new(document: AccessPolicyDocument) -> Self {
        Self { document }
    }
}

impl PolicyProvider for StaticPolicyProvider {
    fn load(&self) -> AccessPolicyDocument {
        self.document.clone()
    }
}
