//! `appgate-policy` — tiered access-control resolution (pure policy check).
//!
//! Given a verified identity, a requested app key and a read-only policy
//! document, produce an allow/deny [`Verdict`] with a reason code. The
//! resolver never errors and never mutates the document; a missing or
//! malformed document is represented as the empty document, which denies
//! everything that is not public (and an empty public tier means nothing
//! is public).

pub mod document;
pub mod provider;
pub mod resolver;

pub use document::{AccessPolicyDocument, TierOverlap};
pub use provider::{PolicyProvider, StaticPolicyProvider};
pub use resolver::{AccessReason, Verdict, authorize, authorize_public};
