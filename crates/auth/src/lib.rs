//! `appgate-auth` — pure token verification boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and cookie transport: it
//! takes a raw token string (or its absence) and produces either a verified
//! [`IdentityRecord`] or a typed [`VerificationError`]. Tokens are issued by
//! an external portal; every consumer must verify with the same
//! secret/issuer/audience tuple, so that tuple is explicit configuration
//! ([`VerifierConfig`]), never ambient module state.

pub mod claims;
pub mod identity;
pub mod verifier;

pub use claims::{TokenClaims, UnverifiedClaims, peek_unverified};
pub use identity::IdentityRecord;
pub use verifier::{TokenVerifier, VerifierConfig, VerifierConfigError, VerificationError};
