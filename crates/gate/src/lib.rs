//! `appgate-gate` — per-request composition of verifier, policy and sink.
//!
//! The page layer hands a [`Gate`] its token store and an app key; the gate
//! runs the whole dance — cookie lookup, token verification, policy reload,
//! tier resolution, event emission — and returns a [`GateDecision`] with
//! enough structure for any rendering strategy (inline diagnostics,
//! redirect, API error body) without re-deriving anything from the raw
//! token.

pub mod gate;
pub mod store;

pub use gate::{Gate, GateDecision};
pub use store::{MemoryTokenStore, TokenStore};
