//! `appgate-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod app_key;
pub mod subject;

pub use app_key::AppKey;
pub use subject::Subject;
