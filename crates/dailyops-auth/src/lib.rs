//! Credential exchange for the DailyOps client core.
//!
//! This crate answers one question — "are these credentials good, and what
//! tokens do they buy?" — behind the [`CredentialBackend`] strategy trait:
//!
//! 1. [`RemoteBackend`] — the authentication service over HTTP.
//! 2. [`LocalTableBackend`] — a static offline table, cleartext
//!    comparison inherited from the legacy credential list.
//! 3. [`FallbackBackend`] — remote first, local second, for login only.
//!
//! It knows nothing about session persistence or state: callers take the
//! returned tokens and decide what to do with them.

#![allow(async_fn_in_trait)]

mod backend;
mod error;
mod fallback;
mod local;
mod remote;

pub use backend::{CredentialBackend, LoginSuccess, TokenPair};
pub use error::AuthError;
pub use fallback::FallbackBackend;
pub use local::LocalTableBackend;
pub use remote::RemoteBackend;
