//! Wire types for the DailyOps authentication API.
//!
//! This crate defines the "language" the client core speaks with the remote
//! authentication service, and the identity types shared across the
//! workspace:
//!
//! - **Types** ([`User`], [`Role`], [`LoginRequest`], ...) — the structures
//!   that travel on the wire and into the persisted session record.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how records are converted
//!   to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing so.
//!
//! The protocol layer knows nothing about HTTP, storage, or session state —
//! it only describes shapes.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ApiErrorBody, ChangePasswordRequest, LoginRequest, LoginResponse,
    RefreshRequest, RefreshResponse, Role, User, UserId,
};
