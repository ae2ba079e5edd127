//! Core types for the DailyOps authentication API.
//!
//! This module defines every structure that crosses the wire between the
//! client core and the remote authentication service, plus the identity
//! types ([`User`], [`Role`]) that the rest of the workspace builds on.
//!
//! Field names match the remote contract exactly (`access_token`,
//! `refresh_token`, `current_password`, ...) so the default serde
//! derivation produces the right JSON without per-field renames.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user account.
///
/// A newtype wrapper over `u64`: you can't accidentally pass a raw number
/// where a user id is expected, and `fn lookup(id: UserId)` reads better
/// than `fn lookup(id: u64)`.
///
/// `#[serde(transparent)]` serializes this as the bare number, so
/// `UserId(4)` becomes `4` in JSON, not `{ "0": 4 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role — the sole source of authorization truth
// ---------------------------------------------------------------------------

/// A user's role, as carried on the wire and in the persisted session.
///
/// Two roles are current: `form_user` (may submit daily reports) and
/// `admin_user` (may also browse the aggregated admin views). The `admin`
/// and `supervisor` names are legacy spellings that older accounts still
/// carry; they grant the same elevated access as `admin_user`.
///
/// The legacy names are kept as distinct variants rather than folded into
/// [`Role::AdminUser`] at deserialization time, so a restored session
/// round-trips byte-for-byte. Authorization decisions go through
/// [`Role::grants_admin`] — nothing else may grant elevated access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May fill in and submit daily reports.
    FormUser,
    /// May submit reports and access the admin panel.
    AdminUser,
    /// Legacy spelling of an elevated role. Treated like `AdminUser`.
    Admin,
    /// Legacy spelling of an elevated role. Treated like `AdminUser`.
    Supervisor,
}

impl Role {
    /// Whether this role grants access to admin-only areas.
    pub fn grants_admin(self) -> bool {
        matches!(self, Role::AdminUser | Role::Admin | Role::Supervisor)
    }

    /// The wire spelling of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::FormUser => "form_user",
            Role::AdminUser => "admin_user",
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// User — identity snapshot captured at login
// ---------------------------------------------------------------------------

/// Identity and authorization facts for one account.
///
/// This is the denormalized snapshot stored in the session at login time.
/// It deliberately has no password field: credential material never leaves
/// the backend that validated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account identifier.
    pub id: UserId,
    /// Unique login name (the lookup key).
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Authorization role. See [`Role::grants_admin`].
    pub role: Role,
    /// Organizational label (site, department). Not security-relevant.
    pub area: String,
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// `POST /auth/login` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/login` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// `POST /auth/refresh` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `POST /auth/refresh` success response. Both tokens rotate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// `POST /auth/change-password` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Error body returned by the remote service on non-success responses.
///
/// The service reports a single human-readable `detail` string (wrong
/// current password, weak new password, inactive account, ...). Surfaced
/// verbatim to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

// =========================================================================
// Tests
// =========================================================================
