//! The local credential fallback: a static, in-memory user table.
//!
//! When the remote authentication service is unreachable during login, the
//! reporting tool must stay usable for the handful of accounts that keep
//! operations running. This backend validates against a fixed table and
//! mints a session that carries no refresh token — it can only be extended
//! by re-stamping, never by a remote exchange.
//!
//! Passwords in the table are stored and compared as cleartext. This is a
//! known weakness inherited from the legacy credential list, preserved
//! as-is rather than silently replaced with a hashing scheme the rest of
//! the system doesn't share. The accounts exist only for offline
//! continuity.

use dailyops_protocol::{Role, User, UserId};
use rand::Rng;
use tracing::{info, warn};

use crate::{AuthError, CredentialBackend, LoginSuccess, TokenPair};

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

struct LocalCredential {
    id: u64,
    username: &'static str,
    password: &'static str,
    full_name: &'static str,
    role: Role,
    area: &'static str,
}

/// The fixed offline account list.
const LOCAL_CREDENTIALS: &[LocalCredential] = &[
    LocalCredential {
        id: 1,
        username: "admin.general",
        password: "admin2024",
        full_name: "General Administrator",
        role: Role::AdminUser,
        area: "Administration",
    },
    LocalCredential {
        id: 2,
        username: "ops.north",
        password: "north2024",
        full_name: "Nora Paredes",
        role: Role::FormUser,
        area: "Northern Operations",
    },
    LocalCredential {
        id: 3,
        username: "ops.east",
        password: "east2024",
        full_name: "Elena Duarte",
        role: Role::FormUser,
        area: "Eastern Operations",
    },
    LocalCredential {
        id: 4,
        username: "ops.south",
        password: "south2024",
        full_name: "Samuel Ortiz",
        role: Role::FormUser,
        area: "Southern Operations",
    },
    // Carries the legacy `supervisor` role spelling that older accounts
    // still have; it grants the same elevated access as `admin_user`.
    LocalCredential {
        id: 5,
        username: "supervisor.shift",
        password: "shift2024",
        full_name: "Teresa Valdez",
        role: Role::Supervisor,
        area: "Shift Supervision",
    },
];

impl LocalCredential {
    /// The identity snapshot for this account. The password never leaves
    /// this module — [`User`] has no field for it.
    fn user(&self) -> User {
        User {
            id: UserId(self.id),
            username: self.username.to_string(),
            full_name: self.full_name.to_string(),
            role: self.role,
            area: self.area.to_string(),
        }
    }
}

/// Mints a random 32-character hex access token (128 bits of entropy).
///
/// Local tokens are opaque markers of "this session came from the fallback
/// table" — nothing ever validates them remotely.
fn mint_access_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// LocalTableBackend
// ---------------------------------------------------------------------------

/// A [`CredentialBackend`] over the static offline table.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTableBackend;

impl LocalTableBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialBackend for LocalTableBackend {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginSuccess, AuthError> {
        // Cleartext comparison against the legacy table (see module docs).
        let found = LOCAL_CREDENTIALS
            .iter()
            .find(|c| c.username == username && c.password == password);

        match found {
            Some(credential) => {
                info!(username, "local credential table accepted login");
                Ok(LoginSuccess {
                    access_token: mint_access_token(),
                    refresh_token: None,
                    user: credential.user(),
                })
            }
            None => Err(AuthError::InvalidCredentials),
        }
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair, AuthError> {
        // The table never issues refresh tokens; fallback sessions are
        // extended by re-stamping their timestamps.
        Err(AuthError::NoRefreshToken)
    }

    async fn verify(&self, access_token: &str) -> bool {
        // Degraded verification: nothing remote can vouch for a local
        // token, so "a token exists" is the whole check.
        !access_token.is_empty()
    }

    async fn logout(&self, _access_token: &str) -> Result<(), AuthError> {
        // Nothing to notify.
        Ok(())
    }

    async fn change_password(
        &self,
        _access_token: &str,
        _current_password: &str,
        _new_password: &str,
    ) -> Result<(), AuthError> {
        warn!("password change attempted against the local credential table");
        Err(AuthError::Network(
            "password changes require the remote authentication service".into(),
        ))
    }
}

// =========================================================================
// Tests
// =========================================================================
