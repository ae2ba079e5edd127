//! The session state container: one authoritative state machine for the
//! authentication lifecycle.
//!
//! Every other component observes this machine; none mutates it directly.
//! All changes go through the explicit transition methods below, and a
//! trigger arriving in the wrong phase is ignored (logged at debug), never
//! a panic — that is what makes a stale monitor tick after teardown
//! harmless.
//!
//! ```text
//!                begin_login / begin_restore
//! Unauthenticated ──────────────────────────→ Authenticating
//!       ↑  ↑                                     │      │
//!       │  └──── login_failed / restore_failed ──┘      │ login_succeeded
//!       │                                               │ / restored
//!   logged_out                                          ▼
//!       │                                         Authenticated ⟲ refreshed
//!       │                                               │
//!       └───────────────── Expired ←──── expired ───────┘
//!                 (begin_login also accepted here)
//! ```

use tracing::{debug, info};

// ---------------------------------------------------------------------------
// AuthPhase
// ---------------------------------------------------------------------------

/// The coarse lifecycle phase of the authentication state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    /// No session. Initial phase, and where logouts and failures land.
    #[default]
    Unauthenticated,

    /// A login attempt or bootstrap restoration is in flight.
    Authenticating,

    /// A session is active. The only phase in which the monitor runs.
    Authenticated,

    /// The session lapsed or was force-invalidated. Functionally the same
    /// as `Unauthenticated` but carries a distinct user-facing message so
    /// "your session timed out" is never confused with "wrong password".
    Expired,
}

impl AuthPhase {
    /// Whether this phase can start a fresh login or restoration.
    fn accepts_login(self) -> bool {
        matches!(self, AuthPhase::Unauthenticated | AuthPhase::Expired)
    }
}

/// The message latched when a session is force-invalidated.
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired. Please sign in again.";

// ---------------------------------------------------------------------------
// AuthStateMachine
// ---------------------------------------------------------------------------

/// The single authoritative in-memory authentication state.
///
/// A plain value — owners decide how to share it (the facade keeps it
/// behind a mutex so simultaneous triggers serialize). Deliberately NOT a
/// module-level singleton: tests instantiate isolated machines.
///
/// Each transition method returns whether it applied. Side effects (store
/// writes, monitor start/stop) are the caller's responsibility and should
/// be performed together with the transition.
#[derive(Debug, Default)]
pub struct AuthStateMachine {
    phase: AuthPhase,
    /// User-facing error banner text, if any.
    error: Option<String>,
}

impl AuthStateMachine {
    /// Creates a machine in the initial `Unauthenticated` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// The current user-facing error message, if one is latched.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismisses the error banner.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// A login attempt starts. Accepted from `Unauthenticated`/`Expired`.
    pub fn begin_login(&mut self) -> bool {
        if !self.phase.accepts_login() {
            debug!(phase = ?self.phase, "ignoring begin_login");
            return false;
        }
        self.error = None;
        self.phase = AuthPhase::Authenticating;
        true
    }

    /// A bootstrap restoration starts. Accepted from
    /// `Unauthenticated`/`Expired`.
    pub fn begin_restore(&mut self) -> bool {
        if !self.phase.accepts_login() {
            debug!(phase = ?self.phase, "ignoring begin_restore");
            return false;
        }
        self.error = None;
        self.phase = AuthPhase::Authenticating;
        true
    }

    /// The in-flight login succeeded. `Authenticating` → `Authenticated`.
    pub fn login_succeeded(&mut self) -> bool {
        if self.phase != AuthPhase::Authenticating {
            debug!(phase = ?self.phase, "ignoring login_succeeded");
            return false;
        }
        self.error = None;
        self.phase = AuthPhase::Authenticated;
        info!("login succeeded");
        true
    }

    /// The in-flight login failed. `Authenticating` → `Unauthenticated`
    /// with the given error banner.
    pub fn login_failed(&mut self, message: impl Into<String>) -> bool {
        if self.phase != AuthPhase::Authenticating {
            debug!(phase = ?self.phase, "ignoring login_failed");
            return false;
        }
        self.error = Some(message.into());
        self.phase = AuthPhase::Unauthenticated;
        true
    }

    /// Bootstrap restoration succeeded. `Authenticating` → `Authenticated`
    /// without any prompt.
    pub fn restored(&mut self) -> bool {
        if self.phase != AuthPhase::Authenticating {
            debug!(phase = ?self.phase, "ignoring restored");
            return false;
        }
        self.error = None;
        self.phase = AuthPhase::Authenticated;
        info!("session restored from store");
        true
    }

    /// Bootstrap restoration found nothing usable. Settles in
    /// `Unauthenticated` with no error banner — an absent session at
    /// startup is normal, not a failure.
    pub fn restore_failed(&mut self) -> bool {
        if self.phase != AuthPhase::Authenticating {
            debug!(phase = ?self.phase, "ignoring restore_failed");
            return false;
        }
        self.phase = AuthPhase::Unauthenticated;
        true
    }

    /// Explicit logout. Accepted from any phase — logout is a local
    /// guarantee and must always land in `Unauthenticated`.
    pub fn logged_out(&mut self) -> bool {
        self.error = None;
        self.phase = AuthPhase::Unauthenticated;
        info!("logged out");
        true
    }

    /// Expiry detection or forced invalidation. `Authenticated` →
    /// `Expired`, latching the session-expired banner.
    ///
    /// A stale trigger (monitor tick after teardown, double trip) is a
    /// no-op: the caller must not repeat side effects when this returns
    /// `false`.
    pub fn expired(&mut self) -> bool {
        if self.phase != AuthPhase::Authenticated {
            debug!(phase = ?self.phase, "ignoring expired");
            return false;
        }
        self.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
        self.phase = AuthPhase::Expired;
        info!("session expired");
        true
    }

    /// A successful refresh. Stays `Authenticated`; returns `false` if no
    /// session is active (the refresh result arrived after a teardown).
    pub fn refreshed(&mut self) -> bool {
        if self.phase != AuthPhase::Authenticated {
            debug!(phase = ?self.phase, "ignoring refreshed");
            return false;
        }
        true
    }
}

// =========================================================================
// Tests
// =========================================================================
