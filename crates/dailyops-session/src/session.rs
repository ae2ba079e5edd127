//! Session types: the data that represents one authenticated user context.
//!
//! A "session" is the client's record of a signed-in user. It tracks:
//! - WHO the user is (a denormalized [`User`] snapshot)
//! - HOW requests are authorized (the bearer `access_token`)
//! - WHETHER it can be renewed without re-prompting (`refresh_token`)
//! - WHEN it was issued and when it lapses (`issued_at` / `expires_at`)

use std::time::{Duration, SystemTime};

use dailyops_protocol::User;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// How long a session lives from issue to expiry: 8 hours.
pub const SESSION_DURATION: Duration = Duration::from_secs(8 * 60 * 60);

/// Configuration for session lifetime behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of a session from issue (or re-stamp) to expiry.
    ///
    /// Default: [`SESSION_DURATION`] (8 hours).
    pub session_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_duration: SESSION_DURATION,
        }
    }
}

impl SessionConfig {
    /// Fixes any out-of-range values so the config is safe to use.
    ///
    /// A zero duration would make every session expired at birth and
    /// violate `expires_at > issued_at`; it is replaced by the default.
    pub fn validated(mut self) -> Self {
        if self.session_duration.is_zero() {
            warn!("session_duration is zero — falling back to 8 hours");
            self.session_duration = SESSION_DURATION;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One authenticated user context.
///
/// Created by a successful login or a bootstrap restoration, mutated only
/// by a successful refresh (new tokens, new timestamps, same user), and
/// destroyed by logout, expiry, failed revalidation, or failed refresh.
///
/// Timestamps are wall-clock [`SystemTime`] because the record is persisted
/// across process restarts. Expiry helpers take `now` as a parameter so
/// callers decide the clock and tests can probe arbitrary instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer credential for authenticated requests. Non-empty.
    pub access_token: String,

    /// Credential for minting a new access token without re-prompting.
    ///
    /// Present only for remote-backed sessions. A session minted by the
    /// local credential fallback carries `None` and can only be extended
    /// by re-stamping its timestamps.
    pub refresh_token: Option<String>,

    /// Identity snapshot captured at login time.
    pub user: User,

    /// When this session was issued (or last re-stamped).
    pub issued_at: SystemTime,

    /// `issued_at + session_duration`. Always after `issued_at`.
    pub expires_at: SystemTime,
}

impl Session {
    /// Creates a session issued at `now`, expiring `duration` later.
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        user: User,
        now: SystemTime,
        duration: Duration,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            user,
            issued_at: now,
            expires_at: now + duration,
        }
    }

    /// Whether this session was issued by the remote service.
    ///
    /// Remote-backed sessions carry a refresh token; fallback sessions
    /// don't.
    pub fn is_remote_backed(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Whether the session has lapsed as of `now`.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }

    /// Time remaining until expiry as of `now`. Zero once expired.
    pub fn time_left_at(&self, now: SystemTime) -> Duration {
        self.expires_at
            .duration_since(now)
            .unwrap_or(Duration::ZERO)
    }

    /// Re-stamps the lifetime: issued `now`, expiring `duration` later.
    ///
    /// Tokens and user are untouched. Used after a successful refresh and
    /// for extending fallback sessions that have no refresh token.
    pub fn restamp(&mut self, now: SystemTime, duration: Duration) {
        self.issued_at = now;
        self.expires_at = now + duration;
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dailyops_protocol::{Role, UserId};

    fn user() -> User {
        User {
            id: UserId(1),
            username: "ops.north".into(),
            full_name: "Nora Paredes".into(),
            role: Role::FormUser,
            area: "Northern Operations".into(),
        }
    }

    fn session_at(now: SystemTime) -> Session {
        Session::new("tok".into(), None, user(), now, SESSION_DURATION)
    }

    #[test]
    fn test_new_session_is_not_expired() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let s = session_at(now);
        assert!(!s.is_expired_at(now));
        assert_eq!(s.time_left_at(now), SESSION_DURATION);
        assert!(s.expires_at > s.issued_at);
    }

    #[test]
    fn test_session_expires_exactly_at_duration() {
        // Expired iff now - issued_at >= duration: the boundary instant
        // itself already counts as expired.
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let s = session_at(now);

        let just_before = now + SESSION_DURATION - Duration::from_secs(1);
        assert!(!s.is_expired_at(just_before));

        let at_boundary = now + SESSION_DURATION;
        assert!(s.is_expired_at(at_boundary));
        assert_eq!(s.time_left_at(at_boundary), Duration::ZERO);

        let well_past = now + SESSION_DURATION + Duration::from_secs(3600);
        assert!(s.is_expired_at(well_past));
    }

    #[test]
    fn test_restamp_renews_lifetime_and_keeps_identity() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let mut s = session_at(t0);
        let later = t0 + Duration::from_secs(7 * 3600);

        s.restamp(later, SESSION_DURATION);

        assert_eq!(s.issued_at, later);
        assert_eq!(s.expires_at, later + SESSION_DURATION);
        assert_eq!(s.user, user());
        assert!(!s.is_expired_at(later + SESSION_DURATION - Duration::from_secs(1)));
    }

    #[test]
    fn test_remote_backed_tracks_refresh_token() {
        let now = SystemTime::UNIX_EPOCH;
        let local = session_at(now);
        assert!(!local.is_remote_backed());

        let remote = Session::new(
            "at".into(),
            Some("rt".into()),
            user(),
            now,
            SESSION_DURATION,
        );
        assert!(remote.is_remote_backed());
    }

    #[test]
    fn test_config_validated_rejects_zero_duration() {
        let cfg = SessionConfig {
            session_duration: Duration::ZERO,
        }
        .validated();
        assert_eq!(cfg.session_duration, SESSION_DURATION);
    }
}
