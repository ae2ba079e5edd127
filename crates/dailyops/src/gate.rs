//! The access gate: pure predicates deciding what a user may see.
//!
//! Every function here is stateless and uncached — callers pass the
//! current phase, the freshly loaded session, and the clock. Consulting
//! the gate is cheap by design because it happens at every render of a
//! protected view.

use std::time::SystemTime;

use dailyops_protocol::Role;
use dailyops_session::{AuthPhase, Session};

/// Whether a session record is valid: present and unexpired as of `now`.
///
/// Validity is never cached — recompute on every query.
pub fn session_is_valid(session: Option<&Session>, now: SystemTime) -> bool {
    session.is_some_and(|s| !s.is_expired_at(now))
}

/// Whether the current user may enter admin-only areas.
///
/// False immediately unless the phase is `Authenticated`, the session is
/// valid, and the role grants elevated access. `user.role` is the sole
/// source of authorization truth.
pub fn admin_allowed(
    phase: AuthPhase,
    session: Option<&Session>,
    now: SystemTime,
) -> bool {
    phase == AuthPhase::Authenticated
        && session.is_some_and(|s| {
            !s.is_expired_at(now) && s.user.role.grants_admin()
        })
}

// ---------------------------------------------------------------------------
// Route guarding
// ---------------------------------------------------------------------------

/// What a protected view should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// A login attempt or bootstrap restoration is pending: show a
    /// loading indicator.
    Loading,

    /// No session: render nothing and defer to a redirect.
    RedirectToLogin,

    /// Signed in but the role doesn't grant this area: render the
    /// access-denied affordance (a panel, not an error toast).
    AccessDenied,

    /// Render the protected content.
    Allow,
}

/// Decides what a protected view renders for the given phase and role.
///
/// `role` is the *freshly derived* role of the current user (`None` when
/// unknown); callers must not pass a value captured at login time.
pub fn route_decision(
    phase: AuthPhase,
    role: Option<Role>,
    requires_admin: bool,
) -> RouteDecision {
    match phase {
        AuthPhase::Authenticating => RouteDecision::Loading,
        AuthPhase::Unauthenticated | AuthPhase::Expired => {
            RouteDecision::RedirectToLogin
        }
        AuthPhase::Authenticated => {
            if requires_admin && !role.is_some_and(Role::grants_admin) {
                RouteDecision::AccessDenied
            } else {
                RouteDecision::Allow
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dailyops_protocol::{User, UserId};
    use dailyops_session::SESSION_DURATION;
    use std::time::Duration;

    fn session_with_role(role: Role, issued_at: SystemTime) -> Session {
        Session::new(
            "token".into(),
            None,
            User {
                id: UserId(1),
                username: "u".into(),
                full_name: "U".into(),
                role,
                area: "A".into(),
            },
            issued_at,
            SESSION_DURATION,
        )
    }

    #[test]
    fn test_session_validity_requires_presence_and_freshness() {
        let t0 = SystemTime::UNIX_EPOCH;
        let s = session_with_role(Role::FormUser, t0);

        assert!(!session_is_valid(None, t0));
        assert!(session_is_valid(Some(&s), t0 + Duration::from_secs(60)));
        assert!(!session_is_valid(Some(&s), t0 + SESSION_DURATION));
    }

    #[test]
    fn test_admin_allowed_is_false_for_form_users() {
        // Role monotonicity: a form_user never passes, regardless of
        // anything else about the session.
        let t0 = SystemTime::UNIX_EPOCH;
        let s = session_with_role(Role::FormUser, t0);
        assert!(!admin_allowed(AuthPhase::Authenticated, Some(&s), t0));
    }

    #[test]
    fn test_admin_allowed_for_elevated_roles() {
        let t0 = SystemTime::UNIX_EPOCH;
        for role in [Role::AdminUser, Role::Admin, Role::Supervisor] {
            let s = session_with_role(role, t0);
            assert!(
                admin_allowed(AuthPhase::Authenticated, Some(&s), t0),
                "{role} should grant admin access"
            );
        }
    }

    #[test]
    fn test_admin_allowed_requires_authenticated_phase() {
        let t0 = SystemTime::UNIX_EPOCH;
        let s = session_with_role(Role::AdminUser, t0);
        for phase in [
            AuthPhase::Unauthenticated,
            AuthPhase::Authenticating,
            AuthPhase::Expired,
        ] {
            assert!(!admin_allowed(phase, Some(&s), t0));
        }
    }

    #[test]
    fn test_admin_allowed_rejects_expired_session() {
        let t0 = SystemTime::UNIX_EPOCH;
        let s = session_with_role(Role::AdminUser, t0);
        assert!(!admin_allowed(
            AuthPhase::Authenticated,
            Some(&s),
            t0 + SESSION_DURATION
        ));
    }

    #[test]
    fn test_route_decision_loading_while_authenticating() {
        let d = route_decision(AuthPhase::Authenticating, None, true);
        assert_eq!(d, RouteDecision::Loading);
    }

    #[test]
    fn test_route_decision_redirects_when_signed_out() {
        for phase in [AuthPhase::Unauthenticated, AuthPhase::Expired] {
            let d = route_decision(phase, None, false);
            assert_eq!(d, RouteDecision::RedirectToLogin);
        }
    }

    #[test]
    fn test_route_decision_denies_admin_area_to_form_user() {
        let d = route_decision(
            AuthPhase::Authenticated,
            Some(Role::FormUser),
            true,
        );
        assert_eq!(d, RouteDecision::AccessDenied);
    }

    #[test]
    fn test_route_decision_allows_plain_view_to_any_role() {
        let d = route_decision(
            AuthPhase::Authenticated,
            Some(Role::FormUser),
            false,
        );
        assert_eq!(d, RouteDecision::Allow);
    }

    #[test]
    fn test_route_decision_allows_admin_area_to_elevated_role() {
        let d = route_decision(
            AuthPhase::Authenticated,
            Some(Role::Supervisor),
            true,
        );
        assert_eq!(d, RouteDecision::Allow);
    }

    #[test]
    fn test_route_decision_denies_admin_area_without_known_role() {
        // An admin area with no derivable user errs on the closed side.
        let d = route_decision(AuthPhase::Authenticated, None, true);
        assert_eq!(d, RouteDecision::AccessDenied);
    }
}
