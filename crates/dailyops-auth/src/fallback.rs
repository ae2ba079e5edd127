//! The composing backend: remote first, local table second — for login
//! only.
//!
//! The "only login falls back" rule is structural here, not a conditional
//! buried in a handler: every operation except `login` delegates to the
//! remote unconditionally. Refresh and verify failing closed is what keeps
//! the system from silently extending a session it cannot confirm.

use tracing::{debug, info, warn};

use crate::{
    AuthError, CredentialBackend, LocalTableBackend, LoginSuccess,
    RemoteBackend, TokenPair,
};

/// A [`CredentialBackend`] that tries the remote service and recovers a
/// failed **login** via the local table.
///
/// Generic over both sides so tests can substitute scripted backends.
#[derive(Debug, Clone)]
pub struct FallbackBackend<R, L> {
    remote: R,
    local: L,
}

impl FallbackBackend<RemoteBackend, LocalTableBackend> {
    /// The standard composition: remote service at `base_url`, static
    /// offline table behind it.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            remote: RemoteBackend::new(base_url),
            local: LocalTableBackend::new(),
        }
    }
}

impl<R, L> FallbackBackend<R, L> {
    /// Composes arbitrary backends. Used by tests.
    pub fn with_backends(remote: R, local: L) -> Self {
        Self { remote, local }
    }
}

impl<R, L> CredentialBackend for FallbackBackend<R, L>
where
    R: CredentialBackend,
    L: CredentialBackend,
{
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginSuccess, AuthError> {
        let remote_err = match self.remote.login(username, password).await {
            Ok(success) => return Ok(success),
            Err(e) => e,
        };

        warn!(
            error = %remote_err,
            "remote login failed, consulting local credential table"
        );

        match self.local.login(username, password).await {
            Ok(success) => {
                info!(username, "login recovered via local fallback");
                Ok(success)
            }
            Err(local_err) => {
                debug!(error = %local_err, "local fallback rejected login");
                // The remote's verdict is the one to surface: a credential
                // rejection is user-correctable, anything else tells the
                // user the service itself is the problem.
                Err(remote_err)
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        // No fallback: a refresh the remote cannot confirm must fail.
        self.remote.refresh(refresh_token).await
    }

    async fn verify(&self, access_token: &str) -> bool {
        // No fallback: ambiguity reads as invalid.
        self.remote.verify(access_token).await
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        self.remote.logout(access_token).await
    }

    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.remote
            .change_password(access_token, current_password, new_password)
            .await
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// A remote that cannot be reached: every operation fails at the
    /// transport level.
    struct UnreachableRemote;

    impl CredentialBackend for UnreachableRemote {
        async fn login(&self, _: &str, _: &str) -> Result<LoginSuccess, AuthError> {
            Err(AuthError::Network("connection refused".into()))
        }
        async fn refresh(&self, _: &str) -> Result<TokenPair, AuthError> {
            Err(AuthError::Network("connection refused".into()))
        }
        async fn verify(&self, _: &str) -> bool {
            false
        }
        async fn logout(&self, _: &str) -> Result<(), AuthError> {
            Err(AuthError::Network("connection refused".into()))
        }
        async fn change_password(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<(), AuthError> {
            Err(AuthError::Network("connection refused".into()))
        }
    }

    /// A reachable remote that rejects every credential.
    struct RejectingRemote;

    impl CredentialBackend for RejectingRemote {
        async fn login(&self, _: &str, _: &str) -> Result<LoginSuccess, AuthError> {
            Err(AuthError::InvalidCredentials)
        }
        async fn refresh(&self, _: &str) -> Result<TokenPair, AuthError> {
            Err(AuthError::SessionExpired)
        }
        async fn verify(&self, _: &str) -> bool {
            false
        }
        async fn logout(&self, _: &str) -> Result<(), AuthError> {
            Ok(())
        }
        async fn change_password(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<(), AuthError> {
            Err(AuthError::PasswordRejected("wrong current password".into()))
        }
    }

    fn unreachable() -> FallbackBackend<UnreachableRemote, LocalTableBackend> {
        FallbackBackend::with_backends(UnreachableRemote, LocalTableBackend::new())
    }

    #[tokio::test]
    async fn test_login_recovers_via_local_table_when_remote_is_down() {
        // Fallback transparency: the user never learns the remote was
        // unreachable when the offline table accepts them.
        let backend = unreachable();

        let success = backend
            .login("admin.general", "admin2024")
            .await
            .expect("offline login should succeed");

        assert_eq!(success.user.full_name, "General Administrator");
        assert!(success.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_login_surfaces_remote_error_when_both_reject() {
        // Remote unreachable AND the credentials aren't in the table:
        // the transport failure is the honest answer.
        let backend = unreachable();
        let result = backend.login("someone", "wrong").await;
        assert!(matches!(result, Err(AuthError::Network(_))));
    }

    #[tokio::test]
    async fn test_login_surfaces_invalid_credentials_from_remote() {
        let backend =
            FallbackBackend::with_backends(RejectingRemote, LocalTableBackend::new());
        let result = backend.login("someone", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_never_falls_back() {
        // The local table would answer NoRefreshToken; getting the
        // remote's transport error proves the table was never consulted.
        let backend = unreachable();
        let result = backend.refresh("some-refresh-token").await;
        assert!(matches!(result, Err(AuthError::Network(_))));
    }

    #[tokio::test]
    async fn test_verify_never_falls_back() {
        // The local table would say "true" for a non-empty token; the
        // composed answer must be the remote's "false".
        let backend = unreachable();
        assert!(!backend.verify("locally-minted-token").await);
    }

    #[tokio::test]
    async fn test_change_password_delegates_to_remote() {
        let backend =
            FallbackBackend::with_backends(RejectingRemote, LocalTableBackend::new());
        let result = backend.change_password("tok", "old", "new").await;
        assert!(matches!(result, Err(AuthError::PasswordRejected(_))));
    }
}
