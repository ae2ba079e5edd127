//! The credential exchange strategy trait.
//!
//! The client core doesn't care WHERE credentials are validated — a remote
//! HTTP service in normal operation, a static in-memory table when that
//! service is unreachable. The [`CredentialBackend`] trait defines the
//! operations; implementations can be swapped, composed, or mocked in
//! tests without touching the session machinery.

use std::future::Future;

use dailyops_protocol::User;

use crate::AuthError;

/// The outcome of a successful login on any backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    /// Bearer credential for authenticated requests.
    pub access_token: String,
    /// Present for remote-backed logins; `None` when the local fallback
    /// minted the session.
    pub refresh_token: Option<String>,
    /// Identity snapshot, password already stripped.
    pub user: User,
}

/// A rotated token pair returned by a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Validates credentials and manages their lifecycle.
///
/// # Trait bounds
///
/// - `Send + Sync` → a backend is shared across async tasks (the facade
///   and the spawned expiry monitor both hold it).
/// - `'static` → it owns its data and lives as long as the application.
///
/// # Example
///
/// ```
/// use dailyops_auth::{AuthError, CredentialBackend, LoginSuccess, TokenPair};
/// use dailyops_protocol::{Role, User, UserId};
///
/// /// Accepts a single development account. Never use outside tests.
/// struct DevBackend;
///
/// impl CredentialBackend for DevBackend {
///     async fn login(
///         &self,
///         username: &str,
///         password: &str,
///     ) -> Result<LoginSuccess, AuthError> {
///         if username == "dev" && password == "dev" {
///             Ok(LoginSuccess {
///                 access_token: "dev-token".into(),
///                 refresh_token: None,
///                 user: User {
///                     id: UserId(0),
///                     username: "dev".into(),
///                     full_name: "Developer".into(),
///                     role: Role::AdminUser,
///                     area: "Development".into(),
///                 },
///             })
///         } else {
///             Err(AuthError::InvalidCredentials)
///         }
///     }
///
///     async fn refresh(&self, _token: &str) -> Result<TokenPair, AuthError> {
///         Err(AuthError::NoRefreshToken)
///     }
///
///     async fn verify(&self, access_token: &str) -> bool {
///         !access_token.is_empty()
///     }
///
///     async fn logout(&self, _access_token: &str) -> Result<(), AuthError> {
///         Ok(())
///     }
///
///     async fn change_password(
///         &self,
///         _access_token: &str,
///         _current: &str,
///         _new: &str,
///     ) -> Result<(), AuthError> {
///         Err(AuthError::Unauthenticated)
///     }
/// }
/// ```
pub trait CredentialBackend: Send + Sync + 'static {
    /// Validates `username`/`password` and returns fresh credentials.
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`] — the credentials were rejected
    /// - [`AuthError::Network`] — the backend could not give a verdict
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginSuccess, AuthError>> + Send;

    /// Exchanges a refresh token for a rotated token pair.
    ///
    /// # Errors
    /// - [`AuthError::SessionExpired`] — the refresh token was rejected
    /// - [`AuthError::NoRefreshToken`] — this backend never issues one
    /// - [`AuthError::Network`] — the exchange could not be performed
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenPair, AuthError>> + Send;

    /// Whether `access_token` is still accepted.
    ///
    /// Never errors: any ambiguity (unreachable service, malformed
    /// response) is reported as `false`. Callers fail closed.
    fn verify(&self, access_token: &str) -> impl Future<Output = bool> + Send;

    /// Notifies the backend that the session is over.
    ///
    /// Best-effort by contract: callers log a failure and clear local
    /// state regardless.
    fn logout(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Changes the account password.
    ///
    /// # Errors
    /// - [`AuthError::PasswordRejected`] — the service refused, with its
    ///   own wording (wrong current password, weak new password, ...)
    /// - [`AuthError::Unauthenticated`] — the bearer token was rejected
    fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;
}
