//! Error types for credential exchange.

/// Errors that can occur acquiring, renewing, or revoking credentials.
///
/// This is the user-visible taxonomy: each variant maps to a distinct
/// presentation. Invalid credentials are shown inline on the form, network
/// errors get a retry affordance, an expired session gets its own message
/// (never confused with a wrong password), and a role denial is rendered
/// as an access-denied panel rather than an error toast.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither the remote service nor the local table accepted the
    /// credentials. User-correctable.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The remote service could not be reached, or was reached and failed
    /// for a reason unrelated to the credentials. Transient and retryable.
    #[error("authentication service error: {0}")]
    Network(String),

    /// A refresh was requested but the session carries no refresh token.
    /// Expected for sessions minted by the local fallback — those are
    /// extended by re-stamping, not by a remote exchange.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// An authenticated-only operation was called with no active session.
    /// A flow error in the caller, not something a user can correct.
    #[error("not authenticated")]
    Unauthenticated,

    /// The session timed out or was rejected by the remote service.
    #[error("session expired")]
    SessionExpired,

    /// Authenticated, but the role does not grant access to this area.
    #[error("insufficient privileges for this area")]
    RoleDenied,

    /// The remote service rejected a password change (wrong current
    /// password, weak new password, ...). The service's own wording is
    /// carried verbatim.
    #[error("password change rejected: {0}")]
    PasswordRejected(String),
}
