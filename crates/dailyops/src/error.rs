//! Unified error type for the DailyOps client core.

use dailyops_auth::AuthError;
use dailyops_session::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `dailyops` facade, callers deal with this single type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DailyopsError {
    /// A credential-exchange error (login, refresh, password change).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A session-persistence error (read, write, codec).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DailyopsError {
    /// The credential-exchange error inside, if that is what this is.
    ///
    /// UI code branches on the auth taxonomy (inline message vs. retry
    /// affordance vs. access-denied panel); store errors all render the
    /// same way.
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            DailyopsError::Auth(e) => Some(e),
            DailyopsError::Store(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_auth_error() {
        let err: DailyopsError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, DailyopsError::Auth(_)));
        assert_eq!(err.to_string(), "invalid username or password");
    }

    #[test]
    fn test_from_store_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "ro");
        let err: DailyopsError = StoreError::Write(io).into();
        assert!(matches!(err, DailyopsError::Store(_)));
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_as_auth_exposes_the_taxonomy() {
        let err: DailyopsError = AuthError::SessionExpired.into();
        assert!(matches!(err.as_auth(), Some(AuthError::SessionExpired)));

        let io = std::io::Error::other("disk gone");
        let err: DailyopsError = StoreError::Read(io).into();
        assert!(err.as_auth().is_none());
    }
}
