//! The remote credential backend: talks HTTP to the authentication
//! service.
//!
//! Endpoint contract (relative to a configurable base URL):
//!
//! ```text
//! POST /auth/login            {username, password}        → tokens + user
//! POST /auth/refresh          {refresh_token}             → rotated tokens
//! GET  /auth/verify           (bearer)                    → 200 | 401
//! POST /auth/logout           (bearer)                    → best-effort
//! POST /auth/change-password  {current_password, new_password} (bearer)
//! ```
//!
//! Non-success responses carry a JSON `{detail}` body; the detail is folded
//! into the returned error where it helps the user.

use std::time::Duration;

use dailyops_protocol::{
    ApiErrorBody, ChangePasswordRequest, LoginRequest, LoginResponse,
    RefreshRequest, RefreshResponse,
};
use reqwest::StatusCode;
use tracing::debug;

use crate::{AuthError, CredentialBackend, LoginSuccess, TokenPair};

/// Per-request deadline. Bootstrap revalidation runs through this client,
/// so no call may hang indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A [`CredentialBackend`] backed by the remote authentication service.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    /// Creates a backend for the service at `base_url`
    /// (e.g. `http://localhost:8001/api/v1`). A trailing slash is fine.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            // Static configuration: no TLS overrides, no proxy parsing —
            // construction cannot fail.
            .expect("http client construction");

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Formats a non-auth service failure, folding in the `detail` body when
/// one is present.
async fn service_error(status: StatusCode, resp: reqwest::Response) -> String {
    match resp.json::<ApiErrorBody>().await {
        Ok(body) => format!("service returned {status}: {}", body.detail),
        Err(_) => format!("service returned {status}"),
    }
}

impl CredentialBackend for RemoteBackend {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginSuccess, AuthError> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => {
                let body: LoginResponse = resp.json().await.map_err(|e| {
                    AuthError::Network(format!("malformed login response: {e}"))
                })?;
                Ok(LoginSuccess {
                    access_token: body.access_token,
                    refresh_token: Some(body.refresh_token),
                    user: body.user,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::InvalidCredentials)
            }
            status => Err(AuthError::Network(service_error(status, resp).await)),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let resp = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => {
                let body: RefreshResponse = resp.json().await.map_err(|e| {
                    AuthError::Network(format!("malformed refresh response: {e}"))
                })?;
                Ok(TokenPair {
                    access_token: body.access_token,
                    refresh_token: body.refresh_token,
                })
            }
            // The service no longer accepts this refresh token: the
            // session is over, not merely a transient failure.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::SessionExpired)
            }
            status => Err(AuthError::Network(service_error(status, resp).await)),
        }
    }

    async fn verify(&self, access_token: &str) -> bool {
        let result = self
            .client
            .get(self.url("/auth/verify"))
            .bearer_auth(access_token)
            .send()
            .await;

        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "verify request failed");
                false
            }
        }
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.url("/auth/logout"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(AuthError::Network(
                service_error(resp.status(), resp).await,
            ))
        }
    }

    async fn change_password(
        &self,
        access_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.url("/auth/change-password"))
            .bearer_auth(access_token)
            .json(&ChangePasswordRequest {
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(AuthError::Unauthenticated),
            // Any other client error carries the service's own wording:
            // wrong current password, weak new password, ...
            s if s.is_client_error() => {
                let detail = match resp.json::<ApiErrorBody>().await {
                    Ok(body) => body.detail,
                    Err(_) => format!("rejected with status {s}"),
                };
                Err(AuthError::PasswordRejected(detail))
            }
            status => Err(AuthError::Network(service_error(status, resp).await)),
        }
    }
}
