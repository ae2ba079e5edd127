//! `AuthManager`: the facade that owns the authentication lifecycle.
//!
//! Ties together all the layers: credential backend → session store →
//! state machine → expiry monitor. Surrounding collaborators (forms,
//! dashboards, routing) talk only to this type.
//!
//! # Concurrency
//!
//! The state machine lives behind a `tokio::sync::Mutex`; every
//! transition-plus-side-effect unit is applied while holding it, so
//! simultaneous triggers (a login resolving, a monitor check, a logout
//! click) serialize — they are processed one after another, never merged.
//! Network calls are made without the lock so a slow backend never blocks
//! gate queries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

use dailyops_auth::{AuthError, CredentialBackend};
use dailyops_monitor::{ExpiryScheduler, MonitorConfig, MonitorHandle};
use dailyops_protocol::User;
use dailyops_session::{
    AuthPhase, AuthStateMachine, Session, SessionConfig, SessionStore,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::gate::{self, RouteDecision};
use crate::DailyopsError;

// ---------------------------------------------------------------------------
// SessionInfo
// ---------------------------------------------------------------------------

/// A snapshot of the current session's lifetime, for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// When the session was issued (or last re-stamped).
    pub started_at: SystemTime,
    /// When it lapses.
    pub expires_at: SystemTime,
    /// Time remaining at the moment of the query. Zero once expired.
    pub time_left: Duration,
    /// Whether it has already lapsed.
    pub is_expired: bool,
}

// ---------------------------------------------------------------------------
// AuthManager
// ---------------------------------------------------------------------------

struct Inner<B, S> {
    backend: B,
    store: S,
    session_config: SessionConfig,
    monitor_config: MonitorConfig,
    machine: Mutex<AuthStateMachine>,
    /// Set for the duration of a pending refresh; the monitor skips its
    /// expiry check while this holds, so a session mid-renewal is never
    /// torn down underneath the renewal.
    refresh_in_flight: AtomicBool,
    /// The stop handle of the currently running monitor, if any.
    monitor: std::sync::Mutex<Option<MonitorHandle>>,
}

/// The session and access-control lifecycle manager.
///
/// Cheap to clone (`Arc` inside); clones observe the same session. An
/// `AuthManager` is an injected value — construct one per application (or
/// per test) rather than reaching for a global.
pub struct AuthManager<B, S> {
    inner: Arc<Inner<B, S>>,
}

impl<B, S> Clone for AuthManager<B, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B, S> AuthManager<B, S>
where
    B: CredentialBackend,
    S: SessionStore,
{
    /// Creates a manager with default session and monitor configuration
    /// (8-hour sessions, 60-second expiry checks).
    pub fn new(backend: B, store: S) -> Self {
        Self::with_config(
            backend,
            store,
            SessionConfig::default(),
            MonitorConfig::default(),
        )
    }

    /// Creates a manager with explicit configuration.
    pub fn with_config(
        backend: B,
        store: S,
        session_config: SessionConfig,
        monitor_config: MonitorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                store,
                session_config: session_config.validated(),
                monitor_config: monitor_config.validated(),
                machine: Mutex::new(AuthStateMachine::new()),
                refresh_in_flight: AtomicBool::new(false),
                monitor: std::sync::Mutex::new(None),
            }),
        }
    }

    // -- Lifecycle operations ---------------------------------------------

    /// Restores a persisted session at application start.
    ///
    /// Loads the store; if a record is present and unexpired it is
    /// revalidated (remote-backed sessions ask the service, fallback
    /// sessions are accepted on structural presence) and the manager goes
    /// straight to `Authenticated` without prompting. Anything else —
    /// absent record, lapsed record, rejected token, store error — clears
    /// the store and settles in `Unauthenticated`. Bounded by the
    /// backend's request timeout; never blocks indefinitely.
    ///
    /// Returns whether a session was restored.
    pub async fn bootstrap(&self) -> bool {
        if !self.inner.machine.lock().await.begin_restore() {
            debug!("bootstrap ignored: not in a signed-out phase");
            return false;
        }

        match self.try_restore().await {
            Ok(true) => {
                self.inner.machine.lock().await.restored();
                self.start_monitor();
                true
            }
            Ok(false) => {
                self.settle_unrestored().await;
                false
            }
            Err(e) => {
                warn!(error = %e, "bootstrap restoration failed");
                self.settle_unrestored().await;
                false
            }
        }
    }

    /// Validates credentials and opens a session.
    ///
    /// On success from either backend path the store is populated and the
    /// authenticated [`User`] (no password material) is returned. On
    /// failure the error banner is latched for
    /// [`last_error`](Self::last_error) and the taxonomy error is
    /// returned.
    ///
    /// Signing in over a live session replaces it: the previous session
    /// is torn down locally first.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, DailyopsError> {
        {
            let mut machine = self.inner.machine.lock().await;
            if machine.phase() == AuthPhase::Authenticated {
                machine.logged_out();
                self.stop_monitor();
                if let Err(e) = self.inner.store.clear().await {
                    warn!(error = %e, "failed to clear the previous session");
                }
            }
            if !machine.begin_login() {
                // Only reachable while another attempt is mid-flight.
                debug!("login attempt already in flight");
                return Err(AuthError::Unauthenticated.into());
            }
        }

        match self.inner.backend.login(username, password).await {
            Ok(success) => {
                let user = success.user.clone();
                let session = Session::new(
                    success.access_token,
                    success.refresh_token,
                    success.user,
                    SystemTime::now(),
                    self.inner.session_config.session_duration,
                );

                let mut machine = self.inner.machine.lock().await;
                if let Err(e) = self.inner.store.save(&session).await {
                    machine.login_failed(e.to_string());
                    return Err(e.into());
                }
                machine.login_succeeded();
                drop(machine);

                self.start_monitor();
                info!(
                    username = %user.username,
                    role = %user.role,
                    area = %user.area,
                    "signed in"
                );
                Ok(user)
            }
            Err(e) => {
                self.inner.machine.lock().await.login_failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Signs out.
    ///
    /// The remote service is notified best-effort — a failure there is
    /// logged, never surfaced — and the store is cleared unconditionally.
    /// Logout is a local guarantee: when this returns, the machine is
    /// `Unauthenticated` and the monitor is stopped, even if clearing the
    /// store reported an error (which is still returned for visibility).
    pub async fn logout(&self) -> Result<(), DailyopsError> {
        match self.inner.store.load().await {
            Ok(Some(session)) => {
                if let Err(e) =
                    self.inner.backend.logout(&session.access_token).await
                {
                    warn!(error = %e, "remote logout notification failed");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "could not read session for logout notification");
            }
        }

        let mut machine = self.inner.machine.lock().await;
        machine.logged_out();
        self.stop_monitor();
        let cleared = self.inner.store.clear().await;
        drop(machine);

        cleared?;
        Ok(())
    }

    /// Force-invalidates the session (expiry detection, external 401).
    ///
    /// Transitions to `Expired` with its distinct user-facing message,
    /// clears the store, and stops the monitor. Idempotent: a stale
    /// trigger after teardown performs no side effects.
    pub async fn force_logout(&self) {
        let mut machine = self.inner.machine.lock().await;
        if !machine.expired() {
            return;
        }
        self.stop_monitor();
        if let Err(e) = self.inner.store.clear().await {
            warn!(error = %e, "failed to clear store after expiry");
        }
    }

    /// Extends the current session.
    ///
    /// Remote-backed sessions exchange their refresh token for a rotated
    /// pair; fallback sessions (no refresh token) are re-stamped in place.
    /// A failed remote refresh fails closed: the session is force-logged
    /// out before the error is re-raised — callers must not assume a
    /// failed refresh leaves the session intact.
    pub async fn extend_session(&self) -> Result<(), DailyopsError> {
        if self.inner.machine.lock().await.phase() != AuthPhase::Authenticated {
            return Err(AuthError::Unauthenticated.into());
        }
        let Some(mut session) = self.inner.store.load().await? else {
            return Err(AuthError::Unauthenticated.into());
        };

        // Suppress the monitor's expiry trip while the renewal settles.
        self.inner.refresh_in_flight.store(true, Ordering::SeqCst);
        let result = self.renew(&mut session).await;
        self.inner.refresh_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn renew(&self, session: &mut Session) -> Result<(), DailyopsError> {
        let now = SystemTime::now();
        let duration = self.inner.session_config.session_duration;

        match session.refresh_token.clone() {
            None => {
                // Fallback-minted session: nothing to exchange remotely.
                session.restamp(now, duration);
                let mut machine = self.inner.machine.lock().await;
                self.inner.store.save(session).await?;
                machine.refreshed();
                debug!("fallback session re-stamped");
                Ok(())
            }
            Some(refresh_token) => {
                match self.inner.backend.refresh(&refresh_token).await {
                    Ok(pair) => {
                        session.access_token = pair.access_token;
                        session.refresh_token = Some(pair.refresh_token);
                        session.restamp(now, duration);

                        let mut machine = self.inner.machine.lock().await;
                        self.inner.store.save(session).await?;
                        machine.refreshed();
                        info!("session extended");
                        Ok(())
                    }
                    Err(e) => {
                        // Fail closed: a session the service won't confirm
                        // is over.
                        warn!(error = %e, "refresh failed — forcing logout");
                        self.force_logout().await;
                        Err(e.into())
                    }
                }
            }
        }
    }

    /// Changes the account password.
    ///
    /// Requires an active session. The remote's rejection is surfaced
    /// verbatim, and the session is untouched either way.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DailyopsError> {
        if self.inner.machine.lock().await.phase() != AuthPhase::Authenticated {
            return Err(AuthError::Unauthenticated.into());
        }
        let Some(session) = self.inner.store.load().await? else {
            return Err(AuthError::Unauthenticated.into());
        };

        self.inner
            .backend
            .change_password(&session.access_token, current_password, new_password)
            .await?;
        info!("password changed");
        Ok(())
    }

    // -- Access gate -------------------------------------------------------

    /// The current lifecycle phase.
    pub async fn phase(&self) -> AuthPhase {
        self.inner.machine.lock().await.phase()
    }

    /// Whether a valid session is active right now.
    ///
    /// Recomputed on every call: authenticated phase AND a fresh store
    /// read showing an unexpired record.
    pub async fn is_authenticated(&self) -> bool {
        if self.inner.machine.lock().await.phase() != AuthPhase::Authenticated {
            return false;
        }
        let session = self.inner.store.load().await.ok().flatten();
        gate::session_is_valid(session.as_ref(), SystemTime::now())
    }

    /// Whether the current user may enter admin-only areas.
    ///
    /// Re-derives the user from the store on every call — never from a
    /// value captured earlier. Doubles as a lazy expiry trip-wire: if the
    /// check finds the session lapsed (or gone), it forces a logout before
    /// answering `false`.
    pub async fn has_admin_access(&self) -> bool {
        if self.inner.machine.lock().await.phase() != AuthPhase::Authenticated {
            return false;
        }
        match self.inner.store.load().await {
            Ok(Some(session))
                if !session.is_expired_at(SystemTime::now()) =>
            {
                session.user.role.grants_admin()
            }
            _ => {
                self.force_logout().await;
                false
            }
        }
    }

    /// Errors unless the current user may enter admin-only areas.
    ///
    /// The `RoleDenied` variant renders as an access-denied panel; the
    /// `Unauthenticated` variant defers to a redirect.
    pub async fn require_admin(&self) -> Result<(), DailyopsError> {
        if !self.is_authenticated().await {
            return Err(AuthError::Unauthenticated.into());
        }
        if !self.has_admin_access().await {
            return Err(AuthError::RoleDenied.into());
        }
        Ok(())
    }

    /// What a protected view should render right now.
    pub async fn route_decision(&self, requires_admin: bool) -> RouteDecision {
        let phase = self.inner.machine.lock().await.phase();
        let role = match phase {
            AuthPhase::Authenticated => {
                self.current_user().await.map(|u| u.role)
            }
            _ => None,
        };
        gate::route_decision(phase, role, requires_admin)
    }

    // -- Introspection -----------------------------------------------------

    /// The current user, freshly read from the store.
    pub async fn current_user(&self) -> Option<User> {
        self.inner
            .store
            .load()
            .await
            .ok()
            .flatten()
            .map(|s| s.user)
    }

    /// Lifetime details of the current session, if one is stored.
    pub async fn session_info(&self) -> Option<SessionInfo> {
        let session = self.inner.store.load().await.ok().flatten()?;
        let now = SystemTime::now();
        Some(SessionInfo {
            started_at: session.issued_at,
            expires_at: session.expires_at,
            time_left: session.time_left_at(now),
            is_expired: session.is_expired_at(now),
        })
    }

    /// The latched user-facing error banner, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.machine.lock().await.error().map(String::from)
    }

    /// Dismisses the error banner.
    pub async fn clear_error(&self) {
        self.inner.machine.lock().await.clear_error();
    }

    // -- Internals ---------------------------------------------------------

    async fn try_restore(&self) -> Result<bool, DailyopsError> {
        let Some(session) = self.inner.store.load().await? else {
            return Ok(false);
        };
        if session.is_expired_at(SystemTime::now()) {
            debug!("stored session already lapsed");
            return Ok(false);
        }
        // Remote-backed sessions are revalidated against the service.
        // A fallback session carries everything the degraded check needs:
        // a loaded record structurally has both token and user.
        if session.is_remote_backed()
            && !self.inner.backend.verify(&session.access_token).await
        {
            debug!("stored session rejected by the service");
            return Ok(false);
        }
        info!(username = %session.user.username, "session restored");
        Ok(true)
    }

    async fn settle_unrestored(&self) {
        if let Err(e) = self.inner.store.clear().await {
            warn!(error = %e, "failed to clear store during bootstrap");
        }
        self.inner.machine.lock().await.restore_failed();
    }

    /// Starts the expiry monitor loop, if one isn't already running.
    ///
    /// The loop re-reads the store each check — expiry is always computed
    /// from the persisted timestamp, never from a cached flag — and trips
    /// [`force_logout`](Self::force_logout) once `now` passes it. A check
    /// firing while a refresh is in flight is skipped.
    fn start_monitor(&self) {
        let mut slot = self
            .inner
            .monitor
            .lock()
            .expect("monitor mutex poisoned");
        if let Some(handle) = slot.as_ref() {
            if !handle.is_stopped() {
                return;
            }
        }

        let (mut scheduler, handle) =
            ExpiryScheduler::new(self.inner.monitor_config.clone());
        *slot = Some(handle);
        drop(slot);

        let manager = self.clone();
        tokio::spawn(async move {
            while scheduler.wait_for_check().await.is_some() {
                if manager.inner.refresh_in_flight.load(Ordering::SeqCst) {
                    debug!("expiry check skipped: refresh in flight");
                    continue;
                }

                let expired = match manager.inner.store.load().await {
                    Ok(Some(session)) => {
                        session.is_expired_at(SystemTime::now())
                    }
                    // A vanished record leaves nothing to keep alive.
                    Ok(None) => true,
                    Err(e) => {
                        warn!(error = %e, "expiry check could not read the store");
                        false
                    }
                };

                if expired {
                    manager.force_logout().await;
                    break;
                }
            }
            debug!("expiry monitor loop ended");
        });
    }

    /// Stops the running monitor, if any. Idempotent; stopping a monitor
    /// whose loop already ended is a no-op.
    fn stop_monitor(&self) {
        let handle = self
            .inner
            .monitor
            .lock()
            .expect("monitor mutex poisoned")
            .take();
        if let Some(handle) = handle {
            handle.stop();
        }
    }
}
