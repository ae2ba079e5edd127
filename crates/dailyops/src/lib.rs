//! # DailyOps client core
//!
//! The session and access-control lifecycle manager for the DailyOps
//! reporting suite: acquires, persists, periodically revalidates,
//! refreshes, and revokes an authentication session, gates features by
//! role, and degrades to a local credential table when the remote
//! authentication service is unreachable during login.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use dailyops::prelude::*;
//!
//! # async fn run() -> Result<(), DailyopsError> {
//! let manager = AuthManager::new(
//!     FallbackBackend::new("http://localhost:8001/api/v1"),
//!     FileStore::new("dailyops-session.json"),
//! );
//!
//! // Restore a previous session, or prompt for credentials.
//! if !manager.bootstrap().await {
//!     let user = manager.login("admin.general", "admin2024").await?;
//!     println!("welcome, {}", user.full_name);
//! }
//!
//! if manager.has_admin_access().await {
//!     // render the admin panel
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod gate;
mod service;

pub use error::DailyopsError;
pub use gate::RouteDecision;
pub use service::{AuthManager, SessionInfo};

/// One-stop imports for applications embedding the core.
pub mod prelude {
    pub use crate::gate::{self, RouteDecision};
    pub use crate::{AuthManager, DailyopsError, SessionInfo};
    pub use dailyops_auth::{
        AuthError, CredentialBackend, FallbackBackend, LocalTableBackend,
        LoginSuccess, RemoteBackend, TokenPair,
    };
    pub use dailyops_monitor::MonitorConfig;
    pub use dailyops_protocol::{Role, User, UserId};
    pub use dailyops_session::{
        AuthPhase, FileStore, MemoryStore, SESSION_DURATION, Session,
        SessionConfig, SessionStore,
    };
}
