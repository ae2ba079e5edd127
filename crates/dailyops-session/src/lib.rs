//! Session management for the DailyOps client core.
//!
//! This crate owns the lifecycle data of a signed-in user:
//!
//! 1. **The session record** ([`Session`], [`SessionConfig`]) — tokens,
//!    user snapshot, issue/expiry timestamps.
//! 2. **Persistence** ([`SessionStore`] trait, [`MemoryStore`],
//!    [`FileStore`]) — a dumb boundary whose contents survive a restart
//!    but not a deliberate clear.
//! 3. **The state container** ([`AuthStateMachine`], [`AuthPhase`]) — the
//!    single authoritative state machine every other component observes.
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)    ← orchestrates transitions, store writes, the monitor
//!     ↕
//! Session (this crate)  ← owns the record, the store, and the phases
//!     ↕
//! Protocol (below)  ← provides User, Role, the codec
//! ```

mod error;
mod session;
mod state;
mod store;

pub use error::StoreError;
pub use session::{SESSION_DURATION, Session, SessionConfig};
pub use state::{AuthPhase, AuthStateMachine, SESSION_EXPIRED_MESSAGE};
pub use store::{FileStore, MemoryStore, SessionStore};
