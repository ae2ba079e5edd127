//! Error types for session persistence.

use dailyops_protocol::ProtocolError;

/// Errors that can occur reading or writing the session store.
///
/// The store is a dumb persistence boundary, so everything here is either
/// I/O or (de)serialization of the single session record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the persisted record failed.
    #[error("session store read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Writing or clearing the persisted record failed.
    #[error("session store write failed: {0}")]
    Write(#[source] std::io::Error),

    /// The record could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] ProtocolError),
}
