//! Error types for the bridge.

use thiserror::Error;

/// Errors that can occur in the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] tessumod_protocol::ProtocolError),

    #[error("User cache error: {0}")]
    UserCache(#[from] tessumod_plugin::UserCacheError),

    #[error("Positional audio tracker stopped")]
    TrackerStopped,
}
