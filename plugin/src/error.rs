//! Error types for the plugin crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the user cache.
#[derive(Error, Debug)]
pub enum UserCacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse user cache {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to serialize user cache: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown chat user: {0}")]
    UnknownChatUser(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(u64),
}
