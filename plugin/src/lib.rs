//! TeamSpeak side of TessuMod.

pub mod error;
pub mod failure;
pub mod positional_audio;
pub mod user_cache;

pub use error::UserCacheError;
pub use failure::{Failure, FailureCode};
pub use positional_audio::{ApplySummary, AudioBackend, PositionalAudio};
pub use tessumod_protocol::{ClientId, PositionalAudioData, Vector3};
pub use user_cache::{spawn_sync, UserCache};
