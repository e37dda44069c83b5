//! Wire model for positional audio snapshots exchanged between the game mod
//! and the voice client plugin.

mod error;
pub mod io;
mod positional;
mod vector;

pub use error::ProtocolError;
pub use positional::{
    ClientId, PositionalAudioData, ENTRY_SIZE, HEADER_SIZE, POSITIONAL_AUDIO_VERSION,
};
pub use vector::{Vector3, VECTOR_SIZE};
