use std::collections::BTreeMap;
use std::fmt;

use crate::error::ProtocolError;
use crate::io::{Reader, Writer};
use crate::vector::{Vector3, VECTOR_SIZE};

/// Voice client identifier of a speaker.
pub type ClientId = u16;

/// The only layout version currently published by the game mod.
pub const POSITIONAL_AUDIO_VERSION: u16 = 1;

/// Bytes preceding the client table: version, camera pose and client count.
pub const HEADER_SIZE: usize = 2 + 2 * VECTOR_SIZE + 1;

/// Bytes of one client table entry.
pub const ENTRY_SIZE: usize = 2 + VECTOR_SIZE;

/// One positional audio update: where the listener's camera is and where
/// every speaking client is located.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionalAudioData {
    pub version: u16,
    pub camera_position: Vector3,
    pub camera_direction: Vector3,
    pub client_positions: BTreeMap<ClientId, Vector3>,
}

impl PositionalAudioData {
    /// Creates an empty snapshot of the current version.
    #[must_use]
    pub fn new(camera_position: Vector3, camera_direction: Vector3) -> Self {
        Self {
            version: POSITIONAL_AUDIO_VERSION,
            camera_position,
            camera_direction,
            client_positions: BTreeMap::new(),
        }
    }

    /// Builder-style helper for adding a client position.
    #[must_use]
    pub fn with_client(mut self, id: ClientId, position: Vector3) -> Self {
        self.client_positions.insert(id, position);
        self
    }

    /// Position of `id` relative to the camera.
    #[must_use]
    pub fn relative_position(&self, id: ClientId) -> Option<Vector3> {
        self.client_positions
            .get(&id)
            .map(|position| *position - self.camera_position)
    }

    /// Encode the snapshot to wire format.
    ///
    /// Format: `[version: u16][camera_position][camera_direction][count: u8][(id: u16, position)...]`,
    /// little-endian, vectors as three `f32`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::TooManyClients`] if the table holds more than 255 entries.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let count = u8::try_from(self.client_positions.len())
            .map_err(|_| ProtocolError::TooManyClients(self.client_positions.len()))?;

        let mut w = Writer::with_capacity(HEADER_SIZE + usize::from(count) * ENTRY_SIZE);
        w.write_u16(self.version);
        self.camera_position.write(&mut w);
        self.camera_direction.write(&mut w);
        w.write_u8(count);
        for (id, position) in &self.client_positions {
            w.write_u16(*id);
            position.write(&mut w);
        }
        Ok(w.into_vec())
    }

    /// Decode a snapshot from wire format.
    ///
    /// Returns the decoded snapshot and the number of bytes consumed; bytes after
    /// the client table are left untouched. A repeated client id replaces the
    /// earlier entry.
    ///
    /// # Errors
    /// Returns [`ProtocolError::PacketTooShort`] if the buffer ends before the
    /// client table does, or [`ProtocolError::UnsupportedVersion`] for an unknown
    /// layout version.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), ProtocolError> {
        let mut r = Reader::new(buf);

        let version = r.read_u16()?;
        if version != POSITIONAL_AUDIO_VERSION {
            return Err(ProtocolError::UnsupportedVersion(version));
        }

        let camera_position = Vector3::read(&mut r)?;
        let camera_direction = Vector3::read(&mut r)?;
        let count = usize::from(r.read_u8()?);

        let table_len = count * ENTRY_SIZE;
        if r.remaining().len() < table_len {
            return Err(ProtocolError::PacketTooShort {
                expected: r.position() + table_len,
                got: buf.len(),
            });
        }

        let mut client_positions = BTreeMap::new();
        for _ in 0..count {
            let id = r.read_u16()?;
            let position = Vector3::read(&mut r)?;
            client_positions.insert(id, position);
        }

        let data = Self {
            version,
            camera_position,
            camera_direction,
            client_positions,
        };
        Ok((data, r.position()))
    }
}

impl fmt::Display for PositionalAudioData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PositionalAudioData(version: {}, camera position: {}, camera direction: {}, clients: {})",
            self.version,
            self.camera_position,
            self.camera_direction,
            self.client_positions.len()
        )?;
        for (id, position) in &self.client_positions {
            write!(f, "\n  client {id}: {position}")?;
        }
        Ok(())
    }
}
