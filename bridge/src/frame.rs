//! Length-prefixed framing for snapshots sent over the bridge socket.
//!
//! Format: `[len: u16 LE][snapshot...]`. The snapshot bytes are exactly what
//! [`PositionalAudioData::encode`] produces.

use tessumod_protocol::{PositionalAudioData, ProtocolError};

use crate::error::BridgeError;

/// Size of the length prefix.
pub const FRAME_HEADER_SIZE: usize = 2;

/// Encode one snapshot as a frame.
///
/// # Errors
/// Returns the snapshot's encoding error.
pub fn encode_frame(data: &PositionalAudioData) -> Result<Vec<u8>, BridgeError> {
    let payload = data.encode()?;
    // A snapshot holds at most 255 clients, far below the prefix limit.
    let len = u16::try_from(payload.len())
        .map_err(|_| ProtocolError::TooManyClients(data.client_positions.len()))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Returns the payload of the first complete frame in `buf` and the total
/// frame size, or `None` if more bytes are needed.
#[must_use]
pub fn next_frame(buf: &[u8]) -> Option<(&[u8], usize)> {
    let header: [u8; FRAME_HEADER_SIZE] = buf.get(..FRAME_HEADER_SIZE)?.try_into().ok()?;
    let size = FRAME_HEADER_SIZE + usize::from(u16::from_le_bytes(header));
    buf.get(FRAME_HEADER_SIZE..size).map(|payload| (payload, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessumod_protocol::Vector3;

    fn snapshot() -> PositionalAudioData {
        PositionalAudioData::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0))
            .with_client(4, Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn frame_prefixes_payload_length() {
        let payload = snapshot().encode().unwrap();
        let frame = encode_frame(&snapshot()).unwrap();

        assert_eq!(frame.len(), FRAME_HEADER_SIZE + payload.len());
        assert_eq!(usize::from(u16::from_le_bytes([frame[0], frame[1]])), payload.len());
        assert_eq!(&frame[FRAME_HEADER_SIZE..], payload.as_slice());
    }

    #[test]
    fn next_frame_waits_for_complete_frame() {
        let frame = encode_frame(&snapshot()).unwrap();

        assert!(next_frame(&[]).is_none());
        assert!(next_frame(&frame[..1]).is_none());
        assert!(next_frame(&frame[..frame.len() - 1]).is_none());

        let (payload, size) = next_frame(&frame).unwrap();
        assert_eq!(size, frame.len());
        assert_eq!(payload, &frame[FRAME_HEADER_SIZE..]);
    }

    #[test]
    fn next_frame_stops_at_frame_boundary() {
        let mut buf = encode_frame(&snapshot()).unwrap();
        let first_len = buf.len();
        buf.extend(encode_frame(&PositionalAudioData::new(Vector3::ZERO, Vector3::ZERO)).unwrap());

        let (_, size) = next_frame(&buf).unwrap();
        assert_eq!(size, first_len);
    }

    #[test]
    fn empty_frame_is_complete() {
        let (payload, size) = next_frame(&[0, 0, 0xAA]).unwrap();
        assert!(payload.is_empty());
        assert_eq!(size, FRAME_HEADER_SIZE);
    }
}
