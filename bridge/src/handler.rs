use std::net::SocketAddr;

use tessumod_protocol::PositionalAudioData;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::config::PACKET_BUFFER_SIZE;
use crate::error::BridgeError;
use crate::frame::next_frame;

/// Reads framed snapshots from one game mod connection.
pub struct ConnectionHandler {
    socket: TcpStream,
    address: SocketAddr,
    snapshots: UnboundedSender<PositionalAudioData>,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        address: SocketAddr,
        snapshots: UnboundedSender<PositionalAudioData>,
    ) -> Self {
        Self { socket, address, snapshots }
    }

    /// Runs until the peer disconnects or the tracker goes away.
    pub async fn handle(&mut self) -> Result<(), BridgeError> {
        let mut read_buf = vec![0u8; PACKET_BUFFER_SIZE];
        // Holds at most one partial frame, which the u16 prefix bounds
        let mut pending = Vec::new();

        loop {
            let n = self.socket.read(&mut read_buf).await?;
            if n == 0 {
                // Game mod closed the connection
                debug!("[{}] Disconnected", self.address);
                return Ok(());
            }

            pending.extend_from_slice(&read_buf[..n]);
            self.drain_frames(&mut pending)?;
        }
    }

    /// Decodes every complete frame at the front of `pending`.
    fn drain_frames(&self, pending: &mut Vec<u8>) -> Result<(), BridgeError> {
        let mut consumed = 0;

        while let Some((payload, size)) = next_frame(&pending[consumed..]) {
            match PositionalAudioData::decode(payload) {
                Ok((data, used)) => {
                    if used != payload.len() {
                        debug!("[{}] Ignoring {} trailing frame bytes", self.address, payload.len() - used);
                    }
                    self.snapshots
                        .send(data)
                        .map_err(|_| BridgeError::TrackerStopped)?;
                }
                Err(e) => {
                    // Skip just this frame; the next one starts right after it
                    warn!("[{}] Dropping frame: {}", self.address, e);
                }
            }
            consumed += size;
        }

        // Remove consumed bytes from buffer
        pending.drain(..consumed);
        Ok(())
    }
}
