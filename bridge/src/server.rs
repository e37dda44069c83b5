use std::net::SocketAddr;

use tessumod_plugin::{AudioBackend, PositionalAudio, PositionalAudioData};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

use crate::error::BridgeError;
use crate::handler::ConnectionHandler;

/// SnapshotServer accepts game mod connections and feeds every decoded
/// snapshot to a single positional audio tracker.
pub struct SnapshotServer {
    listener: TcpListener,
}

impl SnapshotServer {
    /// Bind the TCP listener.
    pub async fn bind(addr: &str) -> Result<Self, BridgeError> {
        let listener = TcpListener::bind(addr).await?;
        info!("SnapshotServer listening on {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, applying snapshots through `backend`.
    pub async fn run<B>(self, backend: B) -> Result<(), BridgeError>
    where
        B: AudioBackend + Send + 'static,
    {
        // Every connection sends into the same tracker, so updates stay ordered per arrival
        let (snapshots_tx, snapshots_rx) = mpsc::unbounded_channel();
        spawn_tracker(PositionalAudio::new(backend), snapshots_rx);

        loop {
            let (socket, peer_addr) = self.listener.accept().await?;
            info!("[{}] Game mod connected", peer_addr);

            let snapshots_tx = snapshots_tx.clone();
            tokio::spawn(async move {
                let mut handler = ConnectionHandler::new(socket, peer_addr, snapshots_tx);
                if let Err(e) = handler.handle().await {
                    error!("[{}] Error: {}", peer_addr, e);
                }
            });
        }
    }
}

/// Owns the tracker; applies snapshots in arrival order.
fn spawn_tracker<B>(mut audio: PositionalAudio<B>, mut snapshots: UnboundedReceiver<PositionalAudioData>)
where
    B: AudioBackend + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(data) = snapshots.recv().await {
            // A failed update is retried in full by the next snapshot
            if let Err(e) = audio.apply(data) {
                warn!("Positional audio update failed: {}", e);
            }
        }
    });
}
